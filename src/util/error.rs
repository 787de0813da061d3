use std::collections::TryReserveError;

use derive_more::{Display, Error};

/// A key was required but an empty one was provided.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("key must not be empty")]
pub struct EmptyKeyError;

/// The requested key, cursor position or next element doesn't exist.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("no matching entry found")]
pub struct NotFoundError;

/// An allocation for a key, value or node couldn't be satisfied.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("out of memory")]
pub struct OOMError;

impl From<TryReserveError> for OOMError {
    fn from(_: TryReserveError) -> Self {
        OOMError
    }
}

/// An operation that is only valid on an empty table was attempted on a table with entries.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("operation requires an empty table")]
pub struct NonEmptyTableError;
