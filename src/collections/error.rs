//! Errors produced by table operations.
//!
//! Each failure kind is its own zero-sized type and each operation returns an enum of only the
//! kinds it can actually produce.

use std::num::ParseIntError;

use derive_more::{Display, Error, From};

#[doc(inline)]
pub use crate::util::error::{EmptyKeyError, NonEmptyTableError, NotFoundError, OOMError};

/// Returned when inserting into a table.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum PutError {
    EmptyKey(EmptyKeyError),
    OOM(OOMError),
}

/// Returned when looking up or removing a key.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum LookupError {
    EmptyKey(EmptyKeyError),
    NotFound(NotFoundError),
}

/// Returned when copying a value out of a table.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum CopyError {
    EmptyKey(EmptyKeyError),
    NotFound(NotFoundError),
    OOM(OOMError),
}

impl From<LookupError> for CopyError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::EmptyKey(e) => e.into(),
            LookupError::NotFound(e) => e.into(),
        }
    }
}

/// Returned when reading a value as an integer.
#[derive(Debug, Display, Clone, PartialEq, Eq, From, Error)]
pub enum GetIntError {
    EmptyKey(EmptyKeyError),
    NotFound(NotFoundError),
    Parse(ParseIntError),
}

impl From<LookupError> for GetIntError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::EmptyKey(e) => e.into(),
            LookupError::NotFound(e) => e.into(),
        }
    }
}

/// Returned when advancing a cursor and copying the entry it lands on.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum NextError {
    NotFound(NotFoundError),
    OOM(OOMError),
}
