//! Text encodings for arbitrary bytes.
//!
//! [`url`] is the percent-encoding used when persisting list-table values, [`hex`] is plain
//! lowercase base-16.

pub mod hex;
pub mod url;
