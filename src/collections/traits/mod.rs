//! Traits shared by the tables.

mod comparator;

pub use comparator::*;
