#![warn(missing_docs)]

pub mod alloc;
pub mod arena;
pub mod error;
pub mod option;
