//! A module containing [`TreeTable`] and its associated types.
//!
//! A TreeTable is an ordered map with unique keys, stored as a left-leaning red-black tree in the
//! 2-3-4 variant: 4-nodes are split on the way down during insertion and are allowed to persist
//! after removal. Besides lookup by key it supports ordered navigation through [`TreeCursor`],
//! either from the smallest key or from the nearest key to a search key.

mod cursor;
mod iter;
mod node;
#[cfg(feature = "sync")]
mod sync;
mod tests;
mod tree_table;

pub use cursor::*;
pub use iter::*;
pub(crate) use node::*;
#[cfg(feature = "sync")]
pub use sync::*;
pub use tree_table::*;
