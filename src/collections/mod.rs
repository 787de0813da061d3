//! The ordered associative tables and the types they share.
//!
//! # Purpose
//! Both tables map byte-string keys to byte-string values and own deep copies of everything
//! stored in them. [`ListTable`](list_table::ListTable) keeps duplicate keys in a doubly linked
//! chain and lets the caller decide the chain order. [`TreeTable`](tree_table::TreeTable) keeps
//! unique keys in a left-leaning red-black tree for logarithmic lookup and ordered navigation.
//!
//! # Method
//! Nodes live in a slab and link to one another through generational handles, so neither table
//! needs unsafe code for its cycles (prev/next links, iterator back links). Cursors are plain
//! owned values holding handles, which makes them safe to keep across mutation: at worst a stale
//! cursor reports that it has reached the end.

pub mod entry;
pub mod error;
pub mod traits;

#[cfg(feature = "list-table")]
pub mod list_table;
#[cfg(feature = "tree-table")]
pub mod tree_table;

#[doc(inline)]
pub use entry::{Entry, OwnedEntry};
#[doc(inline)]
pub use traits::{CaseInsensitive, DynComparator, FnComparator, KeyComparator, Lexical};
#[cfg(feature = "list-table")]
#[doc(inline)]
pub use list_table::{ListCursor, ListTable, ListTableOptions};
#[cfg(feature = "tree-table")]
#[doc(inline)]
pub use tree_table::{TreeCursor, TreeTable};
