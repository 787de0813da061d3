//! A module containing [`ListTable`] and its associated types.
//!
//! A ListTable is an ordered multimap: keys may repeat, and the order of entries is the order of
//! the underlying chain, which the caller controls through [`ListTableOptions`], [`sort`] and
//! [`reverse`]. Lookups are linear.
//!
//! [`sort`]: ListTable::sort
//! [`reverse`]: ListTable::reverse

mod cursor;
mod iter;
mod list_table;
mod node;
mod options;
mod persist;
#[cfg(feature = "sync")]
mod sync;

pub use cursor::*;
pub use iter::*;
pub use list_table::*;
pub(crate) use node::*;
pub use options::*;
pub use persist::*;
#[cfg(feature = "sync")]
pub use sync::*;
