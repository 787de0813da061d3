//! Ordered associative tables over byte-string keys.
//!
//! # Purpose
//! This crate provides two containers that map arbitrary byte strings to byte strings and own
//! copies of everything stored in them:
//! - [`ListTable`](collections::ListTable), an ordered multimap kept as a doubly linked chain. It
//!   keeps duplicate keys in the order they were linked, can be sorted stably and reversed, and can
//!   be saved to and loaded from a line-oriented text file.
//! - [`TreeTable`](collections::TreeTable), an ordered map kept as a left-leaning red-black tree,
//!   with logarithmic lookup, in-order traversal from any key and nearest-key search.
//!
//! # Method
//! Nodes live in a slab and refer to one another through generational handles rather than
//! pointers, so both tables are written without unsafe code even though their links form cycles.
//! Traversal state is held in small caller-owned cursors which may outlive mutation of the table:
//! a cursor whose position has been removed simply ends its traversal.
//!
//! # Error Handling
//! Errors are strongly typed and statically dispatched. Each kind of failure is its own (usually
//! zero-sized) struct implementing [`Error`](std::error::Error), and each operation returns an enum
//! of only the kinds it can produce. Allocation failure is reported as an error rather than
//! aborting, and happens before a table is modified, so a failed insertion leaves the table as it
//! was.
//!
//! # Dependencies
//! The [`fs`] module relies on `libc` for its thin syscall wrappers and is only used to persist
//! list-tables. The `sync` feature adds locked wrappers around both tables built on
//! `parking_lot`. Logging goes through `tracing`, and no subscriber is installed by this crate.
//!
//! This crate also depends on some derive macros because they're helpful and remove the need for
//! some very repetitive programming.
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;
pub mod encode;
#[cfg(all(feature = "fs", unix))]
pub mod fs;
pub mod hash;

pub(crate) mod util;
