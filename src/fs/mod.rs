//! A thin, strongly typed layer over the libc file syscalls.
//!
//! Only what the tables need for persistence is provided: opening a file by path, reading,
//! writing and closing it. [`File`](file::File) implements [`std::io::Read`] and
//! [`std::io::Write`], so the usual buffered adaptors work on top of it, while opening and closing
//! report errno values as the typed errors in this module.
#![cfg(unix)]

pub mod file;

mod error;
mod fd;

pub use error::*;
pub(crate) use fd::*;
