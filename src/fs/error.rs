use std::io;

use derive_more::{Display, Error};

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("interrupted by signal")]
pub struct InterruptError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("error during I/O")]
pub struct IOError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("available storage space exhausted")]
pub struct StorageExhaustedError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("exceeded open file limit")]
pub struct FileCountError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("permission denied for the provided path")]
pub struct PermissionError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("path contains too many symlinks")]
pub struct ExcessiveLinksError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("path is too long")]
pub struct PathLengthError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("a component of the provided path does not exist")]
pub struct MissingComponentError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("a component of the provided path is not a directory")]
pub struct NonDirComponentError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("the provided path is a directory")]
pub struct IsDirectoryError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("file already exists")]
pub struct AlreadyExistsError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("file system is read-only")]
pub struct ReadOnlyFSError;

#[derive(Debug, Display, Clone, Copy, Error)]
#[display("path contains an interior NUL byte")]
pub struct InvalidPathError;

/// An errno value that the called operation doesn't document.
#[derive(Debug, Display, Clone, Copy, Error)]
#[display("unexpected errno {_0}")]
pub struct UnexpectedError(#[error(not(source))] pub i32);

/// Returns the errno value left by the last failed libc call on this thread.
pub(crate) fn err_no() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}
