use derive_more::{Display, Error, From};

use crate::fs::error::*;
use crate::util::error::OOMError;

#[derive(Debug, Display, Clone, Copy, From, Error)]
pub enum OpenError {
    AlreadyExists(AlreadyExistsError),
    ExcessiveLinks(ExcessiveLinksError),
    FileCount(FileCountError),
    Interrupt(InterruptError),
    InvalidPath(InvalidPathError),
    IsDirectory(IsDirectoryError),
    MissingComponent(MissingComponentError),
    NonDirComponent(NonDirComponentError),
    OOM(OOMError),
    PathLength(PathLengthError),
    Permission(PermissionError),
    ReadOnlyFS(ReadOnlyFSError),
    StorageExhausted(StorageExhaustedError),
    Unexpected(UnexpectedError),
}

#[derive(Debug, Display, Clone, Copy, From, Error)]
pub enum CloseError {
    Interrupt(InterruptError),
    IO(IOError),
    StorageExhausted(StorageExhaustedError),
    Unexpected(UnexpectedError),
}
