use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libc::{O_APPEND, O_CLOEXEC, O_CREAT, O_RDONLY, O_RDWR, O_TRUNC, O_WRONLY, c_int, c_uint};

use super::{File, OpenError};
use crate::fs::error::*;
use crate::fs::Fd;
use crate::fs::error::err_no;
use crate::util::error::OOMError;

const DEFAULT_MODE: c_uint = 0o644;

/// A builder struct to help with opening files, using customizable options and logical defaults.
/// Available via [`File::options`] to avoid additional use statements.
///
/// By default a file is opened read-only and must already exist.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    read: bool,
    write: bool,
    append: bool,
    create: bool,
    truncate: bool,
    mode: c_uint,
}

impl OpenOptions {
    pub const fn new() -> OpenOptions {
        OpenOptions {
            read: true,
            write: false,
            append: false,
            create: false,
            truncate: false,
            mode: DEFAULT_MODE,
        }
    }

    pub const fn read(mut self, read: bool) -> OpenOptions {
        self.read = read;
        self
    }

    pub const fn write(mut self, write: bool) -> OpenOptions {
        self.write = write;
        self
    }

    pub const fn append(mut self, append: bool) -> OpenOptions {
        self.append = append;
        self
    }

    pub const fn create(mut self, create: bool) -> OpenOptions {
        self.create = create;
        self
    }

    pub const fn truncate(mut self, truncate: bool) -> OpenOptions {
        self.truncate = truncate;
        self
    }

    /// Sets the permission bits used if the file is created.
    pub const fn mode(mut self, mode: u32) -> OpenOptions {
        self.mode = mode as c_uint;
        self
    }

    pub(crate) const fn flags(&self) -> c_int {
        let mut flags = match (self.read, self.write || self.append) {
            (true, true) => O_RDWR,
            (false, true) => O_WRONLY,
            _ => O_RDONLY,
        };
        if self.append {
            flags |= O_APPEND;
        }
        if self.create {
            flags |= O_CREAT;
        }
        if self.truncate {
            flags |= O_TRUNC;
        }
        flags | O_CLOEXEC
    }

    pub fn open<P: AsRef<Path>>(&self, file_path: P) -> Result<File, OpenError> {
        let pathname = CString::new(file_path.as_ref().as_os_str().as_bytes())
            .map_err(|_| InvalidPathError)?;

        // SAFETY: pathname is a valid NUL terminated string that outlives the call.
        match unsafe { libc::open(pathname.as_ptr(), self.flags(), self.mode) } {
            -1 => Err(match err_no() {
                libc::EACCES | libc::EPERM => PermissionError.into(),
                libc::EEXIST => AlreadyExistsError.into(),
                libc::EINTR => InterruptError.into(),
                libc::EISDIR => IsDirectoryError.into(),
                libc::ELOOP => ExcessiveLinksError.into(),
                libc::EMFILE | libc::ENFILE => FileCountError.into(),
                libc::ENAMETOOLONG => PathLengthError.into(),
                libc::ENOENT => MissingComponentError.into(),
                libc::ENOMEM => OOMError.into(),
                libc::ENOSPC | libc::EDQUOT => StorageExhaustedError.into(),
                libc::ENOTDIR => NonDirComponentError.into(),
                libc::EROFS => ReadOnlyFSError.into(),
                e => UnexpectedError(e).into(),
            }),
            fd => Ok(File { fd: Fd(fd) }),
        }
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}
