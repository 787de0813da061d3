use std::mem;

use libc::c_int;

use crate::fs::file::CloseError;
use crate::fs::error::{IOError, InterruptError, StorageExhaustedError, UnexpectedError, err_no};

/// An owned file descriptor, closed when dropped.
#[derive(Debug)]
pub(crate) struct Fd(pub c_int);

impl Fd {
    pub fn close(self) -> Result<(), CloseError> {
        let raw = self.0;
        // The descriptor is invalidated by close regardless of the outcome, so drop must not try
        // again.
        mem::forget(self);
        close_raw(raw)
    }
}

fn close_raw(fd: c_int) -> Result<(), CloseError> {
    // SAFETY: fd is owned by the caller and isn't used again after this call.
    if unsafe { libc::close(fd) } == -1 {
        match err_no() {
            libc::EINTR => Err(InterruptError)?,
            libc::EIO => Err(IOError)?,
            libc::ENOSPC | libc::EDQUOT => Err(StorageExhaustedError)?,
            e => Err(UnexpectedError(e))?,
        }
    }
    Ok(())
}

impl Drop for Fd {
    fn drop(&mut self) {
        if let Err(error) = close_raw(self.0) {
            tracing::warn!(fd = self.0, %error, "failed to close dropped file descriptor");
        }
    }
}
