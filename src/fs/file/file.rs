use std::io::{self, Read, Write};
use std::path::Path;

use super::{CloseError, OpenError, OpenOptions};
use crate::fs::Fd;
use crate::fs::error::err_no;

/// An open file, closed when dropped. Use [`File::close`] to observe errors from closing.
#[derive(Debug)]
pub struct File {
    pub(crate) fd: Fd,
}

impl File {
    /// Opens an existing file for reading.
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<File, OpenError> {
        File::options().open(file_path)
    }

    /// Opens a file for writing, creating it if it doesn't exist and emptying it if it does.
    pub fn create<P: AsRef<Path>>(file_path: P) -> Result<File, OpenError> {
        File::options()
            .read(false)
            .write(true)
            .create(true)
            .truncate(true)
            .open(file_path)
    }

    pub const fn options() -> OpenOptions {
        OpenOptions::new()
    }

    pub fn close(self) -> Result<(), CloseError> {
        self.fd.close()
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            // SAFETY: buf is valid for writes of buf.len() bytes for the duration of the call.
            match unsafe { libc::read(self.fd.0, buf.as_mut_ptr().cast(), buf.len()) } {
                -1 => match err_no() {
                    libc::EINTR => continue,
                    e => break Err(io::Error::from_raw_os_error(e)),
                },
                count => break Ok(count as usize),
            }
        }
    }
}

impl Write for File {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        loop {
            // SAFETY: buf is valid for reads of buf.len() bytes for the duration of the call.
            match unsafe { libc::write(self.fd.0, buf.as_ptr().cast(), buf.len()) } {
                -1 => match err_no() {
                    libc::EINTR => continue,
                    e => break Err(io::Error::from_raw_os_error(e)),
                },
                count => break Ok(count as usize),
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        // Writes go straight to the descriptor, there is nothing buffered here.
        Ok(())
    }
}
