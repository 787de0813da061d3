//! Line-oriented text persistence.
//!
//! The format is one `key<separator>value` line per entry from head to tail, preceded by a `#`
//! comment line. Values can optionally be percent-encoded so that they may contain newlines or the
//! separator. Keys are never encoded.

use std::fmt;
use std::io::{self, BufRead, Write};

use derive_more::{Display, Error, From};

use super::ListTable;
use crate::collections::error::OOMError;
use crate::collections::traits::KeyComparator;
use crate::encode::url;

/// Returned when reading entries from a stream.
#[derive(Debug, Display, From, Error)]
pub enum ReadError {
    IO(io::Error),
    OOM(OOMError),
}

impl<C: KeyComparator> ListTable<C> {
    /// Writes every entry as a line to `writer`, preceded by a comment line.
    ///
    /// If `encode` is set, values are percent-encoded. Otherwise they are written as-is and it is
    /// up to the caller to make sure they contain neither a newline nor the `separator`.
    pub fn write_to<W: Write>(&self, writer: W, separator: u8, encode: bool) -> io::Result<()> {
        self.write_with_header(writer, format_args!("{} entries", self.len()), separator, encode)
    }

    /// Reads `key<separator>value` lines from `reader`, appending each at the tail regardless of
    /// [`insert_at_top`](super::ListTableOptions::insert_at_top) so the stream order is kept.
    /// Returns the number of entries read.
    ///
    /// Blank lines and lines starting with `#` are skipped, as are lines without a separator or
    /// with an empty key. Keys and values are trimmed of surrounding whitespace, then values are
    /// percent-decoded if `decode` is set. A failure part way through leaves the entries read so
    /// far in the table.
    pub fn read_from<R: BufRead>(&mut self, mut reader: R, separator: u8, decode: bool) -> Result<usize, ReadError> {
        let mut line = Vec::new();
        let mut line_number = 0_usize;
        let mut loaded = 0_usize;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            line_number += 1;

            let trimmed = line.trim_ascii();
            if trimmed.is_empty() || trimmed.starts_with(b"#") {
                continue;
            }

            let Some(split) = trimmed.iter().position(|byte| *byte == separator) else {
                tracing::warn!(line = line_number, "skipping line without a separator");
                continue;
            };
            let key = trimmed[..split].trim_ascii();
            let value = trimmed[split + 1..].trim_ascii();
            if key.is_empty() {
                tracing::warn!(line = line_number, "skipping line with an empty key");
                continue;
            }

            if decode {
                let mut decoded = Vec::new();
                decoded.try_reserve_exact(value.len()).map_err(OOMError::from)?;
                decoded.extend_from_slice(value);
                url::decode_in_place(&mut decoded);
                self.put_nonempty(key, &decoded, false)?;
            } else {
                self.put_nonempty(key, value, false)?;
            }
            loaded += 1;
        }

        tracing::debug!(loaded, lines = line_number, "read list-table entries");
        Ok(loaded)
    }

    fn write_with_header<W: Write>(
        &self,
        mut writer: W,
        header: fmt::Arguments<'_>,
        separator: u8,
        encode: bool,
    ) -> io::Result<()> {
        writeln!(writer, "# {header}")?;
        for entry in self.iter() {
            writer.write_all(entry.key())?;
            writer.write_all(&[separator])?;
            if encode {
                writer.write_all(url::encode(entry.value()).as_bytes())?;
            } else {
                writer.write_all(entry.value())?;
            }
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

#[cfg(all(feature = "fs", unix))]
pub use file::*;

#[cfg(all(feature = "fs", unix))]
mod file {
    use std::io::{self, BufReader, BufWriter};
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use derive_more::{Display, Error, From};

    use super::ReadError;
    use crate::collections::list_table::ListTable;
    use crate::collections::traits::KeyComparator;
    use crate::fs::file::{CloseError, File, OpenError};

    /// Returned when saving a table to a file.
    #[derive(Debug, Display, From, Error)]
    pub enum SaveError {
        Open(OpenError),
        IO(io::Error),
        Close(CloseError),
    }

    /// Returned when loading a table from a file.
    #[derive(Debug, Display, From, Error)]
    pub enum LoadError {
        Open(OpenError),
        Read(ReadError),
    }

    impl<C: KeyComparator> ListTable<C> {
        /// Writes the table to the file at `path`, replacing its contents. The comment line records
        /// the path and the time of saving. See [`write_to`](ListTable::write_to).
        pub fn save<P: AsRef<Path>>(&self, path: P, separator: u8, encode: bool) -> Result<(), SaveError> {
            let path = path.as_ref();
            let saved_at = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default();

            let mut writer = BufWriter::new(File::create(path)?);
            self.write_with_header(
                &mut writer,
                format_args!("{} saved at {saved_at}", path.display()),
                separator,
                encode,
            )?;
            writer.into_inner().map_err(|e| e.into_error())?.close()?;

            tracing::debug!(path = %path.display(), entries = self.len(), "saved list-table");
            Ok(())
        }

        /// Appends the entries stored in the file at `path`, returning how many were loaded. See
        /// [`read_from`](ListTable::read_from).
        pub fn load<P: AsRef<Path>>(&mut self, path: P, separator: u8, decode: bool) -> Result<usize, LoadError> {
            let path = path.as_ref();
            let loaded = self.read_from(BufReader::new(File::open(path)?), separator, decode)?;

            tracing::debug!(path = %path.display(), loaded, "loaded list-table");
            Ok(loaded)
        }
    }
}
