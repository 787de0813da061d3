use std::fmt::{self, Debug, Formatter};
use std::num::ParseIntError;

use crate::util::alloc::try_copy_pair;
use crate::util::error::OOMError;

/// A borrowed view of a key and its value, valid until the table is next mutated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry<'a> {
    key: &'a [u8],
    value: &'a [u8],
}

impl<'a> Entry<'a> {
    pub(crate) const fn new(key: &'a [u8], value: &'a [u8]) -> Entry<'a> {
        Entry { key, value }
    }

    pub const fn key(&self) -> &'a [u8] {
        self.key
    }

    pub const fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Copies the key and value out of the table.
    pub fn try_to_owned(&self) -> Result<OwnedEntry, OOMError> {
        let (key, value) = try_copy_pair(self.key, self.value)?;
        Ok(OwnedEntry { key, value })
    }
}

impl Debug for Entry<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &Bytes(self.key))
            .field("value", &Bytes(self.value))
            .finish()
    }
}

/// A key and value copied out of a table.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OwnedEntry {
    pub key: Box<[u8]>,
    pub value: Box<[u8]>,
}

impl OwnedEntry {
    pub fn as_entry(&self) -> Entry<'_> {
        Entry::new(&self.key, &self.value)
    }
}

impl Debug for OwnedEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.as_entry().fmt(f)
    }
}

/// Formats bytes as a (lossy) string, which is how keys and values are nearly always used.
pub(crate) struct Bytes<'a>(pub &'a [u8]);

impl Debug for Bytes<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.0))
    }
}

/// Formats a sequence of entries as a map.
pub(crate) struct Entries<I>(pub I);

impl<'a, I: Iterator<Item = Entry<'a>> + Clone> Debug for Entries<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.clone().map(|e| (Bytes(e.key), Bytes(e.value))))
            .finish()
    }
}

/// Parses a stored value as a decimal integer, ignoring surrounding whitespace.
pub(crate) fn parse_int(value: &[u8]) -> Result<i64, ParseIntError> {
    String::from_utf8_lossy(value).trim().parse()
}
