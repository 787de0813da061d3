use std::fmt::{self, Debug, Formatter};

use parking_lot::{Mutex, MutexGuard};

use super::{ListTable, ReadError};
use crate::collections::error::{CopyError, GetIntError, PutError};
use crate::collections::traits::{KeyComparator, Lexical};

/// A [`ListTable`] that can be shared between threads.
///
/// Every method locks the table for its whole duration, including on error. Values are always
/// copied out, since a borrow would outlive the lock. Use [`lock`](SyncListTable::lock) to run
/// several operations, such as a cursor traversal, within one critical section.
pub struct SyncListTable<C: KeyComparator = Lexical> {
    inner: Mutex<ListTable<C>>,
}

impl<C: KeyComparator> SyncListTable<C> {
    pub fn new(table: ListTable<C>) -> SyncListTable<C> {
        SyncListTable {
            inner: Mutex::new(table),
        }
    }

    /// Locks the table, blocking until it is available.
    pub fn lock(&self) -> MutexGuard<'_, ListTable<C>> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> ListTable<C> {
        self.inner.into_inner()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn put<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<(), PutError> {
        self.lock().put(key, value)
    }

    pub fn put_str<K: AsRef<[u8]>>(&self, key: K, value: &str) -> Result<(), PutError> {
        self.lock().put_str(key, value)
    }

    pub fn put_int<K: AsRef<[u8]>>(&self, key: K, value: i64) -> Result<(), PutError> {
        self.lock().put_int(key, value)
    }

    /// Returns a copy of the value matching `key`. See [`ListTable::get`].
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<Box<[u8]>, CopyError> {
        self.lock().get_copy(key)
    }

    pub fn get_int<K: AsRef<[u8]>>(&self, key: K) -> i64 {
        self.lock().get_int(key)
    }

    pub fn try_get_int<K: AsRef<[u8]>>(&self, key: K) -> Result<i64, GetIntError> {
        self.lock().try_get_int(key)
    }

    /// Returns copies of every value matching `key`. See [`ListTable::get_multi`].
    pub fn get_multi<K: AsRef<[u8]>>(&self, key: K) -> Result<Vec<Box<[u8]>>, CopyError> {
        self.lock().get_multi_copy(key)
    }

    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.lock().contains(key)
    }

    pub fn remove<K: AsRef<[u8]>>(&self, key: K) -> usize {
        self.lock().remove(key)
    }

    pub fn sort(&self) {
        self.lock().sort()
    }

    pub fn reverse(&self) {
        self.lock().reverse()
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    /// Reads entries from `reader` while holding the lock. See [`ListTable::read_from`].
    pub fn read_from<R: std::io::BufRead>(&self, reader: R, separator: u8, decode: bool) -> Result<usize, ReadError> {
        self.lock().read_from(reader, separator, decode)
    }
}

#[cfg(all(feature = "fs", unix))]
impl<C: KeyComparator> SyncListTable<C> {
    /// Saves the table while holding the lock for the whole file operation.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P, separator: u8, encode: bool) -> Result<(), super::SaveError> {
        self.lock().save(path, separator, encode)
    }

    /// Loads entries while holding the lock for the whole file operation.
    pub fn load<P: AsRef<std::path::Path>>(&self, path: P, separator: u8, decode: bool) -> Result<usize, super::LoadError> {
        self.lock().load(path, separator, decode)
    }
}

impl<C: KeyComparator> From<ListTable<C>> for SyncListTable<C> {
    fn from(value: ListTable<C>) -> Self {
        SyncListTable::new(value)
    }
}

impl Default for SyncListTable<Lexical> {
    fn default() -> Self {
        Self::new(ListTable::new())
    }
}

impl<C: KeyComparator> Debug for SyncListTable<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(table) => f.debug_struct("SyncListTable").field("table", &*table).finish(),
            None => f.debug_struct("SyncListTable").field("table", &"<locked>").finish(),
        }
    }
}
