use std::fmt::{self, Debug, Formatter};

use parking_lot::{Mutex, MutexGuard};

use super::{TreeCursor, TreeTable};
use crate::collections::OwnedEntry;
use crate::collections::error::{CopyError, GetIntError, LookupError, NextError, NotFoundError, PutError};
use crate::collections::traits::{KeyComparator, Lexical};

/// A [`TreeTable`] that can be shared between threads.
///
/// Every method locks the table for its whole duration and copies out anything it returns.
/// A cursor used through [`get_next`](SyncTreeTable::get_next) across separate calls sees other
/// threads' changes on a best effort basis: keys may be skipped if the tree changes between calls.
/// Use [`lock`](SyncTreeTable::lock) to traverse within a single critical section.
pub struct SyncTreeTable<C: KeyComparator = Lexical> {
    inner: Mutex<TreeTable<C>>,
}

impl<C: KeyComparator> SyncTreeTable<C> {
    pub fn new(table: TreeTable<C>) -> SyncTreeTable<C> {
        SyncTreeTable {
            inner: Mutex::new(table),
        }
    }

    /// Locks the table, blocking until it is available.
    pub fn lock(&self) -> MutexGuard<'_, TreeTable<C>> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> TreeTable<C> {
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

    /// Returns a copy of the value stored under `key`.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<Box<[u8]>, CopyError> {
        self.lock().get_copy(key)
    }

    pub fn get_int<K: AsRef<[u8]>>(&self, key: K) -> i64 {
        self.lock().get_int(key)
    }

    pub fn try_get_int<K: AsRef<[u8]>>(&self, key: K) -> Result<i64, GetIntError> {
        self.lock().try_get_int(key)
    }

    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.lock().contains(key)
    }

    pub fn remove<K: AsRef<[u8]>>(&self, key: K) -> Result<(), LookupError> {
        self.lock().remove(key)
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    /// Returns a copy of the smallest key.
    pub fn find_min(&self) -> Result<Box<[u8]>, NextError> {
        self.lock().find_min_copy()
    }

    /// Returns a copy of the largest key.
    pub fn find_max(&self) -> Result<Box<[u8]>, NextError> {
        self.lock().find_max_copy()
    }

    pub fn find_nearest<K: AsRef<[u8]>>(&self, key: K) -> Result<TreeCursor, NotFoundError> {
        self.lock().find_nearest(key)
    }

    /// Advances `cursor` and returns a copy of the entry it lands on. See [`TreeTable::get_next`].
    pub fn get_next(&self, cursor: &mut TreeCursor) -> Result<OwnedEntry, NextError> {
        Ok(self.lock().get_next(cursor)?.try_to_owned()?)
    }
}

impl<C: KeyComparator> From<TreeTable<C>> for SyncTreeTable<C> {
    fn from(value: TreeTable<C>) -> Self {
        SyncTreeTable::new(value)
    }
}

impl Default for SyncTreeTable<Lexical> {
    fn default() -> Self {
        Self::new(TreeTable::new())
    }
}

impl<C: KeyComparator> Debug for SyncTreeTable<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(table) => f.debug_struct("SyncTreeTable").field("table", &*table).finish(),
            None => f.debug_struct("SyncTreeTable").field("table", &"<locked>").finish(),
        }
    }
}
