use super::ListTable;
use crate::collections::traits::{KeyComparator, Lexical};

/// Construction-time configuration for a [`ListTable`].
///
/// Every option defaults to off, which gives a table that appends new entries at the tail, keeps
/// duplicate keys, and resolves lookups to the most recently appended match.
///
/// ```
/// # use ordered_tables::collections::{ListTable, ListTableOptions};
/// let table: ListTable = ListTableOptions::new()
///     .unique_keys(true)
///     .lookup_from_top(true)
///     .build();
/// assert!(table.options().is_unique_keys());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListTableOptions {
    unique_keys: bool,
    insert_at_top: bool,
    lookup_from_top: bool,
}

impl ListTableOptions {
    pub const fn new() -> ListTableOptions {
        ListTableOptions {
            unique_keys: false,
            insert_at_top: false,
            lookup_from_top: false,
        }
    }

    /// When set, putting a key first removes every existing entry with a matching key.
    pub const fn unique_keys(mut self, unique_keys: bool) -> ListTableOptions {
        self.unique_keys = unique_keys;
        self
    }

    /// When set, new entries are linked at the head of the chain rather than the tail.
    pub const fn insert_at_top(mut self, insert_at_top: bool) -> ListTableOptions {
        self.insert_at_top = insert_at_top;
        self
    }

    /// When set, lookups and fresh cursors start at the head of the chain rather than the tail.
    pub const fn lookup_from_top(mut self, lookup_from_top: bool) -> ListTableOptions {
        self.lookup_from_top = lookup_from_top;
        self
    }

    pub const fn is_unique_keys(&self) -> bool {
        self.unique_keys
    }

    pub const fn is_insert_at_top(&self) -> bool {
        self.insert_at_top
    }

    pub const fn is_lookup_from_top(&self) -> bool {
        self.lookup_from_top
    }

    /// Creates an empty table with these options and byte-exact keys.
    pub const fn build(self) -> ListTable<Lexical> {
        ListTable::with_options_and_comparator(self, Lexical)
    }

    /// Creates an empty table with these options, matching and sorting keys with `comparator`.
    pub const fn build_with<C: KeyComparator>(self, comparator: C) -> ListTable<C> {
        ListTable::with_options_and_comparator(self, comparator)
    }
}
