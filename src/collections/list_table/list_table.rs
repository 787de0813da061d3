use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::mem;

use super::{Iter, ListCursor, ListNode, ListState, ListTableOptions, Position};
use crate::collections::entry::{Entries, parse_int};
use crate::collections::error::{
    CopyError, EmptyKeyError, GetIntError, LookupError, NotFoundError, OOMError, PutError,
};
use crate::collections::traits::{KeyComparator, Lexical};
use crate::collections::Entry;
use crate::hash::fnv1_32;
use crate::util::alloc::{try_copy, try_copy_pair};
use crate::util::arena::{Arena, Handle};
use crate::util::option::OptionExtension;

/// An ordered multimap from byte-string keys to byte-string values, stored as a doubly linked
/// chain. See also: [`ListCursor`] for traversal that tolerates removal.
///
/// Keys are matched with the table's [`KeyComparator`]. With a bytewise comparator such as the
/// default [`Lexical`], each entry also stores a 32-bit fingerprint of its key which is compared
/// first, so most non-matching entries are rejected without touching their keys.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of entries in the ListTable.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `put` | `O(1)`, `O(n)`* |
/// | `get` | `O(n)` |
/// | `get_multi` | `O(n)` |
/// | `remove` | `O(n)` |
/// | `remove_object` | `O(1)` |
/// | `get_next` | `O(1)`** |
/// | `sort` | `O(n log n)` |
/// | `reverse` | `O(n)` |
///
/// \* Putting into a table with unique keys first removes existing matches.
///
/// \** When matching a key, `get_next` skips over non-matching entries.
pub struct ListTable<C: KeyComparator = Lexical> {
    pub(crate) nodes: Arena<ListNode>,
    pub(crate) state: ListState,
    pub(crate) options: ListTableOptions,
    pub(crate) comparator: C,
}

impl ListTable<Lexical> {
    /// Creates an empty ListTable with default options and byte-exact keys.
    pub const fn new() -> ListTable<Lexical> {
        ListTable::with_options_and_comparator(ListTableOptions::new(), Lexical)
    }

    /// Creates an empty ListTable with the provided `options` and byte-exact keys.
    pub const fn with_options(options: ListTableOptions) -> ListTable<Lexical> {
        ListTable::with_options_and_comparator(options, Lexical)
    }
}

impl<C: KeyComparator> ListTable<C> {
    /// Creates an empty ListTable with default options, matching and sorting keys with
    /// `comparator`.
    pub const fn with_comparator(comparator: C) -> ListTable<C> {
        ListTable::with_options_and_comparator(ListTableOptions::new(), comparator)
    }

    /// Creates an empty ListTable with the provided `options` and `comparator`.
    pub const fn with_options_and_comparator(
        options: ListTableOptions,
        comparator: C,
    ) -> ListTable<C> {
        ListTable {
            nodes: Arena::new(),
            state: ListState::Empty,
            options,
            comparator,
        }
    }

    pub const fn options(&self) -> ListTableOptions {
        self.options
    }

    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of entries, counting every duplicate.
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Inserts a copy of `key` and `value`. If the table has unique keys, every existing entry
    /// with a matching key is removed first.
    ///
    /// The entry is linked at the head or tail according to
    /// [`insert_at_top`](ListTableOptions::insert_at_top). On failure the table is unchanged.
    pub fn put<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, key: K, value: V) -> Result<(), PutError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(EmptyKeyError.into());
        }
        Ok(self.put_nonempty(key, value.as_ref(), self.options.is_insert_at_top())?)
    }

    /// Inserts a string value. Equivalent to [`put`](ListTable::put) with the string's bytes.
    pub fn put_str<K: AsRef<[u8]>>(&mut self, key: K, value: &str) -> Result<(), PutError> {
        self.put(key, value)
    }

    /// Inserts the formatted `args` as a string value.
    ///
    /// ```
    /// # use ordered_tables::collections::ListTable;
    /// let mut table = ListTable::new();
    /// table.put_fmt("greeting", format_args!("hello {}", 42)).unwrap();
    /// assert_eq!(table.get("greeting").unwrap(), b"hello 42");
    /// ```
    pub fn put_fmt<K: AsRef<[u8]>>(&mut self, key: K, args: fmt::Arguments<'_>) -> Result<(), PutError> {
        match args.as_str() {
            Some(literal) => self.put(key, literal),
            None => self.put(key, args.to_string()),
        }
    }

    /// Inserts `value` as decimal ASCII.
    pub fn put_int<K: AsRef<[u8]>>(&mut self, key: K, value: i64) -> Result<(), PutError> {
        self.put(key, value.to_string())
    }

    /// Returns the value of the first entry matching `key`, searching from the tail unless the
    /// table looks up from the top.
    ///
    /// The returned slice borrows the table, so it can't outlive the next mutation.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<&[u8], LookupError> {
        let handle = self.find(key.as_ref())?;
        Ok(&self.nodes[handle].value)
    }

    /// Returns a copy of the value of the first entry matching `key`. See [`get`](ListTable::get).
    pub fn get_copy<K: AsRef<[u8]>>(&self, key: K) -> Result<Box<[u8]>, CopyError> {
        Ok(try_copy(self.get(key)?)?)
    }

    /// Returns the value matching `key` parsed as a decimal integer, or 0 if there is no such entry
    /// or it doesn't parse. Use [`try_get_int`](ListTable::try_get_int) to tell those apart.
    pub fn get_int<K: AsRef<[u8]>>(&self, key: K) -> i64 {
        self.try_get_int(key).unwrap_or(0)
    }

    pub fn try_get_int<K: AsRef<[u8]>>(&self, key: K) -> Result<i64, GetIntError> {
        Ok(parse_int(self.get(key)?)?)
    }

    /// Returns true if any entry matches `key`.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.find(key.as_ref()).is_ok()
    }

    /// Returns the values of every entry matching `key` in chain order, so duplicates come back in
    /// the order they were linked.
    pub fn get_multi<K: AsRef<[u8]>>(&self, key: K) -> Result<Vec<&[u8]>, LookupError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(EmptyKeyError.into());
        }
        let fingerprint = fnv1_32(key);

        let values: Vec<&[u8]> = self
            .iter_nodes()
            .filter(|node| self.matches(node, key, fingerprint))
            .map(|node| &*node.value)
            .collect();

        if values.is_empty() {
            return Err(NotFoundError.into());
        }
        Ok(values)
    }

    /// Returns copies of the values of every entry matching `key`. See
    /// [`get_multi`](ListTable::get_multi).
    pub fn get_multi_copy<K: AsRef<[u8]>>(&self, key: K) -> Result<Vec<Box<[u8]>>, CopyError> {
        let values = self.get_multi(key)?;
        let mut copies = Vec::new();
        copies.try_reserve_exact(values.len()).map_err(OOMError::from)?;
        for value in values {
            copies.push(try_copy(value)?);
        }
        Ok(copies)
    }

    /// Advances `cursor` to the next entry and returns it, or [`NotFoundError`] once the end of
    /// the chain is reached.
    ///
    /// A fresh cursor starts at the head if the table looks up from the top, and at the tail
    /// otherwise, then keeps moving in that direction. Entries linked after the cursor has passed
    /// their position aren't visited.
    pub fn get_next(&self, cursor: &mut ListCursor) -> Result<Entry<'_>, NotFoundError> {
        self.advance(cursor, None)
    }

    /// Advances `cursor` to the next entry matching `key`. See [`get_next`](ListTable::get_next).
    pub fn get_next_matching<K: AsRef<[u8]>>(
        &self,
        cursor: &mut ListCursor,
        key: K,
    ) -> Result<Entry<'_>, LookupError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(EmptyKeyError.into());
        }
        Ok(self.advance(cursor, Some((key, fnv1_32(key))))?)
    }

    /// Removes every entry matching `key`, returning how many were removed.
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> usize {
        let key = key.as_ref();
        if key.is_empty() {
            return 0;
        }
        self.remove_matching(key, fnv1_32(key))
    }

    /// Removes the entry that `cursor` last landed on. The cursor stays valid and continues from
    /// the removed entry's neighbour.
    ///
    /// Fails with [`NotFoundError`] if the cursor hasn't landed on an entry or that entry is no
    /// longer where the cursor left it, including when it has already been removed.
    pub fn remove_object(&mut self, cursor: &ListCursor) -> Result<(), NotFoundError> {
        let Position::At { prev, next, .. } = cursor.position else {
            return Err(NotFoundError);
        };

        let current = match (prev, next) {
            (Some(prev), _) if self.nodes.contains(prev) => self.nodes[prev].next,
            (_, Some(next)) if self.nodes.contains(next) => self.nodes[next].prev,
            (None, None) if self.len() == 1 => self.state.head(),
            _ => None,
        }
        .ok_or(NotFoundError)?;

        let node = &self.nodes[current];
        if node.prev != prev || node.next != next {
            return Err(NotFoundError);
        }
        self.unlink(current);
        Ok(())
    }

    /// Sorts the chain in ascending key order. The sort is stable, so entries with equal keys keep
    /// their relative order. Doesn't allocate.
    pub fn sort(&mut self) {
        let ListState::Full { head, .. } = self.state else {
            return;
        };

        // Bottom-up merge sort over the next links, merging runs of in_size entries per pass and
        // rebuilding prev links as entries are emitted.
        let mut list = Some(head);
        let mut in_size = 1_usize;
        loop {
            let mut p = list;
            list = None;
            let mut tail: Option<Handle> = None;
            let mut merges = 0_usize;

            while let Some(start) = p {
                merges += 1;
                let mut q = Some(start);
                let mut p_size = 0_usize;
                for _ in 0..in_size {
                    p_size += 1;
                    q = self.nodes[q.unreachable()].next;
                    if q.is_none() {
                        break;
                    }
                }
                let mut q_size = in_size;

                loop {
                    let q_live = q.filter(|_| q_size > 0);
                    let take_p = match (p_size > 0, q_live) {
                        (false, None) => break,
                        (true, None) => true,
                        (false, Some(_)) => false,
                        (true, Some(q_handle)) => {
                            let p_key = &self.nodes[p.unreachable()].key;
                            let q_key = &self.nodes[q_handle].key;
                            self.comparator.compare(p_key, q_key) != Ordering::Greater
                        },
                    };

                    let emitted = if take_p {
                        let emitted = p.unreachable();
                        p = self.nodes[emitted].next;
                        p_size -= 1;
                        emitted
                    } else {
                        let emitted = q.unreachable();
                        q = self.nodes[emitted].next;
                        q_size -= 1;
                        emitted
                    };

                    match tail {
                        Some(tail) => self.nodes[tail].next = Some(emitted),
                        None => list = Some(emitted),
                    }
                    self.nodes[emitted].prev = tail;
                    tail = Some(emitted);
                }
                p = q;
            }

            let last = tail.unreachable();
            self.nodes[last].next = None;
            if merges <= 1 {
                self.state = ListState::Full {
                    head: list.unreachable(),
                    tail: last,
                };
                return;
            }
            in_size *= 2;
        }
    }

    /// Reverses the chain in place.
    pub fn reverse(&mut self) {
        let ListState::Full { head, tail } = self.state else {
            return;
        };

        let mut curr = Some(head);
        while let Some(handle) = curr {
            let node = &mut self.nodes[handle];
            mem::swap(&mut node.prev, &mut node.next);
            curr = node.prev;
        }
        self.state = ListState::Full {
            head: tail,
            tail: head,
        };
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.state = ListState::Empty;
    }

    /// Returns an iterator over the entries in chain order.
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }
}

impl<C: KeyComparator> ListTable<C> {
    /// Links a copy of a key that is known to be non-empty. Every allocation happens before the
    /// chain is touched.
    pub(crate) fn put_nonempty(&mut self, key: &[u8], value: &[u8], at_top: bool) -> Result<(), OOMError> {
        let (key_copy, value_copy) = try_copy_pair(key, value)?;
        self.nodes.try_reserve()?;

        let fingerprint = fnv1_32(key);
        if self.options.is_unique_keys() {
            self.remove_matching(key, fingerprint);
        }

        self.link(
            ListNode {
                key: key_copy,
                value: value_copy,
                fingerprint,
                prev: None,
                next: None,
            },
            at_top,
        );
        Ok(())
    }

    pub(crate) fn matches(&self, node: &ListNode, key: &[u8], fingerprint: u32) -> bool {
        if self.comparator.is_bytewise() {
            node.fingerprint == fingerprint && *node.key == *key
        } else {
            self.comparator.equal(&node.key, key)
        }
    }

    pub(crate) fn find(&self, key: &[u8]) -> Result<Handle, LookupError> {
        if key.is_empty() {
            return Err(EmptyKeyError.into());
        }
        let fingerprint = fnv1_32(key);
        let forward = self.options.is_lookup_from_top();

        let mut curr = if forward { self.state.head() } else { self.state.tail() };
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            if self.matches(node, key, fingerprint) {
                return Ok(handle);
            }
            curr = if forward { node.next } else { node.prev };
        }
        Err(NotFoundError.into())
    }

    fn advance(
        &self,
        cursor: &mut ListCursor,
        filter: Option<(&[u8], u32)>,
    ) -> Result<Entry<'_>, NotFoundError> {
        let (mut candidate, forward) = match cursor.position {
            Position::Start => {
                let forward = self.options.is_lookup_from_top();
                (if forward { self.state.head() } else { self.state.tail() }, forward)
            },
            Position::At { prev, next, forward } => (if forward { next } else { prev }, forward),
            Position::End => return Err(NotFoundError),
        };

        // A handle that has gone stale means the neighbour was removed behind the cursor's back,
        // which ends the traversal.
        while let Some(node) = candidate.and_then(|handle| self.nodes.get(handle)) {
            if filter.is_none_or(|(key, fingerprint)| self.matches(node, key, fingerprint)) {
                cursor.position = Position::At {
                    prev: node.prev,
                    next: node.next,
                    forward,
                };
                return Ok(Entry::new(&node.key, &node.value));
            }
            candidate = if forward { node.next } else { node.prev };
        }

        cursor.position = Position::End;
        Err(NotFoundError)
    }

    fn remove_matching(&mut self, key: &[u8], fingerprint: u32) -> usize {
        let mut removed = 0;
        let mut curr = self.state.head();
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            curr = node.next;
            if self.matches(node, key, fingerprint) {
                self.unlink(handle);
                removed += 1;
            }
        }
        removed
    }

    fn link(&mut self, node: ListNode, at_top: bool) {
        let handle = self.nodes.insert(node);
        self.state = match self.state {
            ListState::Empty => ListState::Full {
                head: handle,
                tail: handle,
            },
            ListState::Full { head, tail } if at_top => {
                self.nodes[handle].next = Some(head);
                self.nodes[head].prev = Some(handle);
                ListState::Full { head: handle, tail }
            },
            ListState::Full { head, tail } => {
                self.nodes[handle].prev = Some(tail);
                self.nodes[tail].next = Some(handle);
                ListState::Full { head, tail: handle }
            },
        };
    }

    fn unlink(&mut self, handle: Handle) -> Option<ListNode> {
        let node = self.nodes.remove(handle)?;
        match (node.prev, node.next) {
            (Some(prev), Some(next)) => {
                self.nodes[prev].next = Some(next);
                self.nodes[next].prev = Some(prev);
            },
            (Some(prev), None) => {
                self.nodes[prev].next = None;
                if let ListState::Full { tail, .. } = &mut self.state {
                    *tail = prev;
                }
            },
            (None, Some(next)) => {
                self.nodes[next].prev = None;
                if let ListState::Full { head, .. } = &mut self.state {
                    *head = next;
                }
            },
            (None, None) => self.state = ListState::Empty,
        }
        Some(node)
    }

    fn iter_nodes(&self) -> impl Iterator<Item = &ListNode> {
        let mut curr = self.state.head();
        std::iter::from_fn(move || {
            let node = &self.nodes[curr?];
            curr = node.next;
            Some(node)
        })
    }

    #[cfg(test)]
    pub(crate) fn verify_links(&self) {
        match self.state {
            ListState::Empty => assert_eq!(self.len(), 0, "An empty chain should have no entries."),
            ListState::Full { head, tail } => {
                assert_eq!(self.nodes[head].prev, None, "Head should have no prev link.");
                assert_eq!(self.nodes[tail].next, None, "Tail should have no next link.");

                let mut count = 1;
                let mut curr = head;
                while let Some(next) = self.nodes[curr].next {
                    assert_eq!(self.nodes[next].prev, Some(curr), "Links should agree both ways.");
                    curr = next;
                    count += 1;
                    assert!(count <= self.len(), "Chain should be acyclic.");
                }
                assert_eq!(curr, tail, "Following next links should end at the tail.");
                assert_eq!(count, self.len(), "Every entry should be reachable from the head.");

                for node in self.iter_nodes() {
                    assert_eq!(node.fingerprint, fnv1_32(&node.key), "Fingerprints should be current.");
                }
            },
        }
    }
}

impl Default for ListTable<Lexical> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: KeyComparator> Debug for ListTable<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListTable")
            .field("entries", &Entries(self.iter()))
            .field("len", &self.len())
            .field("options", &self.options)
            .finish()
    }
}

impl<C: KeyComparator> Display for ListTable<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.iter().enumerate() {
            if index > 0 {
                write!(f, " -> ")?;
            }
            write!(
                f,
                "({}={})",
                String::from_utf8_lossy(entry.key()),
                String::from_utf8_lossy(entry.value())
            )?;
        }
        Ok(())
    }
}
