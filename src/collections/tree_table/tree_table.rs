use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter, Write};

use super::{Color, Iter, TreeCursor, TreeNode};
use crate::collections::Entry;
use crate::collections::entry::{Entries, parse_int};
use crate::collections::error::{
    CopyError, EmptyKeyError, GetIntError, LookupError, NextError, NonEmptyTableError,
    NotFoundError, PutError,
};
use crate::collections::traits::{KeyComparator, Lexical};
use crate::util::alloc::{try_copy, try_copy_pair};
use crate::util::arena::{Arena, Handle};
use crate::util::option::OptionExtension;

/// An ordered map from byte-string keys to byte-string values, stored as a left-leaning red-black
/// tree. See also: [`TreeCursor`] for navigation from an arbitrary key.
///
/// Keys are unique and ordered by the table's [`KeyComparator`], which is [`Lexical`] by default.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of entries in the TreeTable.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `put` | `O(log n)` |
/// | `get` | `O(log n)` |
/// | `remove` | `O(log n)` |
/// | `find_min`/`find_max` | `O(log n)` |
/// | `find_nearest` | `O(log n)` |
/// | `get_next` | `O(1)`* |
///
/// \* Amortized over a full traversal.
pub struct TreeTable<C: KeyComparator = Lexical> {
    pub(crate) nodes: Arena<TreeNode>,
    pub(crate) root: Option<Handle>,
    pub(crate) comparator: C,
    pub(crate) token: Cell<u8>,
}

impl TreeTable<Lexical> {
    /// Creates an empty TreeTable ordered by [`Lexical`].
    pub const fn new() -> TreeTable<Lexical> {
        TreeTable::with_comparator(Lexical)
    }
}

impl<C: KeyComparator> TreeTable<C> {
    /// Creates an empty TreeTable ordered by `comparator`.
    pub const fn with_comparator(comparator: C) -> TreeTable<C> {
        TreeTable {
            nodes: Arena::new(),
            root: None,
            comparator,
            token: Cell::new(0),
        }
    }

    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Replaces the comparator. Fails with [`NonEmptyTableError`] if the table holds any entries,
    /// since they are placed according to the old order.
    pub fn set_comparator(&mut self, comparator: C) -> Result<(), NonEmptyTableError> {
        if !self.is_empty() {
            return Err(NonEmptyTableError);
        }
        self.comparator = comparator;
        tracing::trace!("replaced tree-table comparator");
        Ok(())
    }

    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a copy of `key` and `value`, or replaces the value if `key` is already present.
    /// Replacing a value leaves the tree structure untouched.
    ///
    /// Fails if `key` is empty or memory can't be allocated, leaving the table unchanged.
    pub fn put<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, key: K, value: V) -> Result<(), PutError> {
        let (key, value) = (key.as_ref(), value.as_ref());
        if key.is_empty() {
            return Err(EmptyKeyError.into());
        }

        if let Some(handle) = self.find(key) {
            self.nodes[handle].value = try_copy(value)?;
            return Ok(());
        }

        let (key, value) = try_copy_pair(key, value)?;
        self.nodes.try_reserve()?;

        let root = self.insert(self.root, TreeNode::new(key, value));
        self.nodes[root].color = Color::Black;
        self.root = Some(root);
        Ok(())
    }

    /// Inserts a string value. Equivalent to [`put`](TreeTable::put) with the string's bytes.
    pub fn put_str<K: AsRef<[u8]>>(&mut self, key: K, value: &str) -> Result<(), PutError> {
        self.put(key, value)
    }

    /// Inserts the formatted `args` as a string value.
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

    /// Returns the value stored under `key`, borrowed until the table is next mutated.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<&[u8], LookupError> {
        let handle = self.find_nonempty(key.as_ref())?;
        Ok(&self.nodes[handle].value)
    }

    pub fn get_copy<K: AsRef<[u8]>>(&self, key: K) -> Result<Box<[u8]>, CopyError> {
        Ok(try_copy(self.get(key)?)?)
    }

    /// Returns the value stored under `key` parsed as a decimal integer, or 0 if there is no such
    /// entry or it doesn't parse. Use [`try_get_int`](TreeTable::try_get_int) to tell those apart.
    pub fn get_int<K: AsRef<[u8]>>(&self, key: K) -> i64 {
        self.try_get_int(key).unwrap_or(0)
    }

    pub fn try_get_int<K: AsRef<[u8]>>(&self, key: K) -> Result<i64, GetIntError> {
        Ok(parse_int(self.get(key)?)?)
    }

    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.find(key.as_ref()).is_some()
    }

    /// Removes the entry stored under `key`. Fails with [`NotFoundError`] without touching the
    /// tree if there is no such entry.
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> Result<(), LookupError> {
        let key = key.as_ref();
        self.find_nonempty(key)?;

        self.root = self.delete(self.root.unreachable(), key);
        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
        Ok(())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the smallest key.
    pub fn find_min(&self) -> Result<&[u8], NotFoundError> {
        let handle = self.leftmost(self.root.ok_or(NotFoundError)?);
        Ok(&self.nodes[handle].key)
    }

    /// Returns the largest key.
    pub fn find_max(&self) -> Result<&[u8], NotFoundError> {
        let mut handle = self.root.ok_or(NotFoundError)?;
        while let Some(right) = self.nodes[handle].right {
            handle = right;
        }
        Ok(&self.nodes[handle].key)
    }

    pub fn find_min_copy(&self) -> Result<Box<[u8]>, NextError> {
        Ok(try_copy(self.find_min()?)?)
    }

    pub fn find_max_copy(&self) -> Result<Box<[u8]>, NextError> {
        Ok(try_copy(self.find_max()?)?)
    }

    /// Returns a cursor positioned at `key` if it is present, otherwise at the greatest key less
    /// than `key`, otherwise at the smallest key. The first call to
    /// [`get_next`](TreeTable::get_next) with the cursor returns the entry it is positioned at.
    ///
    /// Fails with [`NotFoundError`] if the table is empty.
    ///
    /// ```
    /// # use ordered_tables::collections::TreeTable;
    /// let mut table = TreeTable::new();
    /// for key in ["a", "c", "e"] {
    ///     table.put(key, "").unwrap();
    /// }
    /// let mut cursor = table.find_nearest("d").unwrap();
    /// assert_eq!(table.get_next(&mut cursor).unwrap().key(), b"c");
    /// assert_eq!(table.get_next(&mut cursor).unwrap().key(), b"e");
    /// assert!(table.get_next(&mut cursor).is_err());
    /// ```
    pub fn find_nearest<K: AsRef<[u8]>>(&self, key: K) -> Result<TreeCursor, NotFoundError> {
        let key = key.as_ref();
        let root = self.root.ok_or(NotFoundError)?;

        // The exact match, or failing that the last node the search turned right at.
        let mut target = None;
        let mut curr = Some(root);
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            match self.comparator.compare(key, &node.key) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => {
                    target = Some(handle);
                    curr = node.right;
                },
                Ordering::Equal => {
                    target = Some(handle);
                    break;
                },
            }
        }
        let target = target.unwrap_or_else(|| self.leftmost(root));

        // Walk down to the target again, leaving the tree as if a traversal had just reached it:
        // back links along the path, and everything ordered before the target marked visited.
        // Nodes the path turns left at are still ahead of the target, so they stay unmarked.
        let token = self.next_token();
        let target_key = &self.nodes[target].key;
        let mut back = None;
        let mut curr = root;
        loop {
            let node = &self.nodes[curr];
            node.back.set(back);
            back = Some(curr);
            match self.comparator.compare(target_key, &node.key) {
                Ordering::Less => curr = node.left.unreachable(),
                Ordering::Greater => {
                    node.token.set(token);
                    self.mark(node.left, token);
                    curr = node.right.unreachable();
                },
                Ordering::Equal => {
                    self.mark(node.left, token);
                    break;
                },
            }
        }

        Ok(TreeCursor {
            token,
            at: Some(target),
        })
    }

    /// Advances `cursor` to the next key in ascending order and returns its entry, or
    /// [`NotFoundError`] once every key has been visited.
    ///
    /// The walk needs no stack: it marks visited nodes with the cursor's token and climbs back up
    /// through links left on the way down. Finishing a traversal retires its token. Starting a new
    /// one needs a [`reset`](TreeCursor::reset) or a fresh [`find_nearest`](TreeTable::find_nearest).
    ///
    /// Puts and removes between calls are tolerated. The walk still ends, but keys moved by
    /// rebalancing may be skipped, and keys put behind the cursor may be visited out of order.
    pub fn get_next(&self, cursor: &mut TreeCursor) -> Result<Entry<'_>, NotFoundError> {
        let mut curr = match (cursor.token, cursor.at) {
            (0, _) => {
                let root = self.root.ok_or(NotFoundError)?;
                cursor.token = self.next_token();
                self.nodes[root].back.set(None);
                Some(root)
            },
            (_, None) => return Err(NotFoundError),
            (_, Some(at)) => Some(at),
        };
        let token = cursor.token;

        // A stale handle means the cursor's position was removed, which ends the traversal.
        while let Some(node) = curr.and_then(|handle| self.nodes.get(handle)) {
            let handle = curr.unreachable();

            if let Some(left) = node.left.filter(|left| self.nodes[*left].token.get() != token) {
                self.nodes[left].back.set(Some(handle));
                curr = Some(left);
            } else if node.token.get() != token {
                node.token.set(token);
                cursor.at = Some(handle);
                return Ok(Entry::new(&node.key, &node.value));
            } else if let Some(right) = node.right.filter(|right| self.nodes[*right].token.get() != token) {
                self.nodes[right].back.set(Some(handle));
                curr = Some(right);
            } else {
                curr = self.parent_of(handle);
            }
        }

        cursor.at = None;
        self.next_token();
        Err(NotFoundError)
    }

    /// Returns an in-order iterator over every entry.
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Renders the tree sideways: the right subtree above its parent, four spaces of indent per
    /// level, and red nodes in brackets.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing to a String can't fail.
        let _ = self.dump_node(&mut out, self.root, 0);
        out
    }
}

impl<C: KeyComparator> TreeTable<C> {
    fn find(&self, key: &[u8]) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            curr = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    fn find_nonempty(&self, key: &[u8]) -> Result<Handle, LookupError> {
        if key.is_empty() {
            return Err(EmptyKeyError.into());
        }
        self.find(key).ok_or(NotFoundError.into())
    }

    /// Returns the parent of `handle`. The back link is only trusted while it still names a node
    /// with `handle` as a child; a put or remove between calls to `get_next` can rotate it away,
    /// in which case the parent is found again from the root.
    fn parent_of(&self, handle: Handle) -> Option<Handle> {
        let back = self.nodes[handle].back.get();
        let linked = match back {
            Some(parent) => self.nodes.get(parent).is_some_and(|node| {
                node.left == Some(handle) || node.right == Some(handle)
            }),
            None => self.root == Some(handle),
        };
        if linked {
            return back;
        }

        let key = &self.nodes[handle].key;
        let mut parent = None;
        let mut curr = self.root;
        while let Some(next) = curr.filter(|next| *next != handle) {
            let node = &self.nodes[next];
            node.back.set(parent);
            parent = Some(next);
            curr = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                _ => node.right,
            };
        }
        self.nodes[handle].back.set(parent);
        parent
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes[handle].left {
            handle = left;
        }
        handle
    }

    fn mark(&self, handle: Option<Handle>, token: u8) {
        if let Some(handle) = handle {
            self.nodes[handle].token.set(token);
        }
    }

    /// Mints a traversal token. 0 is reserved for fresh cursors, so when the counter wraps every
    /// node is reset to 0 to keep old marks from matching new tokens.
    fn next_token(&self) -> u8 {
        let token = match self.token.get().wrapping_add(1) {
            0 => {
                for node in self.nodes.values() {
                    node.token.set(0);
                }
                tracing::trace!(nodes = self.len(), "iteration token wrapped");
                1
            },
            token => token,
        };
        self.token.set(token);
        token
    }

    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|handle| self.nodes[handle].color.is_red())
    }

    fn left_of(&self, handle: Option<Handle>) -> Option<Handle> {
        handle.and_then(|handle| self.nodes[handle].left)
    }

    fn right_of(&self, handle: Option<Handle>) -> Option<Handle> {
        handle.and_then(|handle| self.nodes[handle].right)
    }

    fn compare_at(&self, key: &[u8], handle: Handle) -> Ordering {
        self.comparator.compare(key, &self.nodes[handle].key)
    }

    fn rotate_left(&mut self, h: Handle) -> Handle {
        let x = self.nodes[h].right.unreachable();
        self.nodes[h].right = self.nodes[x].left;
        self.nodes[x].left = Some(h);
        self.nodes[x].color = self.nodes[h].color;
        self.nodes[h].color = Color::Red;
        x
    }

    fn rotate_right(&mut self, h: Handle) -> Handle {
        let x = self.nodes[h].left.unreachable();
        self.nodes[h].left = self.nodes[x].right;
        self.nodes[x].right = Some(h);
        self.nodes[x].color = self.nodes[h].color;
        self.nodes[h].color = Color::Red;
        x
    }

    fn flip_colors(&mut self, h: Handle) {
        let node = &mut self.nodes[h];
        node.color = node.color.flip();
        let children = [node.left, node.right];
        for child in children.into_iter().flatten() {
            let child = &mut self.nodes[child];
            child.color = child.color.flip();
        }
    }

    /// Inserts `node`, whose key must not be present, below `h` and returns the new subtree root.
    fn insert(&mut self, h: Option<Handle>, node: TreeNode) -> Handle {
        let Some(mut h) = h else {
            return self.nodes.insert(node);
        };

        if self.is_red(self.nodes[h].left) && self.is_red(self.nodes[h].right) {
            self.flip_colors(h);
        }

        if self.compare_at(&node.key, h).is_lt() {
            let left = self.insert(self.nodes[h].left, node);
            self.nodes[h].left = Some(left);
        } else {
            let right = self.insert(self.nodes[h].right, node);
            self.nodes[h].right = Some(right);
        }

        if self.is_red(self.nodes[h].right) && !self.is_red(self.nodes[h].left) {
            h = self.rotate_left(h);
        }
        let left = self.nodes[h].left;
        if self.is_red(left) && self.is_red(self.left_of(left)) {
            h = self.rotate_right(h);
        }
        h
    }

    /// Deletes `key`, which must be present below `h`, and returns the new subtree root.
    fn delete(&mut self, mut h: Handle, key: &[u8]) -> Option<Handle> {
        if self.compare_at(key, h).is_lt() {
            let left = self.nodes[h].left;
            if !self.is_red(left) && !self.is_red(self.left_of(left)) {
                h = self.move_red_left(h);
            }
            let left = self.delete(self.nodes[h].left.unreachable(), key);
            self.nodes[h].left = left;
        } else {
            if self.is_red(self.nodes[h].left) {
                h = self.rotate_right(h);
            }
            if self.compare_at(key, h).is_eq() && self.nodes[h].right.is_none() {
                self.nodes.remove(h);
                return None;
            }

            let right = self.nodes[h].right;
            if !self.is_red(right) && !self.is_red(self.left_of(right)) {
                h = self.move_red_right(h);
            }

            if self.compare_at(key, h).is_eq() {
                let (right, min) = self.delete_min(self.nodes[h].right.unreachable());
                self.nodes[h].right = right;
                let min = self.nodes.remove(min).unreachable();
                let node = &mut self.nodes[h];
                node.key = min.key;
                node.value = min.value;
            } else {
                let right = self.delete(self.nodes[h].right.unreachable(), key);
                self.nodes[h].right = right;
            }
        }
        Some(self.fix(h))
    }

    /// Unlinks the smallest node below `h`, returning the new subtree root and the unlinked node,
    /// which is still stored in the arena.
    fn delete_min(&mut self, mut h: Handle) -> (Option<Handle>, Handle) {
        let Some(left) = self.nodes[h].left else {
            return (None, h);
        };

        if !self.is_red(Some(left)) && !self.is_red(self.nodes[left].left) {
            h = self.move_red_left(h);
        }
        let (left, min) = self.delete_min(self.nodes[h].left.unreachable());
        self.nodes[h].left = left;
        (Some(self.fix(h)), min)
    }

    fn move_red_left(&mut self, mut h: Handle) -> Handle {
        self.flip_colors(h);
        if self.is_red(self.left_of(self.nodes[h].right)) {
            let right = self.rotate_right(self.nodes[h].right.unreachable());
            self.nodes[h].right = Some(right);
            h = self.rotate_left(h);
            self.flip_colors(h);

            if self.is_red(self.right_of(self.nodes[h].right)) {
                let right = self.rotate_left(self.nodes[h].right.unreachable());
                self.nodes[h].right = Some(right);
            }
        }
        h
    }

    fn move_red_right(&mut self, mut h: Handle) -> Handle {
        self.flip_colors(h);
        if self.is_red(self.left_of(self.nodes[h].left)) {
            h = self.rotate_right(h);
            self.flip_colors(h);
        }
        h
    }

    fn fix(&mut self, mut h: Handle) -> Handle {
        let right = self.nodes[h].right;
        if self.is_red(right) {
            if self.is_red(self.left_of(right)) {
                let right = self.rotate_right(right.unreachable());
                self.nodes[h].right = Some(right);
            }
            h = self.rotate_left(h);
        }
        let left = self.nodes[h].left;
        if self.is_red(left) && self.is_red(self.left_of(left)) {
            h = self.rotate_right(h);
        }
        h
    }

    fn dump_node(&self, out: &mut String, handle: Option<Handle>, depth: usize) -> fmt::Result {
        let Some(handle) = handle else {
            return Ok(());
        };
        let node = &self.nodes[handle];
        let key = String::from_utf8_lossy(&node.key);

        self.dump_node(out, node.right, depth + 1)?;
        match node.color {
            Color::Red => writeln!(out, "{:indent$}[{key}]", "", indent = depth * 4)?,
            Color::Black => writeln!(out, "{:indent$}{key}", "", indent = depth * 4)?,
        }
        self.dump_node(out, node.left, depth + 1)
    }

    /// Asserts every red-black invariant, returning the black height.
    #[cfg(test)]
    pub(crate) fn verify_invariants(&self) -> usize {
        fn walk<C: KeyComparator>(table: &TreeTable<C>, handle: Option<Handle>, count: &mut usize) -> usize {
            let Some(handle) = handle else {
                return 1;
            };
            *count += 1;
            let node = &table.nodes[handle];

            if node.color.is_red() {
                assert!(
                    !table.is_red(node.left) && !table.is_red(node.right),
                    "A red node shouldn't have a red child."
                );
            }
            assert!(
                !table.is_red(node.right) || table.is_red(node.left),
                "A red right link should only exist alongside a red left link."
            );
            if let Some(left) = node.left {
                assert!(table.compare_at(&table.nodes[left].key, handle).is_lt(), "Left keys should be smaller.");
            }
            if let Some(right) = node.right {
                assert!(table.compare_at(&table.nodes[right].key, handle).is_gt(), "Right keys should be larger.");
            }

            let left = walk(table, node.left, count);
            let right = walk(table, node.right, count);
            assert_eq!(left, right, "Every path should have the same number of black nodes.");
            left + usize::from(node.color.is_black())
        }

        assert!(!self.is_red(self.root), "The root should be black.");
        let mut count = 0;
        let height = walk(self, self.root, &mut count);
        assert_eq!(count, self.len(), "Every stored node should be reachable from the root.");
        height
    }
}

impl Default for TreeTable<Lexical> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: KeyComparator> Debug for TreeTable<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeTable")
            .field("entries", &Entries(self.iter()))
            .field("len", &self.len())
            .finish()
    }
}
