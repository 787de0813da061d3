use std::iter::FusedIterator;

use super::{TreeNode, TreeTable};
use crate::collections::Entry;
use crate::collections::traits::KeyComparator;
use crate::util::arena::{Arena, Handle};

impl<'a, C: KeyComparator> IntoIterator for &'a TreeTable<C> {
    type Item = Entry<'a>;

    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
            len: self.len(),
        };
        iter.push_left(self.root);
        iter
    }
}

/// An in-order iterator over the entries of a [`TreeTable`].
///
/// Unlike a [`TreeCursor`](super::TreeCursor) this keeps its own stack of ancestors, so it never
/// writes iteration tokens and any number of them can run at once.
#[derive(Clone)]
pub struct Iter<'a> {
    nodes: &'a Arena<TreeNode>,
    stack: Vec<Handle>,
    len: usize,
}

impl Iter<'_> {
    fn push_left(&mut self, mut curr: Option<Handle>) {
        while let Some(handle) = curr {
            self.stack.push(handle);
            curr = self.nodes[handle].left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.stack.pop()?];
        self.push_left(node.right);
        self.len -= 1;
        Some(Entry::new(&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
