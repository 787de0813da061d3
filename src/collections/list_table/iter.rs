use std::iter::FusedIterator;

use super::{ListNode, ListTable};
use crate::collections::Entry;
use crate::collections::traits::KeyComparator;
use crate::util::arena::{Arena, Handle};
use crate::util::option::OptionExtension;

impl<'a, C: KeyComparator> IntoIterator for &'a ListTable<C> {
    type Item = Entry<'a>;

    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            nodes: &self.nodes,
            front: self.state.head(),
            back: self.state.tail(),
            len: self.len(),
        }
    }
}

/// A borrowing iterator over the entries of a [`ListTable`] in chain order.
#[derive(Clone)]
pub struct Iter<'a> {
    // Both ends are tracked so the iterator can be consumed from either side, with len deciding
    // when they have met.
    pub(crate) nodes: &'a Arena<ListNode>,
    pub(crate) front: Option<Handle>,
    pub(crate) back: Option<Handle>,
    pub(crate) len: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.front.unreachable()];
        self.front = node.next;
        self.len -= 1;
        Some(Entry::new(&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.back.unreachable()];
        self.back = node.prev;
        self.len -= 1;
        Some(Entry::new(&node.key, &node.value))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
