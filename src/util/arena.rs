//! A slab of nodes addressed by generational [`Handle`]s.
//!
//! Both tables link their nodes through handles rather than pointers, which lets prev/next,
//! child and iterator back links form cycles without any unsafe code. Each slot carries a
//! generation that is bumped whenever the slot is vacated, so a handle kept by a caller-owned
//! cursor can be detected as stale instead of silently aliasing a newer node.

use std::mem;
use std::ops::{Index, IndexMut};

use super::error::OOMError;

/// A reference to a node stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<usize> },
}

#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    pub const fn new() -> Arena<T> {
        Arena {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ensures that the next call to [`insert`](Arena::insert) won't allocate.
    pub fn try_reserve(&mut self) -> Result<(), OOMError> {
        if self.free.is_none() {
            self.slots.try_reserve(1)?;
        }
        Ok(())
    }

    /// Stores `value`, reusing a vacant slot where possible.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.free {
            Some(index) => {
                let generation = match self.slots[index] {
                    Slot::Vacant { generation, next_free } => {
                        self.free = next_free;
                        generation
                    },
                    Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                self.slots[index] = Slot::Occupied { generation, value };
                Handle { index, generation }
            },
            None => {
                let index = self.slots.len();
                self.slots.push(Slot::Occupied { generation: 0, value });
                Handle { index, generation: 0 }
            },
        }
    }

    /// Removes the value referenced by `handle`, returning [`None`] if the handle is stale.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }

        let vacant = Slot::Vacant {
            generation: handle.generation.wrapping_add(1),
            next_free: self.free,
        };
        self.free = Some(handle.index);
        self.len -= 1;

        match mem::replace(&mut self.slots[handle.index], vacant) {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.index)? {
            Slot::Occupied { generation, value } if *generation == handle.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index)? {
            Slot::Occupied { generation, value } if *generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Iterates over every live value in slot order, which is unrelated to either table's order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        })
    }

    /// Drops every value. Slots are kept and vacated with a new generation, so handles from before
    /// the clear stay stale.
    pub fn clear(&mut self) {
        let mut free = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };
            *slot = Slot::Vacant {
                generation,
                next_free: free,
            };
            free = Some(index);
        }
        self.free = free;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, handle: Handle) -> &Self::Output {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("stale handle {handle:?} used for a linked node"),
        }
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    #[track_caller]
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("stale handle {handle:?} used for a linked node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.remove(a), None, "Removing twice should report a stale handle.");

        let c = arena.insert("c");
        assert_eq!(c.index, a.index, "Vacant slots should be reused.");
        assert_ne!(c, a, "A reused slot should hand out a new generation.");
        assert_eq!(arena.get(a), None, "Old handles shouldn't alias the reused slot.");
        assert_eq!(arena[c], "c");
        assert_eq!(arena[b], "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic]
    fn test_stale_index_panics() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.remove(a);
        let _ = arena[a];
    }

    #[test]
    fn test_clear() {
        let mut arena = Arena::new();
        for i in 0..10 {
            arena.insert(i);
        }
        let old = arena.insert(10);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.values().count(), 0);

        let new = arena.insert(0);
        assert_eq!(arena.get(old), None, "Handles from before a clear should stay stale.");
        assert_eq!(arena[new], 0);
        assert_eq!(arena.len(), 1);
    }
}
