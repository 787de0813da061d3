use std::cell::Cell;

use derive_more::IsVariant;

use crate::util::arena::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    pub const fn flip(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

#[derive(Debug)]
pub(crate) struct TreeNode {
    pub key: Box<[u8]>,
    pub value: Box<[u8]>,
    pub color: Color,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
    /// The token of the last traversal to visit this node, or 0.
    pub token: Cell<u8>,
    /// The node a traversal descended from to reach this one. Only meaningful while that
    /// traversal's token is current.
    pub back: Cell<Option<Handle>>,
}

impl TreeNode {
    /// Creates a red leaf.
    pub const fn new(key: Box<[u8]>, value: Box<[u8]>) -> TreeNode {
        TreeNode {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            token: Cell::new(0),
            back: Cell::new(None),
        }
    }
}
