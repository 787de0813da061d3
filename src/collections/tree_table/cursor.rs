use crate::util::arena::Handle;

/// Caller-owned traversal state for [`TreeTable::get_next`](super::TreeTable::get_next).
///
/// A default cursor starts from the smallest key. A cursor returned by
/// [`TreeTable::find_nearest`](super::TreeTable::find_nearest) starts from the key it found.
///
/// Each traversal is tagged with a token minted from its table, which is written onto the nodes
/// it visits. Mutating the table during a traversal is allowed, but keys inserted behind the
/// cursor may be missed, and a traversal whose position is removed ends early. Rewind with
/// `find_nearest` after mutating.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeCursor {
    pub(crate) token: u8,
    pub(crate) at: Option<Handle>,
}

impl TreeCursor {
    pub const fn new() -> TreeCursor {
        TreeCursor { token: 0, at: None }
    }

    /// Returns the cursor to the smallest key.
    pub fn reset(&mut self) {
        *self = TreeCursor::new();
    }

    /// Returns true once the traversal has run off the largest key.
    pub const fn is_finished(&self) -> bool {
        self.token != 0 && self.at.is_none()
    }
}
