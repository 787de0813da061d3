use crate::util::arena::Handle;

/// Caller-owned traversal state for [`ListTable::get_next`](super::ListTable::get_next).
///
/// A cursor remembers the links around the entry it last landed on rather than the entry itself,
/// so that entry can be removed with [`ListTable::remove_object`](super::ListTable::remove_object)
/// without losing the cursor's place. A default cursor starts from the beginning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    pub(crate) position: Position,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    #[default]
    Start,
    At {
        prev: Option<Handle>,
        next: Option<Handle>,
        forward: bool,
    },
    End,
}

impl ListCursor {
    pub const fn new() -> ListCursor {
        ListCursor {
            position: Position::Start,
        }
    }

    /// Returns the cursor to the beginning.
    pub fn reset(&mut self) {
        self.position = Position::Start;
    }

    /// Returns true once the cursor has run off the end of the chain.
    pub const fn is_finished(&self) -> bool {
        matches!(self.position, Position::End)
    }
}
