use derive_more::IsVariant;

use crate::util::arena::Handle;

pub(crate) struct ListNode {
    pub key: Box<[u8]>,
    pub value: Box<[u8]>,
    pub fingerprint: u32,
    pub prev: Option<Handle>,
    pub next: Option<Handle>,
}

/// The ends of the chain. An empty table has neither, a full one has both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, IsVariant)]
pub(crate) enum ListState {
    #[default]
    Empty,
    Full { head: Handle, tail: Handle },
}

impl ListState {
    pub const fn head(&self) -> Option<Handle> {
        match self {
            ListState::Empty => None,
            ListState::Full { head, .. } => Some(*head),
        }
    }

    pub const fn tail(&self) -> Option<Handle> {
        match self {
            ListState::Empty => None,
            ListState::Full { tail, .. } => Some(*tail),
        }
    }
}
