//! Delete confirmation state machine.

use crate::types::ItemId;

/// `Idle -> Pending -> Committing -> Idle`, with at most one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationState {
    #[default]
    Idle,
    Pending(ItemId),
    Committing(ItemId),
}

impl ConfirmationState {
    /// Ask to delete `id`. Replaces a pending target; ignored while committing.
    pub fn request(&mut self, id: ItemId) -> bool {
        match self {
            ConfirmationState::Committing(_) => false,
            _ => {
                *self = ConfirmationState::Pending(id);
                true
            }
        }
    }

    pub fn cancel(&mut self) -> bool {
        match self {
            ConfirmationState::Pending(_) => {
                *self = ConfirmationState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Move a pending target to committing and return it.
    pub fn confirm(&mut self) -> Option<ItemId> {
        match *self {
            ConfirmationState::Pending(id) => {
                *self = ConfirmationState::Committing(id);
                Some(id)
            }
            _ => None,
        }
    }

    /// Finish the delete of `id`, whatever its outcome.
    pub fn settle(&mut self, id: ItemId) -> bool {
        match *self {
            ConfirmationState::Committing(current) if current == id => {
                *self = ConfirmationState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn target(&self) -> Option<ItemId> {
        match *self {
            ConfirmationState::Idle => None,
            ConfirmationState::Pending(id) | ConfirmationState::Committing(id) => Some(id),
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self, ConfirmationState::Committing(_))
    }

    /// Prompt text for a pending delete of `label`.
    pub fn message(&self, label: &str) -> Option<String> {
        match self {
            ConfirmationState::Pending(_) => Some(format!("Delete '{label}'? This cannot be undone.")),
            ConfirmationState::Committing(_) => Some(format!("Deleting '{label}'...")),
            ConfirmationState::Idle => None,
        }
    }
}
