//! # Action Space
//!
//! One action per turn: use a move, switch to a known teammate, or (for the
//! opposing side only) switch to a still-unseen slot that the transition
//! materialises from the team belief.

use crate::types::MoveId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Use a move by id
    Move(MoveId),
    /// Switch to a known team member by handle
    Switch(usize),
    /// Switch to a still-unseen slot (opposing side only); executing this
    /// materialises a concrete species from the team belief
    SwitchUnseen(usize),
}

impl Action {
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move(_))
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, Action::Switch(_) | Action::SwitchUnseen(_))
    }

    pub fn move_id(&self) -> Option<&MoveId> {
        match self {
            Action::Move(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(id) => write!(f, "move {}", id),
            Action::Switch(handle) => write!(f, "switch #{}", handle),
            Action::SwitchUnseen(slot) => write!(f, "switch to unseen slot {}", slot),
        }
    }
}
