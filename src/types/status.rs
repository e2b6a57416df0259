//! # Status Type System
//!
//! Non-volatile status conditions and the volatile conditions that clear on
//! switch.

use serde::{Deserialize, Serialize};

/// Pokemon non-volatile status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    None,
    Burn,
    Paralysis,
    Poison,
    /// Badly poisoned: damage escalates with the toxic counter
    Toxic,
    Sleep,
    Freeze,
    Fainted,
}

impl Status {
    pub fn is_none(&self) -> bool {
        matches!(self, Status::None)
    }

    /// True for any status that occupies the single non-volatile slot.
    pub fn blocks_new_status(&self) -> bool {
        !matches!(self, Status::None)
    }

    pub fn is_poisoned(&self) -> bool {
        matches!(self, Status::Poison | Status::Toxic)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::None
    }
}

/// Volatile state attached to the active Pokemon; cleared on switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volatiles {
    /// Remaining sleep turns (0 when not asleep)
    pub sleep_turns: u8,
    /// Remaining confusion turns (0 when not confused)
    pub confusion_turns: u8,
    /// Protect is up for the remainder of this turn
    pub protect_this_turn: bool,
}

impl Volatiles {
    pub fn is_confused(&self) -> bool {
        self.confusion_turns > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_slot_occupancy() {
        assert!(!Status::None.blocks_new_status());
        assert!(Status::Burn.blocks_new_status());
        assert!(Status::Toxic.is_poisoned());
        assert!(Status::Poison.is_poisoned());
        assert!(!Status::Burn.is_poisoned());
    }
}
