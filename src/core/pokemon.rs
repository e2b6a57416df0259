//! # Pokemon Battle State
//!
//! Per-Pokemon dynamic state inside a `ShadowState`, plus the static identity
//! the planner needs (stats, types, known moves, ability, item).

use crate::types::{
    AbilityId, BaseStats, ItemId, MoveId, PokemonType, SpeciesId, Stat, StatStages, Status,
    Volatiles,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One Pokemon inside a shadow state.
///
/// HP is tracked as a fraction of max HP in [0, 1]; the planner never needs
/// raw HP values. For opposing Pokemon the `moves` list holds only the
/// revealed subset; unrevealed moves come from belief determinisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonState {
    pub species: SpeciesId,
    pub level: u8,
    /// Battle-ready stats at this Pokemon's level
    pub stats: BaseStats,
    /// Current types (mutable for type-changing effects)
    pub types: Vec<PokemonType>,
    /// Known moves (ours: all; theirs: revealed subset)
    pub moves: SmallVec<[MoveId; 4]>,
    pub ability: Option<AbilityId>,
    /// Held item; None when unknown or removed
    pub item: Option<ItemId>,
    pub tera_type: Option<PokemonType>,
    /// HP fraction in [0, 1]; 0 means fainted
    pub hp: f32,
    pub status: Status,
    pub stages: StatStages,
    /// Cleared on switch
    pub volatiles: Volatiles,
}

impl PokemonState {
    pub fn new(species: impl Into<SpeciesId>) -> Self {
        Self {
            species: species.into(),
            level: 80,
            stats: BaseStats::default(),
            types: vec![PokemonType::Normal],
            moves: SmallVec::new(),
            ability: None,
            item: None,
            tera_type: None,
            hp: 1.0,
            status: Status::None,
            stages: StatStages::default(),
            volatiles: Volatiles::default(),
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Grounded check used by hazards and terrain. Flying-types are airborne;
    /// Levitate and Air Balloon are deliberately ignored by the forward model.
    pub fn is_grounded(&self) -> bool {
        !self.types.contains(&PokemonType::Flying)
    }

    pub fn is_poison_type(&self) -> bool {
        self.types.contains(&PokemonType::Poison)
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.item.as_ref().map(|i| i.as_str() == id).unwrap_or(false)
    }

    pub fn has_boots(&self) -> bool {
        self.has_item("heavydutyboots")
    }

    pub fn holds_choice_item(&self) -> bool {
        self.item.as_ref().map(|i| i.is_choice_item()).unwrap_or(false)
    }

    /// Apply an HP delta, clamping to [0, 1].
    pub fn adjust_hp(&mut self, delta: f32) {
        self.hp = (self.hp + delta).clamp(0.0, 1.0);
        if self.hp <= 0.0 {
            self.status = Status::Fainted;
        }
    }

    /// Effective speed stat including paralysis, Choice Scarf and stage
    /// multiplier (tailwind is applied by the side).
    pub fn effective_speed(&self) -> f32 {
        let mut speed = self.stats.speed as f32;
        if self.status == Status::Paralysis {
            speed *= 0.5;
        }
        if self.has_item("choicescarf") {
            speed *= 1.5;
        }
        speed *= StatStages::multiplier(self.stages.get(Stat::Speed));
        speed
    }

    /// Reset everything that clears when this Pokemon leaves the field.
    pub fn clear_on_switch_out(&mut self) {
        self.volatiles = Volatiles::default();
    }
}
