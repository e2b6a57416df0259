//! # Side State
//!
//! One side of the battle: the team arena, the active handle, side
//! conditions, and the per-side counters (protect streak, choice lock, toxic
//! counter). The opposing side additionally carries the belief structures.

use crate::belief::{Belief, TeamBelief};
use crate::constants::{SCREEN_TURNS, TAILWIND_TURNS};
use crate::core::pokemon::PokemonState;
use crate::types::{MoveId, SideCondition};
use std::collections::HashMap;

/// Side condition storage.
///
/// Hazard values are layer counts (spikes 0-3, toxic spikes 0-2, stealth
/// rock / sticky web 0-1); timed condition values are remaining turns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideConditions {
    map: HashMap<SideCondition, u8>,
}

impl SideConditions {
    pub fn get(&self, condition: SideCondition) -> u8 {
        self.map.get(&condition).copied().unwrap_or(0)
    }

    pub fn is_active(&self, condition: SideCondition) -> bool {
        self.get(condition) > 0
    }

    pub fn set(&mut self, condition: SideCondition, value: u8) {
        if value == 0 {
            self.map.remove(&condition);
        } else {
            self.map.insert(condition, value);
        }
    }

    /// Apply a condition from a move: hazards stack a layer up to their cap,
    /// timed conditions (re)start their duration.
    pub fn apply(&mut self, condition: SideCondition) {
        match condition {
            SideCondition::Spikes => {
                let layers = self.get(condition).min(2) + 1;
                self.set(condition, layers);
            }
            SideCondition::ToxicSpikes => {
                let layers = self.get(condition).min(1) + 1;
                self.set(condition, layers);
            }
            SideCondition::StealthRock | SideCondition::StickyWeb => {
                self.set(condition, 1);
            }
            SideCondition::Tailwind => {
                self.set(condition, TAILWIND_TURNS);
            }
            SideCondition::Reflect | SideCondition::LightScreen | SideCondition::AuroraVeil => {
                self.set(condition, SCREEN_TURNS);
            }
        }
    }

    /// Remove all entry hazards (spin / Defog).
    pub fn clear_hazards(&mut self) {
        self.map.retain(|c, _| !c.is_hazard());
    }

    /// Decrement timed conditions by one turn, dropping expired entries.
    /// Hazards are untouched.
    pub fn decrement_timed(&mut self) {
        let timed: Vec<SideCondition> = self
            .map
            .keys()
            .copied()
            .filter(|c| c.is_timed())
            .collect();
        for condition in timed {
            let value = self.get(condition);
            self.set(condition, value.saturating_sub(1));
        }
    }

    pub fn has_any_hazard(&self) -> bool {
        self.map.keys().any(|c| c.is_hazard())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SideCondition, u8)> + '_ {
        self.map.iter().map(|(c, v)| (*c, *v))
    }
}

/// Full team size in a random battle.
pub const TEAM_SIZE: usize = 6;

/// One side of the battle.
///
/// `team` is an arena indexed by handle; `active` is always a handle into
/// it. For the opposing side, `beliefs` parallels `team` and `team_belief`
/// covers the `TEAM_SIZE - team.len()` still-unseen slots.
#[derive(Debug, Clone)]
pub struct SideState {
    pub team: Vec<PokemonState>,
    pub active: usize,
    pub conditions: SideConditions,
    /// Consecutive successful protect uses by the current active
    pub protect_count: u8,
    /// Move the active is choice-locked into
    pub choice_lock: Option<MoveId>,
    /// Toxic escalation counter for the current active; resets on switch
    pub toxic_counter: u8,
    /// Beliefs over revealed opposing Pokemon (parallel to `team`;
    /// all-None for our own side)
    pub beliefs: Vec<Option<Belief>>,
    /// Distribution over species for still-unseen slots (opposing side only)
    pub team_belief: Option<TeamBelief>,
}

impl SideState {
    pub fn new(team: Vec<PokemonState>, active: usize) -> Self {
        let beliefs = vec![None; team.len()];
        Self {
            team,
            active,
            conditions: SideConditions::default(),
            protect_count: 0,
            choice_lock: None,
            toxic_counter: 0,
            beliefs,
            team_belief: None,
        }
    }

    pub fn active_mon(&self) -> &PokemonState {
        &self.team[self.active]
    }

    pub fn active_mon_mut(&mut self) -> &mut PokemonState {
        &mut self.team[self.active]
    }

    pub fn active_belief(&self) -> Option<&Belief> {
        self.beliefs.get(self.active).and_then(|b| b.as_ref())
    }

    pub fn belief_for(&self, handle: usize) -> Option<&Belief> {
        self.beliefs.get(handle).and_then(|b| b.as_ref())
    }

    /// Handles of alive bench Pokemon.
    pub fn alive_bench(&self) -> Vec<usize> {
        (0..self.team.len())
            .filter(|&i| i != self.active && self.team[i].is_alive())
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.team.iter().filter(|m| m.is_alive()).count()
    }

    pub fn all_fainted(&self) -> bool {
        self.team.iter().all(|m| m.is_fainted())
    }

    pub fn hp_sum(&self) -> f32 {
        self.team.iter().map(|m| m.hp.clamp(0.0, 1.0)).sum()
    }

    /// Count of still-unseen slots on this side.
    pub fn unseen_slots(&self) -> usize {
        TEAM_SIZE.saturating_sub(self.team.len())
    }

    /// True when the team belief still has mass for unseen slots.
    pub fn can_materialize_unseen(&self) -> bool {
        self.unseen_slots() > 0
            && self
                .team_belief
                .as_ref()
                .map(|tb| tb.has_mass())
                .unwrap_or(false)
    }

    /// Effective speed of the active including the tailwind doubling.
    pub fn active_effective_speed(&self) -> f32 {
        let mut speed = self.active_mon().effective_speed();
        if self.conditions.is_active(SideCondition::Tailwind) {
            speed *= 2.0;
        }
        speed
    }

    /// Make `handle` the active Pokemon, clearing everything that resets on
    /// switch: the outgoing volatiles, the toxic counter, the choice lock and
    /// the protect streak.
    pub fn switch_to(&mut self, handle: usize) {
        self.active_mon_mut().clear_on_switch_out();
        self.active = handle;
        self.toxic_counter = 0;
        self.choice_lock = None;
        self.protect_count = 0;
    }

    /// Add a newly materialised Pokemon (unseen-slot sampling) and return its
    /// handle.
    pub fn push_materialized(&mut self, mon: PokemonState, belief: Option<Belief>) -> usize {
        self.team.push(mon);
        self.beliefs.push(belief);
        self.team.len() - 1
    }
}
