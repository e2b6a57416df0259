//! # Battle Snapshot
//!
//! The immutable view of the observable battle the external client must
//! construct each turn. The core never sniffs fields off foreign objects:
//! everything it needs is declared here, and `ShadowState::from_snapshot`
//! turns a snapshot into a root state with fresh beliefs.

use crate::belief::{Belief, TeamBelief};
use crate::core::field::FieldState;
use crate::core::pokemon::PokemonState;
use crate::core::side::{SideState, TEAM_SIZE};
use crate::core::state::ShadowState;
use crate::data::GameData;
use crate::types::{
    AbilityId, BaseStats, DecisionError, DecisionResult, ItemId, MoveId, PokemonType, SideCondition,
    SpeciesId, StatStages, Status, Terrain, Weather,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything the core needs to know about one Pokemon.
///
/// For opposing Pokemon only the revealed subset is filled in; unknown item
/// and ability stay `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonView {
    pub species: SpeciesId,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub stats: BaseStats,
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub moves: Vec<MoveId>,
    #[serde(default)]
    pub ability: Option<AbilityId>,
    #[serde(default)]
    pub item: Option<ItemId>,
    #[serde(default)]
    pub tera_type: Option<PokemonType>,
    #[serde(default = "default_hp")]
    pub hp_fraction: f32,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub stages: StatStages,
}

fn default_level() -> u8 {
    80
}

fn default_hp() -> f32 {
    1.0
}

/// One side of the observable battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideSnapshot {
    pub pokemon: Vec<PokemonView>,
    #[serde(default)]
    pub active: usize,
    #[serde(default)]
    pub conditions: Vec<(SideCondition, u8)>,
}

/// The full observable battle state for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub ours: SideSnapshot,
    pub theirs: SideSnapshot,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub weather_turns_elapsed: u8,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub terrain_turns_elapsed: u8,
    #[serde(default)]
    pub trick_room: bool,
    #[serde(default)]
    pub trick_room_turns_elapsed: u8,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub finished: bool,
}

impl PokemonView {
    fn to_state(&self) -> PokemonState {
        let mut mon = PokemonState::new(self.species.clone());
        mon.level = self.level;
        mon.stats = self.stats;
        mon.types = self.types.clone();
        mon.moves = self.moves.iter().cloned().collect();
        mon.ability = self.ability.clone();
        mon.item = self.item.clone();
        mon.tera_type = self.tera_type;
        mon.hp = self.hp_fraction.clamp(0.0, 1.0);
        mon.status = if mon.hp <= 0.0 { Status::Fainted } else { self.status };
        if mon.status == Status::Sleep {
            // The remote counter is hidden; assume the middle of the 1-3 range.
            mon.volatiles.sleep_turns = 2;
        }
        mon.stages = self.stages;
        mon
    }
}

impl SideSnapshot {
    fn validate(&self, label: &str) -> DecisionResult<()> {
        if self.pokemon.is_empty() {
            return Err(DecisionError::InvalidSnapshot {
                reason: format!("{label} side has no pokemon"),
            });
        }
        if self.active >= self.pokemon.len() {
            return Err(DecisionError::InvalidSnapshot {
                reason: format!(
                    "{label} active index {} out of range ({} pokemon)",
                    self.active,
                    self.pokemon.len()
                ),
            });
        }
        if self.pokemon.len() > TEAM_SIZE {
            return Err(DecisionError::InvalidSnapshot {
                reason: format!("{label} side has more than {TEAM_SIZE} pokemon"),
            });
        }
        Ok(())
    }

    fn to_side(&self) -> SideState {
        let team: Vec<PokemonState> = self.pokemon.iter().map(|p| p.to_state()).collect();
        let mut side = SideState::new(team, self.active);
        for (condition, value) in &self.conditions {
            side.conditions.set(*condition, *value);
        }
        side
    }
}

impl ShadowState {
    /// Build a root shadow state from an observed snapshot, constructing
    /// fresh beliefs for every revealed opposing Pokemon and a team belief
    /// over the still-unseen slots.
    pub fn from_snapshot(snapshot: &BattleSnapshot, data: &GameData) -> DecisionResult<Self> {
        snapshot.ours.validate("our")?;
        snapshot.theirs.validate("their")?;

        let ours = snapshot.ours.to_side();
        let mut theirs = snapshot.theirs.to_side();

        // Beliefs for every revealed opposing Pokemon.
        for (handle, view) in snapshot.theirs.pokemon.iter().enumerate() {
            let revealed: BTreeSet<MoveId> = view.moves.iter().cloned().collect();
            theirs.beliefs[handle] = Some(Belief::build(
                view.species.clone(),
                &revealed,
                view.item.clone(),
                view.ability.clone(),
                view.tera_type,
                data,
            ));
        }

        // Team belief over unseen slots.
        let revealed_species: BTreeSet<SpeciesId> = snapshot
            .theirs
            .pokemon
            .iter()
            .map(|p| p.species.clone())
            .collect();
        theirs.team_belief = Some(TeamBelief::build(data, &revealed_species));

        let mut field = FieldState::default();
        field.weather = snapshot.weather;
        field.weather_counter = snapshot.weather_turns_elapsed;
        field.terrain = snapshot.terrain;
        field.terrain_counter = snapshot.terrain_turns_elapsed;
        field.trick_room = snapshot.trick_room;
        field.trick_room_counter = snapshot.trick_room_turns_elapsed;

        let mut state = ShadowState::new(ours, theirs);
        state.field = field;
        state.finished = snapshot.finished;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(species: &str, moves: &[&str]) -> PokemonView {
        PokemonView {
            species: SpeciesId::new(species),
            level: 80,
            stats: BaseStats::default(),
            types: vec![PokemonType::Normal],
            moves: moves.iter().map(|m| MoveId::new(*m)).collect(),
            ability: None,
            item: None,
            tera_type: None,
            hp_fraction: 1.0,
            status: Status::None,
            stages: StatStages::default(),
        }
    }

    fn snapshot() -> BattleSnapshot {
        BattleSnapshot {
            ours: SideSnapshot {
                pokemon: vec![view("garchomp", &["earthquake"])],
                active: 0,
                conditions: vec![],
            },
            theirs: SideSnapshot {
                pokemon: vec![view("corviknight", &["bravebird"])],
                active: 0,
                conditions: vec![(SideCondition::StealthRock, 1)],
            },
            weather: Weather::None,
            weather_turns_elapsed: 0,
            terrain: Terrain::None,
            terrain_turns_elapsed: 0,
            trick_room: false,
            trick_room_turns_elapsed: 0,
            turn: 1,
            finished: false,
        }
    }

    #[test]
    fn test_from_snapshot_builds_beliefs() {
        let data = GameData::default();
        let state = ShadowState::from_snapshot(&snapshot(), &data).unwrap();
        assert!(state.theirs.beliefs[0].is_some());
        assert!(state.theirs.team_belief.is_some());
        assert!(state
            .theirs
            .conditions
            .is_active(SideCondition::StealthRock));
    }

    #[test]
    fn test_invalid_active_index_rejected() {
        let data = GameData::default();
        let mut snap = snapshot();
        snap.ours.active = 5;
        assert!(ShadowState::from_snapshot(&snap, &data).is_err());
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snap = snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: BattleSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ours.pokemon[0].species, SpeciesId::new("garchomp"));
    }
}
