//! Shared builders for the end-to-end scenario tests.
#![allow(dead_code)]

use oranguru::core::pokemon::PokemonState;
use oranguru::core::side::SideState;
use oranguru::core::ShadowState;
use oranguru::data::{GameData, MoveDex, RandbatsDb};
use oranguru::types::{MoveId, PokemonType, SpeciesId};
use std::sync::Arc;

pub fn mon(species: &str, types: &[PokemonType], moves: &[&str]) -> PokemonState {
    let mut m = PokemonState::new(species);
    m.types = types.to_vec();
    m.moves = moves.iter().map(|s| MoveId::new(*s)).collect();
    m
}

pub fn state(ours: Vec<PokemonState>, theirs: Vec<PokemonState>) -> ShadowState {
    ShadowState::new(SideState::new(ours, 0), SideState::new(theirs, 0))
}

pub fn data() -> Arc<GameData> {
    Arc::new(GameData::default())
}

/// Game data with a small role database, for tests that need beliefs and
/// unseen-slot sampling.
pub fn data_with_roles() -> Arc<GameData> {
    let json = r#"{
        "Garchomp": {
            "level": 76,
            "roles": {
                "Fast Attacker": {
                    "moves": ["Earthquake", "Dragon Claw", "Stone Edge", "Fire Blast"],
                    "items": ["Choice Scarf"]
                },
                "Setup Sweeper": {
                    "moves": ["Earthquake", "Dragon Claw", "Swords Dance", "Iron Head"],
                    "items": ["Heavy-Duty Boots"]
                }
            }
        },
        "Heatran": {
            "roles": {
                "Special Wall": {
                    "moves": ["Lava Plume", "Stealth Rock", "Earth Power", "Flash Cannon"],
                    "items": ["Leftovers"]
                }
            }
        },
        "Corviknight": {
            "roles": {
                "Bulky Support": {
                    "moves": ["Brave Bird", "Roost", "Defog", "U-turn"],
                    "items": ["Leftovers", "Rocky Helmet"]
                }
            }
        },
        "Toxapex": {
            "roles": {
                "Wall": {
                    "moves": ["Scald", "Recover", "Toxic", "Toxic Spikes"],
                    "items": ["Black Sludge"]
                }
            }
        }
    }"#;
    let dex = MoveDex::builtin();
    GameData::with_randbats(RandbatsDb::from_json(json, &dex).unwrap())
}

pub fn species(name: &str) -> SpeciesId {
    SpeciesId::new(name)
}
