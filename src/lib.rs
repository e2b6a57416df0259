//! # Oranguru
//!
//! A belief-aware MCTS decision engine for turn-based Pokemon random
//! battles. Given the observable battle state, it picks the action (use a
//! move, or switch) that maximises the expected probability of winning under
//! partial information about the opponent's team.
//!
//! ## Architecture Overview
//!
//! - `belief`: posterior distributions over hidden opponent roles, moves,
//!   items and abilities, with per-simulation determinisation
//! - `core`: the shadow state (the planner's self-sufficient battle clone),
//!   actions, and the external snapshot contract
//! - `engine`: the one-turn forward model: damage, status, hazards, field
//!   effects, end-of-turn residuals and forced replacement
//! - `scoring`: the heuristic move/switch scores that seed search priors
//!   and model opponent policy
//! - `eval`: the multi-term positional evaluator used at search leaves
//! - `search`: the PUCT planner with hybrid outcome expansion
//! - `agent`: the per-turn `decide` / `update_belief` entry points
//!
//! The static game data (move dex, random-battle role database, type chart)
//! is loaded once into a [`data::GameData`] handle and shared read-only.

pub mod agent;
pub mod belief;
pub mod config;
pub mod constants;
pub mod core;
pub mod data;
pub mod engine;
pub mod eval;
pub mod io;
pub mod scoring;
pub mod search;
pub mod types;
pub mod utils;

// Primary API exports
pub use agent::{decide, Agent, Decision, DecisionAction};
pub use config::{SearchConfig, SearchConfigBuilder};
pub use crate::core::{Action, BattleSnapshot, PokemonView, ShadowState, SideSnapshot};
pub use data::GameData;
pub use engine::step;
pub use eval::evaluate;
pub use search::{run_search, ActionStats, SearchResult};

// Utility re-exports
pub use utils::normalize_name;
