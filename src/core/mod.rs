//! Core battle-state types: Pokemon, sides, field, actions, the shadow
//! state, and the external snapshot contract.

pub mod action;
pub mod field;
pub mod pokemon;
pub mod side;
pub mod snapshot;
pub mod state;

pub use action::Action;
pub use field::FieldState;
pub use pokemon::PokemonState;
pub use side::{SideConditions, SideState, TEAM_SIZE};
pub use snapshot::{BattleSnapshot, PokemonView, SideSnapshot};
pub use state::{ForcedOutcome, ShadowState, SideRef, TurnEvent};
