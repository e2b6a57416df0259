//! # Static Game Data
//!
//! Read-only data loaded once at startup and shared behind an immutable
//! handle: the move dex, the random-battle role database and the type chart.

pub mod movedex;
pub mod randbats;

pub use movedex::{EffectTarget, MoveCategory, MoveDef, MoveDex, MoveFlags, Secondary, SecondaryEffect};
pub use randbats::{RandbatsDb, RoleCandidate};

use crate::types::TypeChart;
use std::sync::Arc;

/// Immutable shared handle to all static game data.
///
/// Constructed once per process and passed into `decide`; never a
/// module-level singleton.
#[derive(Debug, Clone)]
pub struct GameData {
    pub movedex: MoveDex,
    pub randbats: RandbatsDb,
    pub type_chart: TypeChart,
}

impl GameData {
    /// Build with the compiled-in move dex and whatever role database can be
    /// found via `RANDBATS_DB_PATH` or the well-known relative paths.
    pub fn load_default() -> Arc<Self> {
        let movedex = MoveDex::builtin();
        let randbats = RandbatsDb::load_default(&movedex);
        Arc::new(Self {
            movedex,
            randbats,
            type_chart: TypeChart::new(),
        })
    }

    /// Build with an explicit role database (tests, embedded data).
    pub fn with_randbats(randbats: RandbatsDb) -> Arc<Self> {
        Arc::new(Self {
            movedex: MoveDex::builtin(),
            randbats,
            type_chart: TypeChart::new(),
        })
    }
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            movedex: MoveDex::builtin(),
            randbats: RandbatsDb::empty(),
            type_chart: TypeChart::new(),
        }
    }
}
