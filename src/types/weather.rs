use crate::types::PokemonType;
use serde::{Deserialize, Serialize};

/// Weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    None,
    Sun,
    Rain,
    Sand,
    Snow,
}

impl Weather {
    pub fn from_normalized_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Weather::None),
            "sun" | "sunnyday" => Some(Weather::Sun),
            "rain" | "raindance" => Some(Weather::Rain),
            "sand" | "sandstorm" => Some(Weather::Sand),
            "snow" | "hail" | "snowscape" => Some(Weather::Snow),
            _ => None,
        }
    }

    /// Types immune to sandstorm chip damage.
    pub fn sand_immune(types: &[PokemonType]) -> bool {
        types
            .iter()
            .any(|t| matches!(t, PokemonType::Rock | PokemonType::Steel | PokemonType::Ground))
    }
}

impl Default for Weather {
    fn default() -> Self {
        Weather::None
    }
}
