//! # Pokemon Type System
//!
//! The single source of truth for type identities and the Gen 9 type
//! effectiveness chart used by the damage calculator and hazard logic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pokemon types with numeric indices for the effectiveness matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PokemonType {
    Normal = 0,
    Fire = 1,
    Water = 2,
    Electric = 3,
    Grass = 4,
    Ice = 5,
    Fighting = 6,
    Poison = 7,
    Ground = 8,
    Flying = 9,
    Psychic = 10,
    Bug = 11,
    Rock = 12,
    Ghost = 13,
    Dragon = 14,
    Dark = 15,
    Steel = 16,
    Fairy = 17,
    /// Internal type for moves without a real type (like Struggle)
    Typeless = 18,
}

impl PokemonType {
    /// Convert from a normalized string (case-insensitive).
    pub fn from_normalized_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "normal" => Some(Self::Normal),
            "fire" => Some(Self::Fire),
            "water" => Some(Self::Water),
            "electric" => Some(Self::Electric),
            "grass" => Some(Self::Grass),
            "ice" => Some(Self::Ice),
            "fighting" => Some(Self::Fighting),
            "poison" => Some(Self::Poison),
            "ground" => Some(Self::Ground),
            "flying" => Some(Self::Flying),
            "psychic" => Some(Self::Psychic),
            "bug" => Some(Self::Bug),
            "rock" => Some(Self::Rock),
            "ghost" => Some(Self::Ghost),
            "dragon" => Some(Self::Dragon),
            "dark" => Some(Self::Dark),
            "steel" => Some(Self::Steel),
            "fairy" => Some(Self::Fairy),
            "typeless" | "???" => Some(Self::Typeless),
            _ => None,
        }
    }

    /// String representation used for display and serialization to data files.
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Electric => "Electric",
            Self::Grass => "Grass",
            Self::Ice => "Ice",
            Self::Fighting => "Fighting",
            Self::Poison => "Poison",
            Self::Ground => "Ground",
            Self::Flying => "Flying",
            Self::Psychic => "Psychic",
            Self::Bug => "Bug",
            Self::Rock => "Rock",
            Self::Ghost => "Ghost",
            Self::Dragon => "Dragon",
            Self::Dark => "Dark",
            Self::Steel => "Steel",
            Self::Fairy => "Fairy",
            Self::Typeless => "Typeless",
        }
    }

    /// All real types (for iteration; excludes Typeless).
    pub fn all_types() -> [Self; 18] {
        [
            Self::Normal,
            Self::Fire,
            Self::Water,
            Self::Electric,
            Self::Grass,
            Self::Ice,
            Self::Fighting,
            Self::Poison,
            Self::Ground,
            Self::Flying,
            Self::Psychic,
            Self::Bug,
            Self::Rock,
            Self::Ghost,
            Self::Dragon,
            Self::Dark,
            Self::Steel,
            Self::Fairy,
        ]
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Gen 9 type effectiveness chart.
///
/// Stored as a 19x19 matrix indexed by `[attacking][defending]`; Typeless
/// attacks and defends neutrally.
#[derive(Debug, Clone)]
pub struct TypeChart {
    effectiveness: [[f32; 19]; 19],
}

impl TypeChart {
    pub fn new() -> Self {
        let mut chart = Self {
            effectiveness: [[1.0; 19]; 19],
        };
        chart.populate_gen9();
        chart
    }

    /// Multiplier for one attacking type against one defending type.
    pub fn effectiveness(&self, attacking: PokemonType, defending: PokemonType) -> f32 {
        self.effectiveness[attacking as usize][defending as usize]
    }

    /// Combined multiplier against a (possibly dual-typed) defender.
    pub fn effectiveness_against(&self, attacking: PokemonType, defender_types: &[PokemonType]) -> f32 {
        defender_types
            .iter()
            .map(|t| self.effectiveness(attacking, *t))
            .product()
    }

    fn set(&mut self, attacking: PokemonType, defending: PokemonType, multiplier: f32) {
        self.effectiveness[attacking as usize][defending as usize] = multiplier;
    }

    fn populate_gen9(&mut self) {
        use PokemonType::*;

        // Normal
        self.set(Normal, Rock, 0.5);
        self.set(Normal, Ghost, 0.0);
        self.set(Normal, Steel, 0.5);

        // Fire
        self.set(Fire, Fire, 0.5);
        self.set(Fire, Water, 0.5);
        self.set(Fire, Grass, 2.0);
        self.set(Fire, Ice, 2.0);
        self.set(Fire, Bug, 2.0);
        self.set(Fire, Rock, 0.5);
        self.set(Fire, Dragon, 0.5);
        self.set(Fire, Steel, 2.0);

        // Water
        self.set(Water, Fire, 2.0);
        self.set(Water, Water, 0.5);
        self.set(Water, Grass, 0.5);
        self.set(Water, Ground, 2.0);
        self.set(Water, Rock, 2.0);
        self.set(Water, Dragon, 0.5);

        // Electric
        self.set(Electric, Water, 2.0);
        self.set(Electric, Electric, 0.5);
        self.set(Electric, Grass, 0.5);
        self.set(Electric, Ground, 0.0);
        self.set(Electric, Flying, 2.0);
        self.set(Electric, Dragon, 0.5);

        // Grass
        self.set(Grass, Fire, 0.5);
        self.set(Grass, Water, 2.0);
        self.set(Grass, Grass, 0.5);
        self.set(Grass, Poison, 0.5);
        self.set(Grass, Ground, 2.0);
        self.set(Grass, Flying, 0.5);
        self.set(Grass, Bug, 0.5);
        self.set(Grass, Rock, 2.0);
        self.set(Grass, Dragon, 0.5);
        self.set(Grass, Steel, 0.5);

        // Ice
        self.set(Ice, Fire, 0.5);
        self.set(Ice, Water, 0.5);
        self.set(Ice, Grass, 2.0);
        self.set(Ice, Ice, 0.5);
        self.set(Ice, Ground, 2.0);
        self.set(Ice, Flying, 2.0);
        self.set(Ice, Dragon, 2.0);
        self.set(Ice, Steel, 0.5);

        // Fighting
        self.set(Fighting, Normal, 2.0);
        self.set(Fighting, Ice, 2.0);
        self.set(Fighting, Poison, 0.5);
        self.set(Fighting, Flying, 0.5);
        self.set(Fighting, Psychic, 0.5);
        self.set(Fighting, Bug, 0.5);
        self.set(Fighting, Rock, 2.0);
        self.set(Fighting, Ghost, 0.0);
        self.set(Fighting, Dark, 2.0);
        self.set(Fighting, Steel, 2.0);
        self.set(Fighting, Fairy, 0.5);

        // Poison
        self.set(Poison, Grass, 2.0);
        self.set(Poison, Poison, 0.5);
        self.set(Poison, Ground, 0.5);
        self.set(Poison, Rock, 0.5);
        self.set(Poison, Ghost, 0.5);
        self.set(Poison, Steel, 0.0);
        self.set(Poison, Fairy, 2.0);

        // Ground
        self.set(Ground, Fire, 2.0);
        self.set(Ground, Electric, 2.0);
        self.set(Ground, Grass, 0.5);
        self.set(Ground, Poison, 2.0);
        self.set(Ground, Flying, 0.0);
        self.set(Ground, Bug, 0.5);
        self.set(Ground, Rock, 2.0);
        self.set(Ground, Steel, 2.0);

        // Flying
        self.set(Flying, Electric, 0.5);
        self.set(Flying, Grass, 2.0);
        self.set(Flying, Fighting, 2.0);
        self.set(Flying, Bug, 2.0);
        self.set(Flying, Rock, 0.5);
        self.set(Flying, Steel, 0.5);

        // Psychic
        self.set(Psychic, Fighting, 2.0);
        self.set(Psychic, Poison, 2.0);
        self.set(Psychic, Psychic, 0.5);
        self.set(Psychic, Dark, 0.0);
        self.set(Psychic, Steel, 0.5);

        // Bug
        self.set(Bug, Fire, 0.5);
        self.set(Bug, Grass, 2.0);
        self.set(Bug, Fighting, 0.5);
        self.set(Bug, Poison, 0.5);
        self.set(Bug, Flying, 0.5);
        self.set(Bug, Psychic, 2.0);
        self.set(Bug, Ghost, 0.5);
        self.set(Bug, Dark, 2.0);
        self.set(Bug, Steel, 0.5);
        self.set(Bug, Fairy, 0.5);

        // Rock
        self.set(Rock, Fire, 2.0);
        self.set(Rock, Ice, 2.0);
        self.set(Rock, Fighting, 0.5);
        self.set(Rock, Ground, 0.5);
        self.set(Rock, Flying, 2.0);
        self.set(Rock, Bug, 2.0);
        self.set(Rock, Steel, 0.5);

        // Ghost
        self.set(Ghost, Normal, 0.0);
        self.set(Ghost, Psychic, 2.0);
        self.set(Ghost, Ghost, 2.0);
        self.set(Ghost, Dark, 0.5);

        // Dragon
        self.set(Dragon, Dragon, 2.0);
        self.set(Dragon, Steel, 0.5);
        self.set(Dragon, Fairy, 0.0);

        // Dark
        self.set(Dark, Fighting, 0.5);
        self.set(Dark, Psychic, 2.0);
        self.set(Dark, Ghost, 2.0);
        self.set(Dark, Dark, 0.5);
        self.set(Dark, Fairy, 0.5);

        // Steel
        self.set(Steel, Fire, 0.5);
        self.set(Steel, Water, 0.5);
        self.set(Steel, Electric, 0.5);
        self.set(Steel, Ice, 2.0);
        self.set(Steel, Rock, 2.0);
        self.set(Steel, Steel, 0.5);
        self.set(Steel, Fairy, 2.0);

        // Fairy
        self.set(Fairy, Fire, 0.5);
        self.set(Fairy, Fighting, 2.0);
        self.set(Fairy, Poison, 0.5);
        self.set(Fairy, Dragon, 2.0);
        self.set(Fairy, Dark, 2.0);
        self.set(Fairy, Steel, 0.5);
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immunities() {
        let chart = TypeChart::new();
        assert_eq!(chart.effectiveness(PokemonType::Normal, PokemonType::Ghost), 0.0);
        assert_eq!(chart.effectiveness(PokemonType::Electric, PokemonType::Ground), 0.0);
        assert_eq!(chart.effectiveness(PokemonType::Ground, PokemonType::Flying), 0.0);
        assert_eq!(chart.effectiveness(PokemonType::Dragon, PokemonType::Fairy), 0.0);
    }

    #[test]
    fn test_dual_type_stacking() {
        let chart = TypeChart::new();
        // Rock vs Fire/Flying (Charizard): 2.0 * 2.0 = 4x
        let mult = chart.effectiveness_against(
            PokemonType::Rock,
            &[PokemonType::Fire, PokemonType::Flying],
        );
        assert_eq!(mult, 4.0);
        // Grass vs Water/Ground: 2.0 * 2.0 = 4x
        let mult = chart.effectiveness_against(
            PokemonType::Grass,
            &[PokemonType::Water, PokemonType::Ground],
        );
        assert_eq!(mult, 4.0);
    }

    #[test]
    fn test_typeless_is_neutral() {
        let chart = TypeChart::new();
        for t in PokemonType::all_types() {
            assert_eq!(chart.effectiveness(PokemonType::Typeless, t), 1.0);
        }
    }
}
