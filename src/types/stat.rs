//! # Stat Type System
//!
//! Boostable stats and the compact stat-stage array used by every
//! `PokemonState`. Stages are clamped to [-6, +6] on every write.

use serde::{Deserialize, Serialize};

/// Pokemon stats that can be boosted/lowered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl Stat {
    /// Parse the abbreviated stat keys used by role databases and move data.
    pub fn from_abbrev(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Attack),
            "def" => Some(Stat::Defense),
            "spa" => Some(Stat::SpecialAttack),
            "spd" => Some(Stat::SpecialDefense),
            "spe" => Some(Stat::Speed),
            "accuracy" => Some(Stat::Accuracy),
            "evasion" => Some(Stat::Evasion),
            _ => None,
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Stat::Attack => "atk",
            Stat::Defense => "def",
            Stat::SpecialAttack => "spa",
            Stat::SpecialDefense => "spd",
            Stat::Speed => "spe",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasion",
        }
    }

    pub fn all() -> [Self; 7] {
        [
            Stat::Attack,
            Stat::Defense,
            Stat::SpecialAttack,
            Stat::SpecialDefense,
            Stat::Speed,
            Stat::Accuracy,
            Stat::Evasion,
        ]
    }
}

/// Raw stats of a Pokemon at its battle level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            hp: 100,
            attack: 100,
            defense: 100,
            special_attack: 100,
            special_defense: 100,
            speed: 100,
        }
    }
}

/// Compact array storage for stat stages (-6 to +6).
///
/// More memory efficient than a HashMap; states are cloned per MCTS node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages([i8; 7]);

impl StatStages {
    pub fn get(&self, stat: Stat) -> i8 {
        self.0[stat as usize]
    }

    /// Set the stage for a stat, clamping to the valid range.
    pub fn set(&mut self, stat: Stat, value: i8) {
        self.0[stat as usize] = value.clamp(-6, 6);
    }

    /// Apply a stage delta, clamping the result to [-6, +6].
    pub fn apply(&mut self, stat: Stat, delta: i8) {
        let current = self.0[stat as usize];
        self.0[stat as usize] = (current + delta).clamp(-6, 6);
    }

    pub fn clear(&mut self) {
        self.0 = [0; 7];
    }

    pub fn is_neutral(&self) -> bool {
        self.0 == [0; 7]
    }

    /// Highest positive stage across all stats (0 if none).
    pub fn max_positive(&self) -> i8 {
        self.0.iter().copied().max().unwrap_or(0).max(0)
    }

    /// Multiplier for the main battle stats: `(2+stage)/2` for positive
    /// stages, `2/(2-stage)` for negative.
    pub fn multiplier(stage: i8) -> f32 {
        let stage = stage.clamp(-6, 6) as f32;
        if stage >= 0.0 {
            (2.0 + stage) / 2.0
        } else {
            2.0 / (2.0 - stage)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i8)> + '_ {
        Stat::all().into_iter().map(move |s| (s, self.get(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_clamp_on_apply() {
        let mut stages = StatStages::default();
        stages.apply(Stat::Attack, 4);
        stages.apply(Stat::Attack, 4);
        assert_eq!(stages.get(Stat::Attack), 6);
        stages.apply(Stat::Attack, -13);
        assert_eq!(stages.get(Stat::Attack), -6);
    }

    #[test]
    fn test_stage_multipliers() {
        assert_eq!(StatStages::multiplier(0), 1.0);
        assert_eq!(StatStages::multiplier(1), 1.5);
        assert_eq!(StatStages::multiplier(2), 2.0);
        assert_eq!(StatStages::multiplier(6), 4.0);
        assert!((StatStages::multiplier(-1) - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(StatStages::multiplier(-6), 0.25);
    }

    #[test]
    fn test_max_positive() {
        let mut stages = StatStages::default();
        assert_eq!(stages.max_positive(), 0);
        stages.apply(Stat::Speed, -2);
        assert_eq!(stages.max_positive(), 0);
        stages.apply(Stat::SpecialAttack, 2);
        assert_eq!(stages.max_positive(), 2);
    }
}
