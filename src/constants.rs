//! # Battle Constants
//!
//! Move-id classification sets and end-of-turn chip fractions shared by the
//! turn engine, scoring heuristics and evaluator.

/// Burn chip per end-of-turn
pub const CHIP_BURN: f32 = 1.0 / 16.0;
/// Regular poison chip per end-of-turn
pub const CHIP_POISON: f32 = 1.0 / 8.0;
/// Sandstorm chip to non-immune actives
pub const CHIP_SAND: f32 = 1.0 / 16.0;
/// Leftovers / Black Sludge / Grassy Terrain recovery per end-of-turn
pub const RECOVERY_SIXTEENTH: f32 = 1.0 / 16.0;
/// Life Orb recoil after a damaging move
pub const LIFE_ORB_RECOIL: f32 = 1.0 / 10.0;
/// Self-hit damage when confused
pub const CONFUSION_SELF_HIT: f32 = 0.05;
/// Crash damage for crash-on-miss moves (High Jump Kick)
pub const CRASH_DAMAGE: f32 = 0.5;

/// Thaw chance per turn while frozen
pub const THAW_CHANCE: f32 = 0.20;
/// Full paralysis chance
pub const FULL_PARALYSIS_CHANCE: f32 = 0.25;
/// Confusion self-hit chance
pub const CONFUSION_SELF_HIT_CHANCE: f32 = 1.0 / 3.0;

/// Base critical hit chance (crit class 0)
pub const BASE_CRIT_CHANCE: f32 = 1.0 / 24.0;
/// Critical hit damage multiplier
pub const CRIT_MULTIPLIER: f32 = 1.5;

/// Field counters (weather/terrain/trick room) expire when they reach this value
pub const FIELD_EXPIRY: u8 = 5;
/// Tailwind duration in turns
pub const TAILWIND_TURNS: u8 = 4;
/// Screen (Reflect / Light Screen / Aurora Veil) duration in turns
pub const SCREEN_TURNS: u8 = 5;

/// Spikes entry damage by layer count (index 0 = one layer)
pub const SPIKES_DAMAGE: [f32; 3] = [1.0 / 8.0, 1.0 / 6.0, 1.0 / 4.0];
/// Stealth Rock base entry damage before type effectiveness
pub const STEALTH_ROCK_BASE: f32 = 1.0 / 8.0;

/// Protect and its variants
pub fn is_protect_move(id: &str) -> bool {
    matches!(
        id,
        "protect" | "detect" | "kingsshield" | "banefulbunker" | "spikyshield" | "silktrap" | "obstruct"
    )
}

/// Damaging moves that switch the user out on a hit
pub fn is_pivot_move(id: &str) -> bool {
    matches!(
        id,
        "uturn"
            | "voltswitch"
            | "flipturn"
            | "partingshot"
            | "teleport"
            | "chillyreception"
            | "batonpass"
            | "shedtail"
    )
}

/// Moves that clear hazards from the user's side only
pub fn is_own_side_hazard_removal(id: &str) -> bool {
    matches!(id, "rapidspin" | "tidyup" | "mortalspin")
}

/// Moves that clear hazards from both sides
pub fn is_both_sides_hazard_removal(id: &str) -> bool {
    matches!(id, "defog")
}

pub fn is_hazard_removal(id: &str) -> bool {
    is_own_side_hazard_removal(id) || is_both_sides_hazard_removal(id)
}

/// Entry hazard setting moves
pub fn is_hazard_move(id: &str) -> bool {
    matches!(id, "stealthrock" | "spikes" | "toxicspikes" | "stickyweb")
}

/// Stat-boosting setup moves used for archetype tagging
pub fn is_setup_move(id: &str) -> bool {
    matches!(
        id,
        "swordsdance"
            | "nastyplot"
            | "dragondance"
            | "calmmind"
            | "bulkup"
            | "quiverdance"
            | "shellsmash"
            | "bellydrum"
            | "shiftgear"
            | "agility"
            | "tailglow"
            | "coil"
            | "curse"
            | "growth"
            | "rockpolish"
            | "workup"
            | "cosmicpower"
    )
}

/// Common damaging priority moves used for archetype tagging
pub fn is_priority_move(id: &str) -> bool {
    matches!(
        id,
        "extremespeed"
            | "aquajet"
            | "machpunch"
            | "iceshard"
            | "suckerpunch"
            | "bulletpunch"
            | "shadowsneak"
            | "quickattack"
            | "vacuumwave"
            | "firstimpression"
            | "grassyglide"
            | "jetpunch"
    )
}

/// Weather-setting abilities used for role weighting
pub fn is_weather_ability(id: &str) -> bool {
    matches!(id, "drought" | "drizzle" | "sandstream" | "snowwarning")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_classification() {
        assert!(is_protect_move("protect"));
        assert!(is_protect_move("silktrap"));
        assert!(!is_protect_move("tackle"));
        assert!(is_pivot_move("uturn"));
        assert!(is_pivot_move("chillyreception"));
        assert!(is_own_side_hazard_removal("rapidspin"));
        assert!(is_both_sides_hazard_removal("defog"));
        assert!(!is_own_side_hazard_removal("defog"));
        assert!(is_setup_move("swordsdance"));
        assert!(is_priority_move("suckerpunch"));
    }

    #[test]
    fn test_spikes_table_matches_layer_rules() {
        assert_eq!(SPIKES_DAMAGE[0], 1.0 / 8.0);
        assert_eq!(SPIKES_DAMAGE[1], 1.0 / 6.0);
        assert_eq!(SPIKES_DAMAGE[2], 1.0 / 4.0);
    }
}
