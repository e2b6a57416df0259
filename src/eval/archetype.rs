//! Archetype tagging for the evaluator.
//!
//! Works from known information only: revealed move ids and battle stats.
//! The belief side of the evaluator uses the role-candidate tags instead.

use crate::constants;
use crate::core::pokemon::PokemonState;

pub fn is_physical_attacker(mon: &PokemonState) -> bool {
    mon.stats.attack as f32 > mon.stats.special_attack as f32 * 1.1
}

pub fn is_fast_sweeper(mon: &PokemonState) -> bool {
    mon.stats.speed >= 100
}

pub fn is_defensive(mon: &PokemonState) -> bool {
    let bulk = mon.stats.hp as f32
        * (mon.stats.defense as f32 + mon.stats.special_defense as f32)
        / 2.0;
    bulk > 65_000.0
}

pub fn has_setup_potential(mon: &PokemonState) -> bool {
    mon.moves.iter().any(|m| constants::is_setup_move(m.as_str()))
}

pub fn has_priority_move(mon: &PokemonState) -> bool {
    mon.moves.iter().any(|m| constants::is_priority_move(m.as_str()))
}

pub fn has_removal(mon: &PokemonState) -> bool {
    mon.moves.iter().any(|m| constants::is_hazard_removal(m.as_str()))
}

pub fn has_hazards(mon: &PokemonState) -> bool {
    mon.moves.iter().any(|m| constants::is_hazard_move(m.as_str()))
}

pub fn has_pivot_move(mon: &PokemonState) -> bool {
    mon.moves.iter().any(|m| constants::is_pivot_move(m.as_str()))
}

/// Strategic weight of one of our own Pokemon from known information.
pub fn self_role_weight(mon: &PokemonState) -> f32 {
    let mut w: f32 = 1.0;
    if has_setup_potential(mon) {
        w *= 1.08;
    }
    if has_priority_move(mon) {
        w *= 1.04;
    }
    if has_hazards(mon) {
        w *= 1.04;
    }
    if has_removal(mon) {
        w *= 1.03;
    }
    if let Some(ability) = &mon.ability {
        if constants::is_weather_ability(ability.as_str()) {
            w *= 1.06;
        }
    }
    w.clamp(0.85, 1.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoveId;

    #[test]
    fn test_role_weight_range() {
        let mut mon = PokemonState::new("a");
        assert_eq!(self_role_weight(&mon), 1.0);
        mon.moves.push(MoveId::new("swordsdance"));
        mon.moves.push(MoveId::new("aquajet"));
        mon.moves.push(MoveId::new("stealthrock"));
        let w = self_role_weight(&mon);
        assert!(w > 1.0 && w <= 1.25);
    }

    #[test]
    fn test_archetype_from_stats() {
        let mut mon = PokemonState::new("a");
        mon.stats.attack = 200;
        mon.stats.special_attack = 100;
        assert!(is_physical_attacker(&mon));
        mon.stats.speed = 120;
        assert!(is_fast_sweeper(&mon));
    }
}
