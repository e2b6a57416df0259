//! # End-of-Turn Pipeline
//!
//! Chip damage, item recovery, weather and terrain residuals, and counter
//! bookkeeping, applied to the actives after both actions have resolved.

use crate::constants::{CHIP_BURN, CHIP_POISON, CHIP_SAND, RECOVERY_SIXTEENTH};
use crate::core::state::{ShadowState, SideRef};
use crate::types::{Status, Terrain, Weather};

/// Run the full end-of-turn pipeline:
///
/// 1. status chip on actives (burn 1/16, poison 1/8, toxic counter/16 with
///    counter increment),
/// 2. item recovery (Leftovers, Black Sludge),
/// 3. sandstorm chip on non-immune actives,
/// 4. Grassy Terrain healing for grounded actives,
/// 5. weather/terrain/Trick Room counter advancement,
/// 6. timed side-condition decrement (hazards persist).
pub fn apply_end_of_turn(state: &mut ShadowState) {
    for side_ref in [SideRef::Ours, SideRef::Theirs] {
        apply_status_chip(state, side_ref);
        apply_item_recovery(state, side_ref);
        apply_weather_chip(state, side_ref);
        apply_terrain_heal(state, side_ref);
    }

    state.field.advance_counters();
    state.ours.conditions.decrement_timed();
    state.theirs.conditions.decrement_timed();
}

fn apply_status_chip(state: &mut ShadowState, side_ref: SideRef) {
    let status = state.side(side_ref).active_mon().status;
    match status {
        Status::Burn => {
            state.side_mut(side_ref).active_mon_mut().adjust_hp(-CHIP_BURN);
        }
        Status::Poison => {
            state.side_mut(side_ref).active_mon_mut().adjust_hp(-CHIP_POISON);
        }
        Status::Toxic => {
            let side = state.side_mut(side_ref);
            side.toxic_counter += 1;
            let chip = side.toxic_counter as f32 / 16.0;
            side.active_mon_mut().adjust_hp(-chip);
        }
        _ => {}
    }
}

fn apply_item_recovery(state: &mut ShadowState, side_ref: SideRef) {
    if state.side(side_ref).active_mon().is_fainted() {
        return;
    }
    let mon = state.side(side_ref).active_mon();
    if mon.has_item("leftovers") {
        state
            .side_mut(side_ref)
            .active_mon_mut()
            .adjust_hp(RECOVERY_SIXTEENTH);
    } else if mon.has_item("blacksludge") {
        let delta = if mon.is_poison_type() {
            RECOVERY_SIXTEENTH
        } else {
            -RECOVERY_SIXTEENTH
        };
        state.side_mut(side_ref).active_mon_mut().adjust_hp(delta);
    }
}

fn apply_weather_chip(state: &mut ShadowState, side_ref: SideRef) {
    if state.field.weather != Weather::Sand {
        return;
    }
    let mon = state.side(side_ref).active_mon();
    if mon.is_fainted() || Weather::sand_immune(&mon.types) {
        return;
    }
    state.side_mut(side_ref).active_mon_mut().adjust_hp(-CHIP_SAND);
}

fn apply_terrain_heal(state: &mut ShadowState, side_ref: SideRef) {
    if state.field.terrain != Terrain::Grassy {
        return;
    }
    let mon = state.side(side_ref).active_mon();
    if mon.is_fainted() || !mon.is_grounded() {
        return;
    }
    state
        .side_mut(side_ref)
        .active_mon_mut()
        .adjust_hp(RECOVERY_SIXTEENTH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pokemon::PokemonState;
    use crate::core::side::SideState;
    use crate::types::{ItemId, PokemonType, SideCondition};

    fn basic_state() -> ShadowState {
        let ours = SideState::new(vec![PokemonState::new("a")], 0);
        let theirs = SideState::new(vec![PokemonState::new("b")], 0);
        ShadowState::new(ours, theirs)
    }

    #[test]
    fn test_toxic_counter_ramp() {
        let mut state = basic_state();
        state.theirs.active_mon_mut().status = Status::Toxic;
        let expected = [
            1.0 - 1.0 / 16.0,
            1.0 - 3.0 / 16.0,
            1.0 - 6.0 / 16.0,
            1.0 - 10.0 / 16.0,
        ];
        for hp in expected {
            apply_end_of_turn(&mut state);
            assert!(
                (state.theirs.active_mon().hp - hp).abs() < 1e-5,
                "expected {hp}, got {}",
                state.theirs.active_mon().hp
            );
        }
        assert_eq!(state.theirs.toxic_counter, 4);
    }

    #[test]
    fn test_burn_and_poison_chip() {
        let mut state = basic_state();
        state.ours.active_mon_mut().status = Status::Burn;
        state.theirs.active_mon_mut().status = Status::Poison;
        apply_end_of_turn(&mut state);
        assert!((state.ours.active_mon().hp - (1.0 - 1.0 / 16.0)).abs() < 1e-6);
        assert!((state.theirs.active_mon().hp - (1.0 - 1.0 / 8.0)).abs() < 1e-6);
    }

    #[test]
    fn test_leftovers_and_black_sludge() {
        let mut state = basic_state();
        state.ours.active_mon_mut().hp = 0.5;
        state.ours.active_mon_mut().item = Some(ItemId::new("leftovers"));
        state.theirs.active_mon_mut().hp = 0.5;
        state.theirs.active_mon_mut().item = Some(ItemId::new("blacksludge"));
        apply_end_of_turn(&mut state);
        assert!((state.ours.active_mon().hp - (0.5 + 1.0 / 16.0)).abs() < 1e-6);
        // Non-poison holder is chipped by Black Sludge.
        assert!((state.theirs.active_mon().hp - (0.5 - 1.0 / 16.0)).abs() < 1e-6);
    }

    #[test]
    fn test_sandstorm_immunities() {
        let mut state = basic_state();
        state.field.set_weather(Weather::Sand);
        state.ours.active_mon_mut().types = vec![PokemonType::Steel];
        state.theirs.active_mon_mut().types = vec![PokemonType::Water];
        apply_end_of_turn(&mut state);
        assert_eq!(state.ours.active_mon().hp, 1.0);
        assert!((state.theirs.active_mon().hp - (1.0 - 1.0 / 16.0)).abs() < 1e-6);
    }

    #[test]
    fn test_grassy_terrain_heals_grounded_only() {
        let mut state = basic_state();
        state.field.set_terrain(Terrain::Grassy);
        state.ours.active_mon_mut().hp = 0.5;
        state.ours.active_mon_mut().types = vec![PokemonType::Grass];
        state.theirs.active_mon_mut().hp = 0.5;
        state.theirs.active_mon_mut().types = vec![PokemonType::Flying];
        apply_end_of_turn(&mut state);
        assert!((state.ours.active_mon().hp - (0.5 + 1.0 / 16.0)).abs() < 1e-6);
        assert_eq!(state.theirs.active_mon().hp, 0.5);
    }

    #[test]
    fn test_timed_conditions_decrease_hazards_stay() {
        let mut state = basic_state();
        state.ours.conditions.apply(SideCondition::Reflect);
        state.ours.conditions.set(SideCondition::StealthRock, 1);
        let before = state.ours.conditions.get(SideCondition::Reflect);
        apply_end_of_turn(&mut state);
        assert_eq!(state.ours.conditions.get(SideCondition::Reflect), before - 1);
        assert!(state.ours.conditions.is_active(SideCondition::StealthRock));
    }
}
