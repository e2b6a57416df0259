//! # Switch Resolution
//!
//! Switch application and entry hazards. Switching clears the outgoing
//! Pokemon's volatiles and the side's per-active counters, then applies
//! hazards to the incoming Pokemon in order: Stealth Rock, Spikes, Toxic
//! Spikes, Sticky Web. Heavy-Duty Boots negate all of it.

use crate::belief::Belief;
use crate::constants::{SPIKES_DAMAGE, STEALTH_ROCK_BASE};
use crate::core::pokemon::PokemonState;
use crate::core::side::SideConditions;
use crate::core::state::{ShadowState, SideRef, TurnEvent};
use crate::data::GameData;
use crate::types::{PokemonType, SideCondition, SpeciesId, Stat, Status, TypeChart};
use rand::rngs::StdRng;
use std::collections::BTreeSet;

/// What entry hazards do to one incoming Pokemon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HazardOutcome {
    pub damage: f32,
    pub inflict_status: Option<Status>,
    pub speed_drop: bool,
    /// Grounded Poison-types soak up every toxic spikes layer
    pub absorbs_toxic_spikes: bool,
}

/// Compute hazard effects for a Pokemon entering on `conditions`.
pub fn hazards_on_entry(
    mon: &PokemonState,
    conditions: &SideConditions,
    chart: &TypeChart,
) -> HazardOutcome {
    if mon.has_boots() {
        return HazardOutcome::default();
    }

    let mut outcome = HazardOutcome::default();
    let grounded = mon.is_grounded();

    if conditions.is_active(SideCondition::StealthRock) {
        let eff = chart.effectiveness_against(PokemonType::Rock, &mon.types);
        outcome.damage += STEALTH_ROCK_BASE * eff;
    }

    let spikes = conditions.get(SideCondition::Spikes).min(3);
    if spikes > 0 && grounded {
        outcome.damage += SPIKES_DAMAGE[(spikes - 1) as usize];
    }

    let tspikes = conditions.get(SideCondition::ToxicSpikes).min(2);
    if tspikes > 0 && grounded {
        if mon.is_poison_type() {
            outcome.absorbs_toxic_spikes = true;
        } else if !mon.types.contains(&PokemonType::Steel) && mon.status.is_none() {
            outcome.inflict_status = Some(if tspikes >= 2 {
                Status::Toxic
            } else {
                Status::Poison
            });
        }
    }

    if conditions.is_active(SideCondition::StickyWeb) && grounded {
        outcome.speed_drop = true;
    }

    outcome
}

/// Switch `side` to the team member at `handle`, applying entry hazards.
///
/// Switching to a fainted or already-active handle is a no-op rather than a
/// panic so a bad sampled action cannot poison a whole simulation.
pub fn apply_switch(state: &mut ShadowState, side_ref: SideRef, handle: usize, chart: &TypeChart) {
    {
        let side = state.side(side_ref);
        if handle >= side.team.len()
            || handle == side.active
            || side.team[handle].is_fainted()
        {
            return;
        }
    }

    let side = state.side_mut(side_ref);
    side.switch_to(handle);

    let outcome = hazards_on_entry(side.active_mon(), &side.conditions, chart);

    if outcome.damage > 0.0 {
        side.active_mon_mut().adjust_hp(-outcome.damage);
    }
    if let Some(status) = outcome.inflict_status {
        let mon = side.active_mon_mut();
        if mon.status.is_none() && mon.is_alive() {
            mon.status = status;
        }
    }
    if outcome.speed_drop {
        side.active_mon_mut().stages.apply(Stat::Speed, -1);
    }
    if outcome.absorbs_toxic_spikes {
        side.conditions.set(SideCondition::ToxicSpikes, 0);
    }
}

/// Materialise a still-unseen opposing Pokemon from the team belief and
/// switch it in. The sampled species' probability mass is consumed so later
/// unseen slots in this timeline resolve to different species.
///
/// Stats and types for the newly materialised Pokemon are unknown; the
/// conservative fallback (neutral typing, average stats) keeps the forward
/// model defined until the real client reveals them.
pub fn apply_switch_unseen(
    state: &mut ShadowState,
    side_ref: SideRef,
    data: &GameData,
    rng: &mut StdRng,
) -> bool {
    let species = {
        let side = state.side_mut(side_ref);
        match side.team_belief.as_mut().and_then(|tb| tb.sample(rng)) {
            Some(species) => species,
            None => return false,
        }
    };

    let mon = materialize_species(&species, data, rng);
    let belief = Some(Belief::build(
        species.clone(),
        &BTreeSet::new(),
        None,
        None,
        None,
        data,
    ));

    let handle = state.side_mut(side_ref).push_materialized(mon, belief);
    apply_switch(state, side_ref, handle, &data.type_chart);
    state.record(TurnEvent::AutoSwitch {
        side: side_ref,
        species,
    });
    true
}

/// Build a battle-ready Pokemon for a species we have never seen on the
/// field. Level comes from the role database when available.
fn materialize_species(species: &SpeciesId, data: &GameData, _rng: &mut StdRng) -> PokemonState {
    let mut mon = PokemonState::new(species.clone());
    mon.types = vec![PokemonType::Typeless];
    if let Some(roles) = data.randbats.candidates(species) {
        if let Some(first) = roles.first() {
            mon.level = first.level;
        }
    }
    mon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::side::SideState;
    use crate::types::{ItemId, MoveId};

    fn grounded_mon() -> PokemonState {
        let mut mon = PokemonState::new("garchomp");
        mon.types = vec![PokemonType::Dragon, PokemonType::Ground];
        mon
    }

    fn hazard_side() -> SideConditions {
        let mut sc = SideConditions::default();
        sc.set(SideCondition::StealthRock, 1);
        sc.set(SideCondition::Spikes, 2);
        sc
    }

    #[test]
    fn test_rock_effectiveness_scales_stealth_rock() {
        let chart = TypeChart::new();
        let mut bird = PokemonState::new("charizard");
        bird.types = vec![PokemonType::Fire, PokemonType::Flying];
        let mut sc = SideConditions::default();
        sc.set(SideCondition::StealthRock, 1);
        let outcome = hazards_on_entry(&bird, &sc, &chart);
        // 4x weak to Rock: half max HP on entry.
        assert!((outcome.damage - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_spikes_only_hit_grounded() {
        let chart = TypeChart::new();
        let outcome = hazards_on_entry(&grounded_mon(), &hazard_side(), &chart);
        // SR neutral vs Dragon/Ground (1/8) + 2 spikes layers (1/6).
        assert!((outcome.damage - (1.0 / 8.0 + 1.0 / 6.0)).abs() < 1e-5);

        let mut airborne = grounded_mon();
        airborne.types = vec![PokemonType::Dragon, PokemonType::Flying];
        let outcome = hazards_on_entry(&airborne, &hazard_side(), &chart);
        // Spikes skipped; SR alone at 2x vs Dragon/Flying.
        assert!((outcome.damage - 2.0 * STEALTH_ROCK_BASE).abs() < 1e-5);
    }

    #[test]
    fn test_boots_negate_everything() {
        let chart = TypeChart::new();
        let mut booted = grounded_mon();
        booted.item = Some(ItemId::new("heavydutyboots"));
        let mut sc = hazard_side();
        sc.set(SideCondition::ToxicSpikes, 2);
        sc.set(SideCondition::StickyWeb, 1);
        let outcome = hazards_on_entry(&booted, &sc, &chart);
        assert_eq!(outcome, HazardOutcome::default());
    }

    #[test]
    fn test_toxic_spikes_layers() {
        let chart = TypeChart::new();
        let mut sc = SideConditions::default();
        sc.set(SideCondition::ToxicSpikes, 1);
        let one = hazards_on_entry(&grounded_mon(), &sc, &chart);
        assert_eq!(one.inflict_status, Some(Status::Poison));
        sc.set(SideCondition::ToxicSpikes, 2);
        let two = hazards_on_entry(&grounded_mon(), &sc, &chart);
        assert_eq!(two.inflict_status, Some(Status::Toxic));
    }

    #[test]
    fn test_grounded_poison_type_absorbs_toxic_spikes() {
        let chart = TypeChart::new();
        let mut toxapex = PokemonState::new("toxapex");
        toxapex.types = vec![PokemonType::Poison, PokemonType::Water];
        let mut sc = SideConditions::default();
        sc.set(SideCondition::ToxicSpikes, 2);
        let outcome = hazards_on_entry(&toxapex, &sc, &chart);
        assert!(outcome.absorbs_toxic_spikes);
        assert_eq!(outcome.inflict_status, None);
    }

    #[test]
    fn test_sticky_web_drops_speed_on_switch() {
        let chart = TypeChart::new();
        let mut sc = SideConditions::default();
        sc.set(SideCondition::StickyWeb, 1);

        let team = vec![grounded_mon(), grounded_mon()];
        let mut ours = SideState::new(team, 0);
        ours.conditions = sc;
        let theirs = SideState::new(vec![grounded_mon()], 0);
        let mut state = ShadowState::new(ours, theirs);

        apply_switch(&mut state, SideRef::Ours, 1, &chart);
        assert_eq!(state.ours.active, 1);
        assert_eq!(state.ours.active_mon().stages.get(Stat::Speed), -1);
    }

    #[test]
    fn test_switch_to_fainted_is_noop() {
        let chart = TypeChart::new();
        let mut team = vec![grounded_mon(), grounded_mon()];
        team[1].hp = 0.0;
        let ours = SideState::new(team, 0);
        let theirs = SideState::new(vec![grounded_mon()], 0);
        let mut state = ShadowState::new(ours, theirs);
        apply_switch(&mut state, SideRef::Ours, 1, &chart);
        assert_eq!(state.ours.active, 0);
    }

    #[test]
    fn test_volatiles_cleared_on_switch_out() {
        let chart = TypeChart::new();
        let mut team = vec![grounded_mon(), grounded_mon()];
        team[0].volatiles.confusion_turns = 3;
        team[0].moves.push(MoveId::new("earthquake"));
        let ours = SideState::new(team, 0);
        let theirs = SideState::new(vec![grounded_mon()], 0);
        let mut state = ShadowState::new(ours, theirs);
        apply_switch(&mut state, SideRef::Ours, 1, &chart);
        assert_eq!(state.ours.team[0].volatiles.confusion_turns, 0);
    }
}
