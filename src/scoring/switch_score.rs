//! # Switch Scoring
//!
//! How good switching to a bench Pokemon is in the current matchup:
//! defensive and offensive matchup terms, hazard entry costs, the free turn
//! handed to the opponent, belief-weighted risk, and role preservation.

use crate::constants;
use crate::core::pokemon::PokemonState;
use crate::engine::damage::{expected_damage_fraction, DamageContext};
use crate::engine::switch_effects::hazards_on_entry;
use crate::scoring::ScoreContext;
use crate::types::{Status, TypeChart};

/// Score switching the acting side to its bench Pokemon at `handle`.
/// Higher is better; scores share the `score_move` scale.
pub fn score_switch(ctx: &ScoreContext, handle: usize) -> f32 {
    let side = ctx.me_side();
    let Some(candidate) = side.team.get(handle) else {
        return -200.0;
    };
    if candidate.is_fainted() {
        return -200.0;
    }

    let opp = ctx.opp();
    let me = ctx.me();
    let active_fainted = me.is_fainted();
    let mut score = 0.0;

    // Urgency: when the current active is about to be KO'd, every switch
    // gets a flat boost so staying in is compared honestly.
    score += active_ko_threat(ctx);

    // HP factor: bringing in a weakened mon is risky.
    let switch_hp = candidate.hp;
    if switch_hp < 0.25 {
        score -= 25.0;
    } else if switch_hp < 0.5 {
        score -= 8.0;
    } else if switch_hp > 0.75 {
        score += 5.0;
    }

    // Hazard entry cost.
    let hazard = hazards_on_entry(candidate, &side.conditions, &ctx.data.type_chart);
    score -= hazard.damage * 55.0;
    if let Some(status) = hazard.inflict_status {
        score -= match status {
            Status::Toxic => 10.0,
            Status::Poison => 6.0,
            _ => 4.0,
        };
    }
    if hazard.speed_drop {
        score -= 8.0;
    }
    let effective_hp = (switch_hp - hazard.damage).max(0.0);

    // Defensive matchup.
    let opp_best = best_damage(ctx, opp, candidate, &ctx.data.type_chart, true);
    let opp_expected = best_damage(ctx, opp, candidate, &ctx.data.type_chart, false);
    score -= opp_expected * 60.0;

    if opp_best < 0.05 {
        score += 40.0;
    } else if opp_best <= 0.15 {
        score += 20.0;
    } else if opp_best < 0.25 {
        score += 8.0;
    }

    // Survival check for voluntary switches: will the switch-in survive the
    // entry turn at all?
    if !active_fainted {
        if opp_best >= effective_hp {
            score -= 50.0;
        } else if opp_best >= effective_hp * 0.70 {
            score -= 20.0;
        }
    }

    // Offensive matchup.
    let my_best = best_damage(ctx, candidate, opp, &ctx.data.type_chart, true);
    score += my_best * 40.0;
    if my_best >= opp.hp {
        score += 25.0;
    } else if my_best >= opp.hp * 0.5 {
        score += 8.0;
    }

    // Status on the switch-in.
    score -= match candidate.status {
        Status::Toxic => 12.0,
        Status::Burn => 10.0,
        Status::Paralysis => 8.0,
        Status::Poison => 7.0,
        Status::Sleep | Status::Freeze => 16.0,
        _ => 0.0,
    };

    // Free-turn cost: a voluntary switch gives the opponent a free action,
    // weighted by what the belief says they can do with it.
    if !active_fainted {
        score -= free_turn_penalty(ctx, candidate, my_best, opp_best);
    }

    // Passive matchup: eating big hits while threatening nothing back is a
    // losing trade.
    if opp_best >= 0.30 && my_best <= 0.15 {
        score -= ((opp_best - my_best) * 40.0).min(18.0);
    }

    // Role preservation: do not feed the team's only hazard remover or a
    // healthy setup wincon into a big hit.
    score -= role_preservation_penalty(ctx, handle, candidate, opp_best);

    // Pivot conversion: a safe switch-in with a pivot move converts the
    // matchup into momentum.
    if has_pivot_move(candidate) && opp_best < 0.25 && effective_hp > 0.4 {
        score += 6.0;
    }

    score
}

/// Score switching to a still-unseen slot, stood in for by a peek-sampled
/// species. The matchup is unknown, so only what we can know is scored: a
/// fresh full-HP entry, the hazard cost it would pay, and the information
/// the reveal denies us.
pub fn score_unseen_switch(ctx: &ScoreContext, species: &crate::types::SpeciesId) -> f32 {
    let mut stand_in = PokemonState::new(species.clone());
    stand_in.types = vec![crate::types::PokemonType::Typeless];
    if let Some(roles) = ctx.data.randbats.candidates(species) {
        if let Some(first) = roles.first() {
            stand_in.level = first.level;
        }
    }

    let mut score = 5.0; // fresh, full-HP entry
    let hazard = hazards_on_entry(&stand_in, &ctx.me_side().conditions, &ctx.data.type_chart);
    score -= hazard.damage * 55.0;
    if hazard.inflict_status.is_some() {
        score -= 6.0;
    }
    score += active_ko_threat(ctx);
    score
}

/// Flat urgency bonus applied to all switches when the active is in KO
/// range of the opponent's revealed attacks.
fn active_ko_threat(ctx: &ScoreContext) -> f32 {
    let me = ctx.me();
    if me.is_fainted() {
        return 0.0;
    }
    let opp = ctx.opp();
    let threat = best_damage(ctx, opp, me, &ctx.data.type_chart, true);
    if threat >= me.hp {
        20.0
    } else if threat >= me.hp * 0.8 {
        10.0
    } else {
        0.0
    }
}

/// Best (or accuracy-weighted expected) damage one Pokemon can deal to
/// another with its known moves, falling back to a type-based estimate when
/// nothing is revealed. The defender's screens are looked up by which side
/// the defender actually belongs to.
fn best_damage(
    ctx: &ScoreContext,
    attacker: &PokemonState,
    defender: &PokemonState,
    chart: &TypeChart,
    worst_case: bool,
) -> f32 {
    let defender_is_ours = ctx
        .me_side()
        .team
        .iter()
        .any(|m| std::ptr::eq(m, defender));
    let defender_conditions = if defender_is_ours {
        &ctx.me_side().conditions
    } else {
        &ctx.opp_side().conditions
    };
    let damage_ctx = DamageContext {
        field: &ctx.state.field,
        defender_conditions,
        type_chart: chart,
    };
    let mut best = 0.0f32;
    for move_id in &attacker.moves {
        let def = ctx.data.movedex.get_or_fallback(move_id);
        let mut dmg = expected_damage_fraction(def, attacker, defender, &damage_ctx, false);
        if !worst_case {
            dmg *= def.hit_probability();
        }
        best = best.max(dmg);
    }
    if best > 0.0 {
        return best;
    }
    // Nothing revealed: assume a STAB hit at the attacker's best type
    // effectiveness.
    let mut type_best = 0.0f32;
    for t in &attacker.types {
        type_best = type_best.max(chart.effectiveness_against(*t, &defender.types));
    }
    0.20 * type_best
}

/// Penalty for the free action the opponent gets while we switch, weighted
/// by belief-estimated setup / hazard / status potential.
fn free_turn_penalty(
    ctx: &ScoreContext,
    candidate: &PokemonState,
    my_best: f32,
    opp_best: f32,
) -> f32 {
    let opp_side = ctx.opp_side();
    let belief = opp_side.belief_for(opp_side.active);

    let (p_setup, p_hazard) = match belief {
        Some(b) => (
            b.probability(|c| c.has_setup),
            b.probability(|c| {
                c.moves.iter().any(|m| constants::is_hazard_move(m.as_str()))
            }),
        ),
        None => (0.2, 0.15),
    };

    let mut penalty = 22.0 * p_setup + 12.0 * p_hazard;

    // Status threat against the incoming mon.
    if candidate.status.is_none() {
        penalty += 6.0;
    }

    // The free turn is cheap when the switch-in immediately threatens a KO.
    if my_best >= ctx.opp().hp {
        penalty *= 0.35;
    } else if my_best >= ctx.opp().hp * 0.6 {
        penalty *= 0.65;
    }

    // And expensive when the opponent also pressures the switch-in hard.
    if opp_best >= 0.5 {
        penalty *= 1.25;
    }

    penalty
}

fn role_preservation_penalty(
    ctx: &ScoreContext,
    handle: usize,
    candidate: &PokemonState,
    opp_best: f32,
) -> f32 {
    if opp_best < 0.40 {
        return 0.0;
    }

    let side = ctx.me_side();
    let is_sole_remover = has_removal(candidate)
        && side
            .team
            .iter()
            .enumerate()
            .filter(|(i, m)| *i != handle && m.is_alive())
            .all(|(_, m)| !has_removal(m));
    let is_healthy_wincon = candidate.hp > 0.7
        && candidate
            .moves
            .iter()
            .any(|m| constants::is_setup_move(m.as_str()));

    if is_sole_remover || is_healthy_wincon {
        12.0
    } else {
        0.0
    }
}

fn has_removal(mon: &PokemonState) -> bool {
    mon.moves.iter().any(|m| constants::is_hazard_removal(m.as_str()))
}

fn has_pivot_move(mon: &PokemonState) -> bool {
    mon.moves.iter().any(|m| constants::is_pivot_move(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::side::SideState;
    use crate::core::state::{ShadowState, SideRef};
    use crate::data::GameData;
    use crate::types::{ItemId, MoveId, PokemonType, SideCondition};

    fn mon(species: &str, types: &[PokemonType], moves: &[&str]) -> PokemonState {
        let mut m = PokemonState::new(species);
        m.types = types.to_vec();
        m.moves = moves.iter().map(|s| MoveId::new(*s)).collect();
        m
    }

    fn state_with_bench() -> (ShadowState, GameData) {
        let active = mon("charizard", &[PokemonType::Fire, PokemonType::Flying], &["flamethrower"]);
        let resist = mon(
            "toxapex",
            &[PokemonType::Poison, PokemonType::Water],
            &["scald"],
        );
        let weak = mon("arcanine", &[PokemonType::Fire], &["flareblitz"]);
        let ours = SideState::new(vec![active, resist, weak], 0);
        let theirs = SideState::new(
            vec![mon("quaquaval", &[PokemonType::Water], &["hydropump"])],
            0,
        );
        (ShadowState::new(ours, theirs), GameData::default())
    }

    #[test]
    fn test_resist_beats_weak_switch() {
        let (state, data) = state_with_bench();
        let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
        let resist = score_switch(&ctx, 1);
        let weak = score_switch(&ctx, 2);
        assert!(
            resist > weak,
            "water-resist {resist} should outscore water-weak {weak}"
        );
    }

    #[test]
    fn test_fainted_candidate_is_unswitchable() {
        let (mut state, data) = state_with_bench();
        state.ours.team[1].hp = 0.0;
        let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
        assert_eq!(score_switch(&ctx, 1), -200.0);
    }

    #[test]
    fn test_hazards_penalize_switch_unless_boots() {
        let (mut state, data) = state_with_bench();
        state.ours.conditions.set(SideCondition::StealthRock, 1);
        state.ours.conditions.set(SideCondition::Spikes, 2);
        let bare = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_switch(&ctx, 1)
        };
        state.ours.team[1].item = Some(ItemId::new("heavydutyboots"));
        let booted = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_switch(&ctx, 1)
        };
        assert!(booted > bare);
    }

    #[test]
    fn test_low_hp_candidate_penalized() {
        let (mut state, data) = state_with_bench();
        let healthy = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_switch(&ctx, 1)
        };
        state.ours.team[1].hp = 0.2;
        let low = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_switch(&ctx, 1)
        };
        assert!(healthy > low);
    }
}
