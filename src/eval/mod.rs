//! # Positional Evaluator
//!
//! Scalar value of a shadow state in [-1, +1], higher is better for us.
//! Fuses material (role-weighted team value), tempo (damage race, hazard
//! pressure), information (belief certainty, unseen-slot threat) and
//! structural risk (status, field, setup timing) into one clamped number
//! used as the MCTS leaf value.

mod archetype;
mod terms;

pub use archetype::*;

use crate::core::side::TEAM_SIZE;
use crate::core::state::{ShadowState, SideRef};
use crate::data::GameData;
use crate::scoring::{evaluate_race_for_move, score_move, score_switch, ScoreContext};
use terms::*;

/// Normalisation for raw switch scores before the tanh squash.
const SW_NORM: f32 = 2.0;

/// Evaluate a state from our perspective.
///
/// If the last transition snapshotted a pre-autoswitch value (our active was
/// KO'd and force-replaced inside `step`), that value is returned directly so
/// the KO penalty is never masked by the fresh replacement.
pub fn evaluate(state: &ShadowState, data: &GameData) -> f32 {
    if let Some(v) = state.pre_autoswitch_eval {
        return v.clamp(-1.0, 1.0);
    }

    let my_sum = state.ours.hp_sum();
    let opp_sum = state.theirs.hp_sum();

    if my_sum <= 1e-9 {
        return -1.0;
    }

    let opp_known = state.theirs.team.len();
    if opp_sum <= 1e-9 && (state.finished || opp_known >= TEAM_SIZE) {
        return 1.0;
    }

    let my_active_hp = state.ours.active_mon().hp;
    let opp_active_hp = state.theirs.active_mon().hp;

    // Our active fainted while theirs stands: clamped-negative faint value
    // with strategic-sack softness.
    if my_active_hp <= 0.0 && opp_active_hp > 0.0 {
        return pre_autoswitch_value(state);
    }

    let my_alive = state.ours.alive_count();
    let opp_unseen = if state.theirs.can_materialize_unseen() {
        state.theirs.unseen_slots()
    } else {
        0
    };
    let opp_alive = state.theirs.alive_count() + opp_unseen;

    // Endgame shortcuts.
    if my_alive == 1 && opp_alive == 1 {
        return endgame_one_v_one(state);
    }
    if my_alive == 1 && opp_alive >= 2 {
        return endgame_last_mon(state);
    }
    if my_alive >= 2 && opp_alive == 1 {
        return 0.70;
    }

    // General case.
    let ctx = ScoreContext::new(state, SideRef::Ours, data);

    let my_value = team_value(state, SideRef::Ours);
    let opp_value = team_value(state, SideRef::Theirs)
        + opp_unseen_value(data, opp_known, opp_unseen);
    let team_term = ((my_value - opp_value) / 1.2).tanh();

    let my_healthy = healthy_count(state, SideRef::Ours);
    let opp_healthy = healthy_count(state, SideRef::Theirs) + opp_unseen;
    let numbers_term = ((my_healthy as f32 - opp_healthy as f32) / 1.5).tanh();

    // Best-move damage race.
    let mut race_term = 0.0;
    let mut best_move = None;
    let mut best_move_score = f32::NEG_INFINITY;
    for action in state.legal_actions(data) {
        if let Some(move_id) = action.move_id() {
            if !data.movedex.get_or_fallback(move_id).is_damaging() {
                continue;
            }
            let score = score_move(&ctx, move_id);
            if score > best_move_score {
                best_move_score = score;
                best_move = Some(move_id.clone());
            }
        }
    }
    if let Some(move_id) = &best_move {
        let race = evaluate_race_for_move(&ctx, move_id);
        race_term = ((race.ttd_me - race.tko_opp) / 1.5).tanh();
    }

    // Best bench option; the weight is gated below.
    let mut best_switch_score = f32::NEG_INFINITY;
    for handle in state.ours.alive_bench() {
        best_switch_score = best_switch_score.max(score_switch(&ctx, handle));
    }
    let mut switch_term = if best_switch_score > f32::NEG_INFINITY {
        (best_switch_score / SW_NORM).tanh()
    } else {
        0.0
    };

    // Hazard pressure scales both tempo terms.
    let hazard_pressure = hazard_pressure(state);
    let tempo_scale = 1.0 + 0.22 * hazard_pressure.clamp(-1.0, 1.0);
    race_term *= tempo_scale;
    switch_term *= tempo_scale;

    let mut boost_term = evaluate_boosts(state);
    if my_active_hp < 0.20 {
        boost_term *= 0.40;
    } else if my_active_hp < 0.35 {
        boost_term *= 0.70;
    }

    let info01 = information_term(state, opp_known);
    let uncertainty = 1.0 - info01;

    let pivot_term = pivot_term(state, hazard_pressure, uncertainty, race_term);
    let threat_term = belief_threat_term(state);
    let setup_early_pen = setup_too_early_penalty(boost_term, uncertainty, opp_unseen);
    let post_ko_pen = post_ko_danger_penalty(
        uncertainty,
        race_term,
        0.5 * (switch_term + 1.0),
        my_active_hp,
        opp_unseen,
    );

    let field_term = evaluate_field_conditions(state);
    let status_term = evaluate_status_conditions(state).clamp(-1.0, 1.0);
    let sack_bonus = sack_opportunity(state, &ctx);

    // Active preservation: tighter threshold for actives with leverage.
    let mut active_preserve = if has_setup_potential(state.ours.active_mon())
        || has_priority_move(state.ours.active_mon())
    {
        ((my_active_hp - 0.60) / 0.20).tanh()
    } else {
        ((my_active_hp - 0.45) / 0.25).tanh()
    };

    let tempo_penalty = 0.04 * state.ply as f32;
    let progress_term = ((1.0 - opp_sum) / 0.6).tanh();

    let ahead = my_alive as i32 - opp_alive as i32;
    let ahead_factor = (((ahead - 1) as f32) / 3.0).clamp(0.0, 1.0);
    active_preserve *= 1.0 - 0.50 * ahead_factor;

    let mut sac_penalty = 0.0;
    if ahead >= 2 {
        if my_active_hp <= 0.0 {
            sac_penalty += if opp_active_hp <= 0.0 { 0.02 } else { 0.20 };
        } else if my_active_hp < 0.15 {
            sac_penalty += 0.10;
        } else if my_active_hp < 0.30 {
            sac_penalty += 0.05;
        }
    }
    sac_penalty = (sac_penalty - sack_bonus).max(0.0);

    // Two weight presets: consolidating a big lead vs the open game.
    let w = if ahead >= 2 {
        Weights {
            team: 0.28,
            numbers: 0.06,
            race: 0.28,
            switch: 0.05,
            boost: 0.07,
            active: 0.04,
            progress: 0.14,
            field: 0.05,
            pivot: 0.03,
            threat: 0.03,
            status: 0.06,
        }
    } else {
        Weights {
            team: 0.32,
            numbers: 0.07,
            race: 0.22,
            switch: 0.09,
            boost: 0.09,
            active: 0.06,
            progress: 0.00,
            field: 0.07,
            pivot: 0.05,
            threat: 0.04,
            status: 0.07,
        }
    };

    // Switch matters most when the race is being lost.
    let effective_w_switch = if race_term < 0.0 { w.switch } else { w.switch * 0.30 };

    let core = w.team * team_term
        + w.numbers * numbers_term
        + w.race * race_term
        + effective_w_switch * switch_term
        + w.boost * boost_term
        + w.active * active_preserve
        + w.progress * progress_term
        + w.field * field_term
        + w.status * status_term
        + w.pivot * pivot_term
        + w.threat * threat_term;

    let w_sum = w.team
        + w.numbers
        + w.race
        + effective_w_switch
        + w.boost
        + w.active
        + w.progress
        + w.field
        + w.status
        + w.pivot
        + w.threat;

    let core_norm = if w_sum.abs() > 1e-9 { core / w_sum } else { core };

    let value = core_norm - tempo_penalty - sac_penalty + setup_early_pen + post_ko_pen;
    value.clamp(-1.0, 1.0)
}

struct Weights {
    team: f32,
    numbers: f32,
    race: f32,
    switch: f32,
    boost: f32,
    active: f32,
    progress: f32,
    field: f32,
    pivot: f32,
    threat: f32,
    status: f32,
}

/// The clamped-negative value of the position at the instant our active
/// fainted, before the forced replacement masks it.
pub fn pre_autoswitch_value(state: &ShadowState) -> f32 {
    let my_sum = state.ours.hp_sum();
    let opp_sum = state.theirs.hp_sum();
    let lead_hint = ((my_sum - opp_sum) / 1.5).tanh();
    let bench_quality = sack_bench_quality(state);
    (-0.90 + 0.15 * lead_hint + 0.35 * bench_quality).clamp(-1.0, 0.0)
}

fn endgame_one_v_one(state: &ShadowState) -> f32 {
    let me = state.ours.active_mon();
    let opp = state.theirs.active_mon();
    let mut value = ((me.hp - opp.hp) / 0.4).tanh();

    let my_priority = has_priority_move(me);
    let opp_priority = has_priority_move(opp);
    if my_priority && !opp_priority {
        value += 0.10;
    } else if opp_priority && !my_priority {
        value -= 0.10;
    }

    let my_poisoned = me.status.is_poisoned();
    let opp_poisoned = opp.status.is_poisoned();
    if my_poisoned && !opp_poisoned {
        value -= 0.12;
    } else if opp_poisoned && !my_poisoned {
        value += 0.12;
    }

    value.clamp(-1.0, 1.0)
}

/// Our last Pokemon against several: mostly lost, unless it is a healthy
/// setup threat or already boosted into sweep range.
fn endgame_last_mon(state: &ShadowState) -> f32 {
    let me = state.ours.active_mon();
    let max_boost = me.stages.max_positive();
    if has_setup_potential(me) && me.hp > 0.7 && max_boost < 2 {
        -0.30
    } else if max_boost >= 4 {
        -0.10
    } else {
        -0.70
    }
}

/// How acceptable it is to lose the current active: best bench HP times how
/// dispensable the active is, boosted when a healthy setup mon waits in the
/// wings.
fn sack_bench_quality(state: &ShadowState) -> f32 {
    let active_role = self_role_weight(state.ours.active_mon());
    let dispensable = ((1.10 - active_role) / 0.10).clamp(0.0, 1.0);

    let bench: Vec<&crate::core::pokemon::PokemonState> = state
        .ours
        .alive_bench()
        .into_iter()
        .map(|h| &state.ours.team[h])
        .filter(|m| m.hp > 0.30)
        .collect();
    if bench.is_empty() {
        return 0.0;
    }

    let best_hp = bench.iter().map(|m| m.hp).fold(0.0, f32::max);
    let setup_factor = if bench.iter().any(|m| has_setup_potential(m) && m.hp > 0.60) {
        1.5
    } else {
        1.0
    };

    (best_hp * dispensable * setup_factor).min(1.0)
}

/// Positive bonus that offsets the sac penalty when trading away a
/// dispensable, weakened active buys a strong bench position.
fn sack_opportunity(state: &ShadowState, ctx: &ScoreContext) -> f32 {
    let my_active_hp = state.ours.active_mon().hp;
    let opp_active_hp = state.theirs.active_mon().hp;
    if my_active_hp <= 0.0 || opp_active_hp <= 0.0 || my_active_hp > 0.50 {
        return 0.0;
    }

    let bench = state.ours.alive_bench();
    if bench.is_empty() {
        return 0.0;
    }

    let active_role = self_role_weight(state.ours.active_mon());
    if active_role > 1.10 {
        return 0.0;
    }
    let dispensable = ((1.10 - active_role) / 0.10).max(0.0);

    let best_switch_score = bench
        .iter()
        .map(|&h| score_switch(ctx, h))
        .fold(f32::NEG_INFINITY, f32::max);
    let bench_advantage = (best_switch_score / SW_NORM).tanh().max(0.0);
    if bench_advantage < 0.15 {
        return 0.0;
    }

    let setup_bonus = if bench
        .iter()
        .any(|&h| has_setup_potential(&state.ours.team[h]) && state.ours.team[h].hp > 0.50)
    {
        1.35
    } else {
        1.0
    };

    let danger = ((0.50 - my_active_hp) / 0.50).max(0.0);
    0.12 * bench_advantage * dispensable * danger * setup_bonus
}

fn healthy_count(state: &ShadowState, side: SideRef) -> usize {
    state
        .side(side)
        .team
        .iter()
        .filter(|m| m.hp >= 0.55)
        .count()
}

/// Expected material value of the opponent's still-unseen slots, discounted
/// more heavily as more of their roster is revealed.
fn opp_unseen_value(data: &GameData, opp_known: usize, opp_unseen: usize) -> f32 {
    if opp_unseen == 0 {
        return 0.0;
    }
    let discount = match opp_known {
        0 | 1 => 0.95,
        2 | 3 => 0.90,
        4 | 5 => 0.80,
        _ => 0.0,
    };
    opp_unseen as f32 * data.randbats.avg_role_weight() * discount
}

fn evaluate_boosts(state: &ShadowState) -> f32 {
    let my_value = boost_state_value(&state.ours.active_mon().stages);
    let opp_value = boost_state_value(&state.theirs.active_mon().stages);
    ((my_value - opp_value) / 10.0).tanh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pokemon::PokemonState;
    use crate::core::side::SideState;
    use crate::types::{MoveId, PokemonType, Stat};

    fn mon(species: &str, moves: &[&str]) -> PokemonState {
        let mut m = PokemonState::new(species);
        m.types = vec![PokemonType::Normal];
        m.moves = moves.iter().map(|s| MoveId::new(*s)).collect();
        m
    }

    fn full_state() -> ShadowState {
        let ours = SideState::new(
            vec![
                mon("a1", &["bodyslam", "earthquake"]),
                mon("a2", &["surf"]),
                mon("a3", &["recover"]),
            ],
            0,
        );
        let theirs = SideState::new(
            vec![
                mon("b1", &["tackle"]),
                mon("b2", &["tackle"]),
                mon("b3", &["tackle"]),
            ],
            0,
        );
        ShadowState::new(ours, theirs)
    }

    #[test]
    fn test_all_our_hp_zero_is_minus_one() {
        let mut state = full_state();
        for m in state.ours.team.iter_mut() {
            m.hp = 0.0;
        }
        assert_eq!(evaluate(&state, &GameData::default()), -1.0);
    }

    #[test]
    fn test_opponent_wiped_and_finished_is_plus_one() {
        let mut state = full_state();
        for m in state.theirs.team.iter_mut() {
            m.hp = 0.0;
        }
        state.finished = true;
        assert_eq!(evaluate(&state, &GameData::default()), 1.0);
    }

    #[test]
    fn test_opponent_wiped_but_unrevealed_not_plus_one() {
        let mut state = full_state();
        for m in state.theirs.team.iter_mut() {
            m.hp = 0.0;
        }
        // Only 3 of 6 slots revealed and not flagged finished.
        let value = evaluate(&state, &GameData::default());
        assert!(value < 1.0);
    }

    #[test]
    fn test_evaluator_is_clamped() {
        let data = GameData::default();
        let mut state = full_state();
        state.ply = 200; // enormous tempo penalty
        let value = evaluate(&state, &data);
        assert!((-1.0..=1.0).contains(&value));
    }

    #[test]
    fn test_pre_autoswitch_value_non_positive() {
        let mut state = full_state();
        state.ours.team[0].hp = 0.0;
        let v = pre_autoswitch_value(&state);
        assert!(v <= 0.0 && v >= -1.0);
    }

    #[test]
    fn test_snapshotted_value_wins_over_fresh_eval() {
        let mut state = full_state();
        state.pre_autoswitch_eval = Some(-0.83);
        assert_eq!(evaluate(&state, &GameData::default()), -0.83);
    }

    #[test]
    fn test_material_lead_reads_positive() {
        let data = GameData::default();
        let mut state = full_state();
        for m in state.theirs.team.iter_mut() {
            m.hp = 0.3;
        }
        // Their roster is fully revealed so unseen value does not prop them up.
        let ahead = evaluate(&state, &data);
        let mut even = full_state();
        even.finished = false;
        let baseline = evaluate(&even, &data);
        assert!(
            ahead > baseline,
            "hp lead should evaluate higher: {ahead} vs {baseline}"
        );
    }

    #[test]
    fn test_one_v_one_hp_difference() {
        let mut state = full_state();
        // Reduce to 1v1.
        state.ours.team.truncate(1);
        state.ours.beliefs.truncate(1);
        state.theirs.team.truncate(1);
        state.theirs.beliefs.truncate(1);
        state.ours.team[0].hp = 0.9;
        state.theirs.team[0].hp = 0.3;
        let value = evaluate(&state, &GameData::default());
        assert!(value > 0.5);
    }

    #[test]
    fn test_boost_advantage_positive() {
        let mut state = full_state();
        state.ours.active_mon_mut().stages.apply(Stat::Attack, 2);
        let boosted = evaluate_boosts(&state);
        assert!(boosted > 0.0);
        state.theirs.active_mon_mut().stages.apply(Stat::Attack, 4);
        assert!(evaluate_boosts(&state) < boosted);
    }
}
