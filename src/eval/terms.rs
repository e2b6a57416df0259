//! Individual evaluator terms: material value, boosts, hazard pressure,
//! information and belief threat, status and field conditions.

use crate::core::pokemon::PokemonState;
use crate::core::state::{ShadowState, SideRef};
use crate::eval::archetype::*;
use crate::types::{PokemonType, SideCondition, Stat, StatStages, Status, Weather};

/// Role-weighted, boost- and status-adjusted HP value of one side's team.
pub fn team_value(state: &ShadowState, side_ref: SideRef) -> f32 {
    let side = state.side(side_ref);
    let alive: Vec<&PokemonState> = side.team.iter().filter(|m| m.is_alive()).collect();
    let num_removers = alive.iter().filter(|m| has_removal(m)).count();
    let num_priority = alive.iter().filter(|m| has_priority_move(m)).count();

    let mut total = 0.0;
    for (handle, mon) in side.team.iter().enumerate() {
        if mon.is_fainted() {
            continue;
        }

        let role_w = match side_ref {
            SideRef::Ours => self_role_weight(mon),
            SideRef::Theirs => side
                .belief_for(handle)
                .map(|b| b.role_weight())
                .unwrap_or(1.0),
        };

        let mut unique_mult = 1.0;
        if num_removers == 1 && has_removal(mon) {
            unique_mult *= 1.10;
        }
        if num_priority == 1 && has_priority_move(mon) {
            unique_mult *= 1.07;
        }

        let mut v = mon.hp;
        v *= role_w;
        v *= unique_mult;
        v *= boost_multiplier(&mon.stages, mon.hp);
        v *= low_hp_multiplier(mon.hp, role_w);
        v *= status_multiplier(mon.status);
        total += v;
    }
    total
}

/// Important mons are punished harder for sitting at low HP.
fn low_hp_multiplier(hp: f32, role_w: f32) -> f32 {
    if hp < 0.20 {
        if role_w > 1.06 {
            0.35
        } else {
            0.45
        }
    } else if hp < 0.35 {
        if role_w > 1.06 {
            0.55
        } else {
            0.65
        }
    } else if hp < 0.55 {
        0.80
    } else {
        1.00
    }
}

fn boost_multiplier(stages: &StatStages, hp: f32) -> f32 {
    let mut max_pos = stages.max_positive();
    if hp < 0.35 {
        max_pos = max_pos.min(2);
    }
    if max_pos >= 4 {
        1.18
    } else if max_pos >= 2 {
        1.12
    } else if max_pos >= 1 {
        1.06
    } else {
        1.00
    }
}

fn status_multiplier(status: Status) -> f32 {
    match status {
        Status::Toxic | Status::Poison => 0.85,
        Status::Burn => 0.88,
        Status::Paralysis => 0.93,
        _ => 1.00,
    }
}

/// Value of a boost state with diminishing returns: the first stage is worth
/// the most, the sixth almost nothing.
pub fn boost_state_value(stages: &StatStages) -> f32 {
    const STAGE_VALUES: [f32; 6] = [1.0, 0.8, 0.6, 0.4, 0.2, 0.1];
    let mut value = 0.0;
    for (stat, stage) in stages.iter() {
        let base_weight = match stat {
            Stat::Attack | Stat::SpecialAttack => 1.5,
            Stat::Speed => 1.2,
            Stat::Accuracy | Stat::Evasion => continue,
            _ => 0.7,
        };
        if stage > 0 {
            let mut stage_value = 0.0;
            for i in 0..(stage as usize).min(6) {
                stage_value += STAGE_VALUES[i];
            }
            value += stage_value * base_weight;
        } else if stage < 0 {
            value += stage as f32 * base_weight;
        }
    }
    value
}

/// Per-entry switch tax from one side's hazards, softened by boots
/// probability.
fn switch_tax(state: &ShadowState, side_ref: SideRef, boots_prob: f32) -> f32 {
    const SR_TAX: f32 = 0.25;
    const SPIKE_PER_LAYER: f32 = 0.18;
    const TSP_1: f32 = 0.12;
    const TSP_2: f32 = 0.22;
    const WEB_TAX: f32 = 0.28;

    let conditions = &state.side(side_ref).conditions;
    let b = boots_prob.clamp(0.0, 1.0);
    let boots_mult = 1.0 - 0.70 * b;

    let mut tax = 0.0;
    if conditions.is_active(SideCondition::StealthRock) {
        tax += SR_TAX * boots_mult;
    }
    let spikes = conditions.get(SideCondition::Spikes).min(3);
    tax += SPIKE_PER_LAYER * spikes as f32 * boots_mult;
    let tsp = conditions.get(SideCondition::ToxicSpikes);
    if tsp == 1 {
        tax += TSP_1;
    } else if tsp >= 2 {
        tax += TSP_2;
    }
    if conditions.is_active(SideCondition::StickyWeb) {
        tax += WEB_TAX;
    }
    tax
}

/// Net hazard pressure: positive when the opponent pays more per switch.
pub fn hazard_pressure(state: &ShadowState) -> f32 {
    // Their boots probability comes from belief; ours is exact.
    let opp_boots = {
        let side = &state.theirs;
        let mut probs = Vec::new();
        for (handle, mon) in side.team.iter().enumerate() {
            if mon.is_fainted() {
                continue;
            }
            probs.push(
                side.belief_for(handle)
                    .map(|b| b.boots_prob())
                    .unwrap_or(0.0),
            );
        }
        if probs.is_empty() {
            0.0
        } else {
            probs.iter().sum::<f32>() / probs.len() as f32
        }
    };
    let my_boots = {
        let alive: Vec<&PokemonState> =
            state.ours.team.iter().filter(|m| m.is_alive()).collect();
        if alive.is_empty() {
            0.0
        } else {
            alive.iter().filter(|m| m.has_boots()).count() as f32 / alive.len() as f32
        }
    };

    switch_tax(state, SideRef::Theirs, opp_boots) - switch_tax(state, SideRef::Ours, my_boots)
}

/// Reward having a pivot move on a healthy active when hazards and the race
/// allow converting uncertainty into tempo.
pub fn pivot_term(
    state: &ShadowState,
    hazard_pressure: f32,
    uncertainty: f32,
    race_term: f32,
) -> f32 {
    let me = state.ours.active_mon();
    if !has_pivot_move(me) {
        return 0.0;
    }

    let hp_safety = ((me.hp - 0.20) / 0.55).clamp(0.0, 1.0);
    let hazard_amp = 1.0 + 0.25 * hazard_pressure.clamp(-1.0, 1.0);

    let r = race_term.clamp(-1.0, 1.0);
    let race_gate = if r < -0.50 {
        0.25
    } else if r < -0.20 {
        0.55
    } else if r > 0.50 {
        0.70
    } else {
        1.0
    };

    (0.12 * uncertainty * hp_safety * hazard_amp * race_gate).clamp(-0.10, 0.10)
}

/// Combined information level in [0, 1]: roster reveal dominates early, set
/// certainty refines later.
pub fn information_term(state: &ShadowState, opp_known: usize) -> f32 {
    let roster_reveal = opp_known as f32 / crate::core::side::TEAM_SIZE as f32;

    let side = &state.theirs;
    let mut certainties = Vec::new();
    for (handle, mon) in side.team.iter().enumerate() {
        if mon.is_fainted() {
            continue;
        }
        if let Some(belief) = side.belief_for(handle) {
            certainties.push(belief.certainty());
        }
    }
    let set_certainty = if certainties.is_empty() {
        0.0
    } else {
        certainties.iter().sum::<f32>() / certainties.len() as f32
    };

    (0.65 * roster_reveal + 0.35 * set_certainty).clamp(0.0, 1.0)
}

/// Probability-weighted sweep pressure from the opponent's remaining team.
/// Returns a non-positive term (more threat = worse for us).
pub fn belief_threat_term(state: &ShadowState) -> f32 {
    let side = &state.theirs;
    let mut total = 0.0;

    for (handle, mon) in side.team.iter().enumerate() {
        if mon.is_fainted() {
            continue;
        }
        let Some(belief) = side.belief_for(handle) else {
            continue;
        };

        let mut e_setup = 0.0;
        let mut e_prio = 0.0;
        let mut e_speed = 0.0;
        let mut e_phys = 0.0;
        for (candidate, p) in &belief.dist {
            e_setup += p * if candidate.has_setup { 1.0 } else { 0.0 };
            e_prio += p * if candidate.has_priority { 1.0 } else { 0.0 };
            e_speed += p * candidate.speed_mult;
            e_phys += p * candidate.physical_threat;
        }

        let mut speed_excess = (e_speed - 1.0).max(0.0);
        match mon.status {
            Status::Paralysis => speed_excess *= 0.55,
            Status::Burn => e_phys *= 0.60,
            Status::Poison | Status::Toxic => e_setup *= 0.75,
            _ => {}
        }

        let hp_factor = (mon.hp / 0.80).clamp(0.35, 1.0);
        total += (0.70 * e_setup + 0.55 * e_prio + 0.60 * speed_excess + 0.50 * e_phys) * hp_factor;
    }

    -(total / 2.4).tanh()
}

/// Penalise leaning on boosts while the opponent's team is still unknown.
pub fn setup_too_early_penalty(boost_term: f32, uncertainty: f32, opp_unseen: usize) -> f32 {
    if boost_term <= 0.0 {
        return 0.0;
    }
    let u = uncertainty.clamp(0.0, 1.0);
    let unseen_factor = (opp_unseen as f32 / 4.0).clamp(0.0, 1.0);
    -0.10 * boost_term * (0.6 * u + 0.4 * unseen_factor)
}

/// Penalise states where a hidden threat could come in for free: strongest
/// when uncertainty is high, we are behind tempo, fragile, and short on good
/// switches.
pub fn post_ko_danger_penalty(
    uncertainty: f32,
    race_term: f32,
    switch_goodness01: f32,
    my_active_hp: f32,
    opp_unseen: usize,
) -> f32 {
    let u = uncertainty.clamp(0.0, 1.0);
    if u <= 0.05 {
        return 0.0;
    }

    let tempo_bad = (-race_term).max(0.0);
    let hp_bad = ((0.45 - my_active_hp) / 0.45).max(0.0);
    let switch_bad = ((0.6 - switch_goodness01) / 0.6).max(0.0);

    let unseen_amp = 0.6 + 0.4 * (opp_unseen as f32 / 3.0).clamp(0.0, 1.0);
    let vulnerability =
        ((0.45 * tempo_bad + 0.35 * hp_bad + 0.20 * switch_bad) * unseen_amp).clamp(0.0, 1.0);
    -0.10 * u * vulnerability
}

/// Net status burden: positive when the opponent is more afflicted.
pub fn evaluate_status_conditions(state: &ShadowState) -> f32 {
    let mut my_cost = 0.0;
    let mut opp_cost = 0.0;

    for side_ref in [SideRef::Ours, SideRef::Theirs] {
        let side = state.side(side_ref);
        let cost = if side_ref == SideRef::Ours {
            &mut my_cost
        } else {
            &mut opp_cost
        };
        for (handle, mon) in side.team.iter().enumerate() {
            if mon.is_fainted() {
                continue;
            }
            let is_active = handle == side.active;
            *cost += status_cost_for(mon, is_active);
        }
    }

    opp_cost - my_cost
}

/// How bad this Pokemon's condition is for its owner, scaled by archetype:
/// burn on a physical attacker outweighs burn on a special one, toxic bites
/// walls hardest.
fn status_cost_for(mon: &PokemonState, is_active: bool) -> f32 {
    let mut cost = match mon.status {
        Status::Burn => {
            if is_physical_attacker(mon) {
                0.18
            } else {
                0.08
            }
        }
        Status::Paralysis => {
            if is_fast_sweeper(mon) {
                0.14
            } else {
                0.06
            }
        }
        Status::Toxic => {
            if is_defensive(mon) {
                0.14
            } else {
                0.08
            }
        }
        Status::Poison => {
            if is_defensive(mon) {
                0.10
            } else {
                0.05
            }
        }
        Status::Sleep => {
            if is_active {
                if mon.volatiles.sleep_turns >= 2 {
                    0.22
                } else {
                    0.10
                }
            } else {
                0.15
            }
        }
        Status::Freeze => {
            if is_active {
                0.20
            } else {
                0.15
            }
        }
        _ => 0.0,
    };

    if is_active && mon.volatiles.confusion_turns > 0 {
        cost += if mon.volatiles.confusion_turns >= 3 { 0.04 } else { 0.08 };
    }
    cost
}

fn physical_ratio(state: &ShadowState, side_ref: SideRef) -> f32 {
    let alive: Vec<&PokemonState> = state
        .side(side_ref)
        .team
        .iter()
        .filter(|m| m.is_alive())
        .collect();
    if alive.is_empty() {
        return 0.5;
    }
    alive.iter().filter(|m| is_physical_attacker(m)).count() as f32 / alive.len() as f32
}

/// Extra screen value when it plausibly changes KO thresholds in the active
/// matchup, scaled by remaining turns.
fn screen_survival_bonus(state: &ShadowState, screen: SideCondition, side_ref: SideRef) -> f32 {
    let turns_left = state.side(side_ref).conditions.get(screen);
    if turns_left == 0 {
        return 0.0;
    }
    let defender = state.side(side_ref).active_mon();
    if defender.is_fainted() {
        return 0.0;
    }
    let attacker = state.side(side_ref.opponent()).active_mon();

    match screen {
        SideCondition::Reflect if !is_physical_attacker(attacker) => return 0.0,
        SideCondition::LightScreen if is_physical_attacker(attacker) => return 0.0,
        _ => {}
    }

    let base = if defender.hp < 0.30 {
        0.02
    } else if defender.hp < 0.60 {
        0.05
    } else {
        0.03
    };
    base * (turns_left as f32 / 5.0).min(1.0)
}

fn weather_affinity(state: &ShadowState, side_ref: SideRef) -> f32 {
    let weather = state.field.weather;
    let mut score = 0.0;
    let mut alive = 0;
    for mon in &state.side(side_ref).team {
        if mon.is_fainted() {
            continue;
        }
        alive += 1;
        match weather {
            Weather::Sun => {
                if mon.types.contains(&PokemonType::Fire) {
                    score += 1.0;
                }
                if mon.types.contains(&PokemonType::Water) {
                    score -= 0.5;
                }
                if mon.types.contains(&PokemonType::Grass) {
                    score += 0.3;
                }
            }
            Weather::Rain => {
                if mon.types.contains(&PokemonType::Water) {
                    score += 1.0;
                }
                if mon.types.contains(&PokemonType::Fire) {
                    score -= 0.5;
                }
            }
            Weather::Sand => {
                if mon.types.contains(&PokemonType::Rock) {
                    score += 0.6;
                }
                if mon.types.contains(&PokemonType::Steel)
                    || mon.types.contains(&PokemonType::Ground)
                {
                    score += 0.3;
                }
            }
            Weather::Snow => {
                if mon.types.contains(&PokemonType::Ice) {
                    score += 0.6;
                }
            }
            Weather::None => {}
        }
    }
    if alive == 0 {
        0.0
    } else {
        score / alive as f32
    }
}

/// Strategic value of screens, tailwind, Trick Room, weather and hazards
/// beyond their raw damage modifiers.
pub fn evaluate_field_conditions(state: &ShadowState) -> f32 {
    let mut value = 0.0;
    let my_sc = &state.ours.conditions;
    let opp_sc = &state.theirs.conditions;

    let opp_phys = physical_ratio(state, SideRef::Theirs);
    let my_phys = physical_ratio(state, SideRef::Ours);

    // Screens are worth more against the matching attack profile.
    value += (0.015 + 0.015 * opp_phys) * my_sc.get(SideCondition::Reflect) as f32;
    value += (0.015 + 0.015 * (1.0 - opp_phys)) * my_sc.get(SideCondition::LightScreen) as f32;
    value -= (0.015 + 0.015 * my_phys) * opp_sc.get(SideCondition::Reflect) as f32;
    value -= (0.015 + 0.015 * (1.0 - my_phys)) * opp_sc.get(SideCondition::LightScreen) as f32;

    for screen in [SideCondition::Reflect, SideCondition::LightScreen] {
        value += screen_survival_bonus(state, screen, SideRef::Ours);
        value -= screen_survival_bonus(state, screen, SideRef::Theirs);
    }

    value += 0.025 * my_sc.get(SideCondition::AuroraVeil) as f32;
    value -= 0.025 * opp_sc.get(SideCondition::AuroraVeil) as f32;

    value += 0.03 * my_sc.get(SideCondition::Tailwind) as f32;
    value -= 0.03 * opp_sc.get(SideCondition::Tailwind) as f32;

    // Trick Room favours the slower active, scaled by remaining turns.
    if state.field.trick_room {
        let remaining = crate::core::field::FieldState::turns_remaining(state.field.trick_room_counter);
        let factor = remaining as f32 / 5.0;
        let my_speed = state.ours.active_effective_speed();
        let opp_speed = state.theirs.active_effective_speed();
        if my_speed < opp_speed {
            value += 0.08 * factor;
        } else if opp_speed < my_speed {
            value -= 0.08 * factor;
        }
    }

    if state.field.weather != Weather::None {
        let remaining = crate::core::field::FieldState::turns_remaining(state.field.weather_counter);
        let factor = remaining as f32 / 5.0;
        let my_affinity = weather_affinity(state, SideRef::Ours);
        let opp_affinity = weather_affinity(state, SideRef::Theirs);
        value += 0.06 * (my_affinity - opp_affinity) * factor;
    }

    // Hazards the other side cannot (probably) remove are stable pressure.
    let my_has_removal = state
        .ours
        .team
        .iter()
        .any(|m| m.is_alive() && has_removal(m));
    let opp_removal_prob = {
        let side = &state.theirs;
        let mut probs = Vec::new();
        for (handle, mon) in side.team.iter().enumerate() {
            if mon.is_fainted() {
                continue;
            }
            probs.push(
                side.belief_for(handle)
                    .map(|b| b.removal_prob())
                    .unwrap_or(0.0),
            );
        }
        if probs.is_empty() {
            0.0
        } else {
            probs.iter().sum::<f32>() / probs.len() as f32
        }
    };
    if opp_sc.has_any_hazard() {
        value += 0.08 * (1.0 - opp_removal_prob);
    }
    if my_sc.has_any_hazard() && !my_has_removal {
        value -= 0.08;
    }

    // Toxic Spikes bite in proportion to how much of the team is actually
    // vulnerable.
    value += toxic_spikes_value(state, SideRef::Theirs);
    value -= toxic_spikes_value(state, SideRef::Ours);

    (value / 0.3).tanh()
}

fn toxic_spikes_value(state: &ShadowState, victim_side: SideRef) -> f32 {
    let layers = state
        .side(victim_side)
        .conditions
        .get(SideCondition::ToxicSpikes);
    if layers == 0 {
        return 0.0;
    }
    let alive: Vec<&PokemonState> = state
        .side(victim_side)
        .team
        .iter()
        .filter(|m| m.is_alive())
        .collect();
    if alive.is_empty() {
        return 0.0;
    }
    let vulnerable = alive
        .iter()
        .filter(|m| {
            !m.types.iter().any(|t| {
                matches!(
                    t,
                    PokemonType::Poison | PokemonType::Steel | PokemonType::Flying
                )
            })
        })
        .count();
    (vulnerable as f32 / alive.len() as f32) * layers.min(2) as f32 * 0.04
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::side::SideState;
    use crate::types::MoveId;

    fn state() -> ShadowState {
        let mk = |name: &str| PokemonState::new(name);
        ShadowState::new(
            SideState::new(vec![mk("a"), mk("b")], 0),
            SideState::new(vec![mk("c"), mk("d")], 0),
        )
    }

    #[test]
    fn test_team_value_counts_only_alive() {
        let mut s = state();
        let full = team_value(&s, SideRef::Ours);
        s.ours.team[1].hp = 0.0;
        assert!(team_value(&s, SideRef::Ours) < full);
    }

    #[test]
    fn test_boost_state_diminishing_returns() {
        let mut one = StatStages::default();
        one.apply(Stat::Attack, 1);
        let mut six = StatStages::default();
        six.apply(Stat::Attack, 6);
        let v1 = boost_state_value(&one);
        let v6 = boost_state_value(&six);
        // Six stages are worth far less than six times one stage.
        assert!(v6 < v1 * 6.0 * 0.6);
        assert!(v6 > v1);
    }

    #[test]
    fn test_hazard_pressure_sign() {
        let mut s = state();
        s.theirs.conditions.set(SideCondition::StealthRock, 1);
        assert!(hazard_pressure(&s) > 0.0);
        s.ours.conditions.set(SideCondition::StealthRock, 1);
        s.ours.conditions.set(SideCondition::Spikes, 3);
        assert!(hazard_pressure(&s) < 0.0);
    }

    #[test]
    fn test_status_conditions_net_sign() {
        let mut s = state();
        s.theirs.active_mon_mut().status = Status::Burn;
        assert!(evaluate_status_conditions(&s) > 0.0);
        s.ours.active_mon_mut().status = Status::Toxic;
        s.ours.active_mon_mut().stats.hp = 400;
        s.ours.active_mon_mut().stats.defense = 300;
        s.ours.active_mon_mut().stats.special_defense = 300;
        // Toxic on our wall outweighs burn on their attacker.
        assert!(evaluate_status_conditions(&s) < 0.0);
    }

    #[test]
    fn test_field_conditions_favor_our_screens() {
        let mut s = state();
        s.ours.conditions.apply(SideCondition::AuroraVeil);
        s.ours.conditions.apply(SideCondition::Tailwind);
        assert!(evaluate_field_conditions(&s) > 0.0);
    }

    #[test]
    fn test_pivot_term_requires_pivot_move() {
        let mut s = state();
        assert_eq!(pivot_term(&s, 0.0, 0.8, 0.0), 0.0);
        s.ours.active_mon_mut().moves.push(MoveId::new("uturn"));
        assert!(pivot_term(&s, 0.0, 0.8, 0.0) > 0.0);
    }

    #[test]
    fn test_post_ko_danger_is_non_positive() {
        for u in [0.0, 0.3, 0.9] {
            let p = post_ko_danger_penalty(u, -0.5, 0.2, 0.2, 3);
            assert!(p <= 0.0);
        }
    }
}
