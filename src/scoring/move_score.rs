//! # Move Scoring
//!
//! Heuristic value of using one move in the current matchup, in rough
//! "percent of a turn" units: expected damage with accuracy weighting, KO
//! and priority bonuses, secondary-effect value, setup and status move
//! scoring, recoil and self-debuff penalties, and a tightly clamped
//! high-crit bonus.

use crate::constants;
use crate::core::pokemon::PokemonState;
use crate::data::{MoveCategory, MoveDef, SecondaryEffect};
use crate::engine::damage::{expected_damage_fraction, ko_probability, DamageContext};
use crate::scoring::ScoreContext;
use crate::types::{MoveId, PokemonType, SideCondition, Stat, Status};

/// Score a move for the context's acting side. Higher is better.
pub fn score_move(ctx: &ScoreContext, move_id: &MoveId) -> f32 {
    let def = ctx.data.movedex.get_or_fallback(move_id).clone();

    let setup_score = score_setup_move(ctx, &def);
    if setup_score > 0.0 {
        return setup_score;
    }

    if def.category == MoveCategory::Status {
        return score_status_move(ctx, &def);
    }

    let me = ctx.me();
    let opp = ctx.opp();
    let damage_ctx = DamageContext {
        field: &ctx.state.field,
        defender_conditions: &ctx.opp_side().conditions,
        type_chart: &ctx.data.type_chart,
    };
    let dmg_frac = expected_damage_fraction(&def, me, opp, &damage_ctx, false);
    let accuracy = def.hit_probability();
    let opp_hp = opp.hp;

    let mut score = dmg_frac * 100.0 * accuracy;

    // Reliability shaping: sub-85% accuracy is a real cost.
    if accuracy >= 0.85 {
        score += 5.0 * (accuracy - 0.85) / 0.15;
    } else {
        score -= 10.0;
    }

    let ko_prob = ko_probability(dmg_frac, opp_hp) * accuracy;
    if ko_prob > 0.0 {
        let slower = ctx.is_slower();
        score += (30.0 + if slower { 0.0 } else { 10.0 }) * ko_prob;
    }

    if ko_prob < 0.95 {
        score += score_secondaries(ctx, &def, ko_prob);
    }

    if def.priority > 0 {
        score += if opp_hp < 0.35 {
            10.0
        } else if ctx.is_slower() {
            6.0
        } else {
            2.0
        };
    }

    score -= stat_drop_penalty(ctx, &def);

    if def.recoil > 0.0 {
        score -= (def.recoil * 50.0).min(20.0);
    }

    score += crit_bonus(ctx, &def, dmg_frac, ko_prob).min(3.0);

    score
}

/// Value of the move's chance-based secondaries when the move itself is not
/// already a likely KO.
fn score_secondaries(ctx: &ScoreContext, def: &MoveDef, _ko_prob: f32) -> f32 {
    let mut value = 0.0;
    for secondary in &def.secondaries {
        match &secondary.effect {
            SecondaryEffect::StatusInfliction(status) => {
                value += status_value_against(ctx.opp(), *status) * secondary.chance;
            }
            SecondaryEffect::BoostChange(changes) => {
                for (stat, delta) in changes {
                    let weight = match stat {
                        Stat::Attack | Stat::SpecialAttack => 6.0,
                        Stat::Speed => 4.0,
                        _ => 2.5,
                    };
                    // Drops on the target and boosts on the user both help us.
                    value += weight * (*delta as f32).abs() * secondary.chance;
                }
            }
            SecondaryEffect::Flinch => {
                if !ctx.is_slower() {
                    value += 12.0 * secondary.chance;
                }
            }
            SecondaryEffect::Confusion => {
                value += 8.0 * secondary.chance;
            }
        }
    }
    value
}

/// How valuable inflicting `status` on this target is.
fn status_value_against(target: &PokemonState, status: Status) -> f32 {
    if target.status.blocks_new_status() {
        return 0.0;
    }
    match status {
        Status::Burn => {
            if target.types.contains(&PokemonType::Fire) {
                0.0
            } else if target.stats.attack >= target.stats.special_attack {
                28.0
            } else {
                12.0
            }
        }
        Status::Paralysis => {
            if target.types.contains(&PokemonType::Electric) {
                0.0
            } else if target.stats.speed >= 100 {
                22.0
            } else {
                9.0
            }
        }
        Status::Poison => {
            if target.is_poison_type() || target.types.contains(&PokemonType::Steel) {
                0.0
            } else {
                12.0
            }
        }
        Status::Toxic => {
            if target.is_poison_type() || target.types.contains(&PokemonType::Steel) {
                0.0
            } else {
                20.0
            }
        }
        Status::Sleep => 30.0,
        Status::Freeze => 25.0,
        _ => 0.0,
    }
}

/// Score status moves: status infliction, recovery, hazards, hazard removal,
/// screens, tailwind and Trick Room.
fn score_status_move(ctx: &ScoreContext, def: &MoveDef) -> f32 {
    let me = ctx.me();
    let opp = ctx.opp();
    let accuracy = def.hit_probability();
    let mut score = 0.0;

    if let Some(status) = def.status {
        let value = status_value_against(opp, status);
        if value <= 0.0 {
            return -15.0;
        }
        score += value * accuracy;
        // A miss wastes the whole turn.
        score -= (1.0 - accuracy) * 8.0;
    }

    if def.confuses {
        score += 10.0;
    }

    if def.heal > 0.0 {
        let missing = 1.0 - me.hp;
        score += (missing.min(def.heal) * 90.0) - 4.0;
        if me.hp > 0.85 {
            score -= 25.0;
        }
    }

    if let Some(condition) = def.sets_side_condition {
        score += score_side_condition_setting(ctx, condition);
    }

    if constants::is_both_sides_hazard_removal(def.id.as_str()) {
        let our_hazards = ctx
            .me_side()
            .conditions
            .iter()
            .filter(|(c, _)| c.is_hazard())
            .count() as f32;
        score += our_hazards * 9.0;
        // Defog also scrubs our own hazards off the opponent.
        let their_hazards = ctx
            .opp_side()
            .conditions
            .iter()
            .filter(|(c, _)| c.is_hazard())
            .count() as f32;
        score -= their_hazards * 4.0;
    }

    if def.sets_trick_room {
        if ctx.my_speed() < ctx.opp_speed() && !ctx.state.field.trick_room {
            score += 18.0;
        } else {
            score -= 12.0;
        }
    }

    if def.sets_weather.is_some() || def.sets_terrain.is_some() {
        score += 8.0;
    }

    score
}

fn score_side_condition_setting(ctx: &ScoreContext, condition: SideCondition) -> f32 {
    let mine = &ctx.me_side().conditions;
    match condition {
        SideCondition::StealthRock | SideCondition::StickyWeb => {
            if mine.is_active(condition) {
                -20.0
            } else {
                // Hazards gain value while the opponent still has unseen
                // reinforcements to bring in.
                let unseen = ctx.opp_side().unseen_slots() as f32;
                16.0 + 2.0 * unseen
            }
        }
        SideCondition::Spikes => {
            let layers = mine.get(condition);
            if layers >= 3 {
                -20.0
            } else {
                12.0 - 3.0 * layers as f32
            }
        }
        SideCondition::ToxicSpikes => {
            let layers = mine.get(condition);
            if layers >= 2 {
                -20.0
            } else {
                10.0 - 3.0 * layers as f32
            }
        }
        SideCondition::Reflect | SideCondition::LightScreen | SideCondition::AuroraVeil => {
            if mine.is_active(condition) {
                -18.0
            } else {
                14.0
            }
        }
        SideCondition::Tailwind => {
            if mine.is_active(condition) {
                -18.0
            } else if ctx.my_speed() < ctx.opp_speed() {
                16.0
            } else {
                8.0
            }
        }
    }
}

/// Score stat-boosting setup moves with diminishing returns, survival risk
/// scaling, a speed-flip bonus and horizon damping.
fn score_setup_move(ctx: &ScoreContext, def: &MoveDef) -> f32 {
    if def.is_damaging() {
        return 0.0;
    }
    let positive: Vec<(Stat, i8)> = def
        .self_boosts
        .iter()
        .copied()
        .filter(|(_, d)| *d > 0)
        .collect();
    if positive.is_empty() {
        return 0.0;
    }

    let me = ctx.me();
    let opp = ctx.opp();

    let mut boost_value: f32 = 0.0;
    for (stat, stages) in &positive {
        let current = me.stages.get(*stat);
        if current >= 6 {
            continue;
        }
        let actual = (*stages).min(6 - current);
        let base_per_stage = match stat {
            Stat::Attack | Stat::SpecialAttack => 30.0,
            Stat::Speed => 20.0,
            _ => 12.0,
        };
        for i in 0..actual {
            let new_level = current + i + 1;
            let multiplier = match new_level {
                ..=2 => 1.0,
                3 => 0.7,
                4 => 0.5,
                5 => 0.3,
                _ => 0.1,
            };
            boost_value += base_per_stage * multiplier;
        }
    }
    if boost_value <= 0.0 {
        return 0.0;
    }

    // Survival risk: setting up into a KO is throwing the turn away.
    let damage_ctx = DamageContext {
        field: &ctx.state.field,
        defender_conditions: &ctx.me_side().conditions,
        type_chart: &ctx.data.type_chart,
    };
    let mut opp_max_damage = 0.0f32;
    for move_id in &opp.moves {
        let opp_def = ctx.data.movedex.get_or_fallback(move_id);
        opp_max_damage =
            opp_max_damage.max(expected_damage_fraction(opp_def, opp, me, &damage_ctx, false));
    }
    if opp.moves.is_empty() {
        opp_max_damage = 0.35;
    }

    boost_value *= if opp_max_damage >= me.hp {
        0.15
    } else if opp_max_damage >= me.hp * 0.75 {
        0.35
    } else if opp_max_damage >= me.hp * 0.5 {
        0.55
    } else {
        1.10
    };

    // Speed boosts are mostly about flipping the order.
    let gained_spe = positive
        .iter()
        .find(|(s, _)| *s == Stat::Speed)
        .map(|(_, d)| *d)
        .unwrap_or(0);
    if gained_spe > 0 {
        let cur_stage = me.stages.get(Stat::Speed);
        let before = me.stats.speed as f32 * crate::types::StatStages::multiplier(cur_stage);
        let after = me.stats.speed as f32
            * crate::types::StatStages::multiplier((cur_stage + gained_spe).min(6));
        let opp_speed = ctx.opp_speed();
        if before < opp_speed && after >= opp_speed {
            boost_value *= 1.20;
        } else if before < opp_speed {
            boost_value *= 0.75;
        } else {
            boost_value *= 0.95;
        }
    }

    if positive.len() >= 2 {
        boost_value *= 1.10;
    }

    if me.hp > 0.8 && opp.hp > 0.6 {
        boost_value *= 1.05;
    } else if opp.hp < 0.3 {
        boost_value *= 0.45;
    }

    // Horizon damping: repeated setup past +1/+2 rarely pays off within the
    // rollout depth.
    let max_stage = me
        .stages
        .get(Stat::Attack)
        .max(me.stages.get(Stat::SpecialAttack))
        .max(me.stages.get(Stat::Speed));
    if max_stage >= 2 {
        boost_value *= 0.35;
    } else if max_stage >= 1 {
        boost_value *= 0.65;
    }

    boost_value.min(70.0)
}

/// Penalty for moves that drop our own offensive stats.
fn stat_drop_penalty(ctx: &ScoreContext, def: &MoveDef) -> f32 {
    let mut penalty = 0.0;
    for (stat, stages) in &def.self_boosts {
        if *stages >= 0 {
            continue;
        }
        let per_stage = match stat {
            Stat::Attack | Stat::SpecialAttack => 15.0,
            Stat::Speed => 10.0,
            _ => 5.0,
        };
        penalty += per_stage * (-*stages) as f32;
    }
    if penalty == 0.0 {
        return 0.0;
    }

    let opp_hp = ctx.opp().hp;
    if opp_hp < 0.3 {
        penalty *= 0.5;
    }
    let my_hp = ctx.me().hp;
    if my_hp > 0.7 && opp_hp > 0.5 {
        penalty *= 1.3;
    }
    penalty
}

/// Bonus for heightened-crit moves: they punch through defensive boosts, our
/// own attack drops, and screens. Clamped tight at the call site so crit
/// variance never dominates priors.
fn crit_bonus(ctx: &ScoreContext, def: &MoveDef, dmg_frac: f32, ko_prob: f32) -> f32 {
    if def.category == MoveCategory::Status {
        return 0.0;
    }
    let crit_chance = def.crit_chance();
    if crit_chance < 0.08 {
        return 0.0;
    }

    let mut bonus = 0.0;
    let is_physical = def.category == MoveCategory::Physical;

    let defensive_stat = if is_physical { Stat::Defense } else { Stat::SpecialDefense };
    let opp_def_boost = ctx.opp().stages.get(defensive_stat);
    if opp_def_boost > 0 {
        let impact = match opp_def_boost {
            1 => 8.0,
            2 => 15.0,
            _ => 22.0,
        };
        bonus += impact * crit_chance;
    }

    let offensive_stat = if is_physical { Stat::Attack } else { Stat::SpecialAttack };
    let my_atk_boost = ctx.me().stages.get(offensive_stat);
    if my_atk_boost < 0 {
        let impact = match my_atk_boost {
            -1 => 8.0,
            -2 => 15.0,
            _ => 22.0,
        };
        bonus += impact * crit_chance;
    }

    let opp_conditions = &ctx.opp_side().conditions;
    let screened = opp_conditions.is_active(SideCondition::AuroraVeil)
        || (is_physical && opp_conditions.is_active(SideCondition::Reflect))
        || (!is_physical && opp_conditions.is_active(SideCondition::LightScreen));
    if screened {
        bonus += 12.0 * crit_chance;
    }

    // Hits-to-KO improvement: a crit matters most when it changes the plan.
    if ko_prob < 0.90 && dmg_frac > 0.0 {
        let opp_hp = ctx.opp().hp.max(0.01);
        let htk = (opp_hp / dmg_frac.max(0.01)).ceil();
        let htk_crit = (opp_hp / (dmg_frac * 1.5).max(0.01)).ceil();
        let saved = htk - htk_crit;
        if saved >= 1.0 {
            let base = if htk >= 4.0 && htk_crit <= 2.0 {
                20.0
            } else if htk == 3.0 && htk_crit == 2.0 {
                15.0
            } else if htk == 2.0 && htk_crit == 1.0 {
                18.0
            } else if saved == 1.0 {
                10.0
            } else {
                12.0
            };
            bonus += base * crit_chance;
        }
    }

    bonus.min(25.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::side::SideState;
    use crate::core::state::{ShadowState, SideRef};
    use crate::data::GameData;
    use crate::types::MoveId;

    fn matchup(my_types: &[PokemonType], opp_types: &[PokemonType]) -> (ShadowState, GameData) {
        let mut me = PokemonState::new("attacker");
        me.types = my_types.to_vec();
        me.stats.attack = 180;
        me.stats.special_attack = 180;
        me.stats.speed = 120;
        me.moves = [
            MoveId::new("earthquake"),
            MoveId::new("toxic"),
            MoveId::new("swordsdance"),
            MoveId::new("stoneedge"),
        ]
        .into_iter()
        .collect();

        let mut opp = PokemonState::new("defender");
        opp.types = opp_types.to_vec();
        opp.stats.speed = 90;
        opp.moves.push(MoveId::new("tackle"));

        let state = ShadowState::new(
            SideState::new(vec![me], 0),
            SideState::new(vec![opp], 0),
        );
        (state, GameData::default())
    }

    #[test]
    fn test_super_effective_beats_resisted() {
        let (state, data) = matchup(
            &[PokemonType::Ground],
            &[PokemonType::Fire, PokemonType::Steel],
        );
        let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
        let eq = score_move(&ctx, &MoveId::new("earthquake"));
        let edge = score_move(&ctx, &MoveId::new("stoneedge"));
        assert!(eq > edge, "4x earthquake {eq} should beat stone edge {edge}");
    }

    #[test]
    fn test_toxic_worthless_against_steel() {
        let (state, data) = matchup(&[PokemonType::Ground], &[PokemonType::Steel]);
        let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
        let toxic = score_move(&ctx, &MoveId::new("toxic"));
        assert!(toxic < 0.0);
    }

    #[test]
    fn test_setup_scores_positive_in_safe_spot() {
        let (mut state, data) = matchup(&[PokemonType::Ground], &[PokemonType::Normal]);
        // Opponent's tackle barely scratches us.
        state.ours.active_mon_mut().stats.defense = 250;
        let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
        let sd = score_move(&ctx, &MoveId::new("swordsdance"));
        assert!(sd > 20.0, "swords dance should look attractive, got {sd}");
    }

    #[test]
    fn test_setup_damped_when_already_boosted() {
        let (mut state, data) = matchup(&[PokemonType::Ground], &[PokemonType::Normal]);
        state.ours.active_mon_mut().stats.defense = 250;
        let fresh = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_move(&ctx, &MoveId::new("swordsdance"))
        };
        state.ours.active_mon_mut().stages.apply(Stat::Attack, 2);
        let boosted = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_move(&ctx, &MoveId::new("swordsdance"))
        };
        assert!(boosted < fresh * 0.6);
    }

    #[test]
    fn test_recovery_scales_with_missing_hp() {
        let (mut state, data) = matchup(&[PokemonType::Normal], &[PokemonType::Normal]);
        state.ours.active_mon_mut().moves.push(MoveId::new("recover"));
        let healthy = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_move(&ctx, &MoveId::new("recover"))
        };
        state.ours.active_mon_mut().hp = 0.35;
        let hurt = {
            let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
            score_move(&ctx, &MoveId::new("recover"))
        };
        assert!(hurt > healthy + 20.0);
    }
}
