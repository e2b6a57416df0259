//! # Move Resolution
//!
//! One side's move resolved through the fixed pipeline: sleep, freeze,
//! confusion and paralysis gates, terrain priority blocking, protect,
//! healing, the accuracy roll, damage with crit sampling, secondary effects,
//! drain/recoil/Life Orb, hazard removal, field setting and choice locking.
//!
//! Both sides share this code path; the acting side is a parameter.

use crate::constants::{
    self, CONFUSION_SELF_HIT, CONFUSION_SELF_HIT_CHANCE, CRASH_DAMAGE, FULL_PARALYSIS_CHANCE,
    THAW_CHANCE,
};
use crate::config::SearchConfig;
use crate::core::state::{ShadowState, SideRef, TurnEvent};
use crate::data::{EffectTarget, GameData, MoveDef, SecondaryEffect};
use crate::engine::damage::{expected_damage_fraction, DamageContext};
use crate::types::{MoveId, PokemonType, Status, Terrain};
use rand::rngs::StdRng;
use rand::Rng;

/// What happened when a move resolved; the turn loop uses this for flinch
/// checks and pivot exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOutcome {
    /// The move got past every gate and its accuracy roll
    pub hit: bool,
    /// Damage dealt as a fraction of the defender's max HP
    pub damage_dealt: f32,
    /// A pivot move connected; the actor wants to switch out
    pub pivot_requested: bool,
}

/// Resolve `actor` using `move_id` against the opposing active.
pub fn apply_move(
    state: &mut ShadowState,
    actor: SideRef,
    move_id: &MoveId,
    data: &GameData,
    cfg: &SearchConfig,
    rng: &mut StdRng,
) -> MoveOutcome {
    let defender_side = actor.opponent();
    let move_def = data.movedex.get_or_fallback(move_id).clone();

    // Sleep gate: decrement the counter, wake at zero, otherwise only
    // sleep-usable moves act.
    if state.side(actor).active_mon().status == Status::Sleep {
        let sleep_turns = state.side(actor).active_mon().volatiles.sleep_turns;
        if sleep_turns > 0 {
            let remaining = sleep_turns - 1;
            let mon = state.side_mut(actor).active_mon_mut();
            mon.volatiles.sleep_turns = remaining;
            if remaining == 0 {
                mon.status = Status::None;
                state.record(TurnEvent::Wake { side: actor });
            } else if !move_def.sleep_usable {
                state.record(TurnEvent::Asleep { side: actor });
                return MoveOutcome::default();
            }
        }
    }

    // Freeze gate: Fire moves always thaw the user, otherwise 20% per turn.
    if state.side(actor).active_mon().status == Status::Freeze {
        let thaws = move_def.move_type == PokemonType::Fire || rng.gen::<f32>() < THAW_CHANCE;
        if thaws {
            state.side_mut(actor).active_mon_mut().status = Status::None;
            state.record(TurnEvent::Thaw { side: actor });
        } else {
            state.record(TurnEvent::Frozen { side: actor });
            return MoveOutcome::default();
        }
    }

    // Confusion gate: decrement, then 1/3 chance of a 5% self-hit.
    if state.side(actor).active_mon().volatiles.is_confused() {
        let mon = state.side_mut(actor).active_mon_mut();
        mon.volatiles.confusion_turns -= 1;
        if rng.gen::<f32>() < CONFUSION_SELF_HIT_CHANCE {
            state
                .side_mut(actor)
                .active_mon_mut()
                .adjust_hp(-CONFUSION_SELF_HIT);
            state.record(TurnEvent::ConfusionSelfHit { side: actor });
            return MoveOutcome::default();
        }
    }

    // Paralysis gate.
    if state.side(actor).active_mon().status == Status::Paralysis
        && rng.gen::<f32>() < FULL_PARALYSIS_CHANCE
    {
        state.record(TurnEvent::FullParalysis { side: actor });
        return MoveOutcome::default();
    }

    // Psychic Terrain blocks positive-priority moves against grounded targets.
    if state.field.terrain == Terrain::Psychic
        && move_def.priority > 0
        && state.side(defender_side).active_mon().is_grounded()
    {
        state.record(TurnEvent::PriorityBlocked {
            side: actor,
            move_id: move_id.clone(),
        });
        return MoveOutcome::default();
    }

    // Protect execution: success decays 1/3^n over consecutive uses.
    if constants::is_protect_move(move_id.as_str()) {
        let count = state.side(actor).protect_count;
        let success_rate = 1.0 / 3f32.powi(count as i32);
        if rng.gen::<f32>() < success_rate {
            state.side_mut(actor).active_mon_mut().volatiles.protect_this_turn = true;
            state.side_mut(actor).protect_count = count + 1;
            state.record(TurnEvent::ProtectSuccess { side: actor });
        } else {
            state.side_mut(actor).protect_count = 0;
            state.record(TurnEvent::ProtectFail { side: actor });
        }
        return MoveOutcome::default();
    }

    // Protect defence: damaging moves bounce off a protected target.
    if state.side(defender_side).active_mon().volatiles.protect_this_turn
        && move_def.is_damaging()
    {
        state.record(TurnEvent::BlockedByProtect {
            side: actor,
            move_id: move_id.clone(),
        });
        return MoveOutcome::default();
    }

    // Recovery moves heal and end the action.
    if move_def.heal > 0.0 {
        state.side_mut(actor).active_mon_mut().adjust_hp(move_def.heal);
        return MoveOutcome { hit: true, ..Default::default() };
    }

    // Accuracy roll (forced outcome wins; miss modelling can be disabled).
    let forced_hit = state.forced.hit.take();
    let hit = match forced_hit {
        Some(hit) => hit,
        None => !cfg.model_miss || rng.gen::<f32>() < move_def.hit_probability(),
    };

    if !hit {
        state.record(TurnEvent::Miss {
            side: actor,
            move_id: move_id.clone(),
        });
        if move_def.crash_on_miss {
            state.side_mut(actor).active_mon_mut().adjust_hp(-CRASH_DAMAGE);
            state.record(TurnEvent::CrashDamage { side: actor });
        }
        state.forced.crit = None;
        return MoveOutcome::default();
    }

    // Damage with crit sampling.
    let mut damage_dealt = 0.0;
    if move_def.is_damaging() {
        let forced_crit = state.forced.crit.take();
        let is_crit = match forced_crit {
            Some(crit) => crit,
            None => cfg.model_crit && rng.gen::<f32>() < move_def.crit_chance(),
        };

        let frac = {
            let attacker = state.side(actor).active_mon();
            let defender = state.side(defender_side).active_mon();
            let ctx = DamageContext {
                field: &state.field,
                defender_conditions: &state.side(defender_side).conditions,
                type_chart: &data.type_chart,
            };
            let mut frac = expected_damage_fraction(&move_def, attacker, defender, &ctx, is_crit);
            if is_crit {
                frac *= cfg.crit_multiplier;
            }
            frac
        };

        if is_crit && frac > 0.0 {
            state.record(TurnEvent::Crit {
                side: actor,
                move_id: move_id.clone(),
            });
        }

        let defender_hp = state.side(defender_side).active_mon().hp;
        damage_dealt = frac.min(defender_hp).max(0.0);
        state
            .side_mut(defender_side)
            .active_mon_mut()
            .adjust_hp(-frac);
    } else {
        state.forced.crit = None;
    }

    // Secondary status infliction.
    apply_status_secondary(state, actor, &move_def, cfg, rng);

    // Stat stage changes: guaranteed first, then chance-based secondaries.
    apply_boost_effects(state, actor, &move_def, rng);

    // Confusion infliction.
    apply_confusion(state, actor, &move_def, cfg, rng);

    // Drain and recoil scale with damage actually dealt.
    if damage_dealt > 0.0 {
        if move_def.drain > 0.0 {
            state
                .side_mut(actor)
                .active_mon_mut()
                .adjust_hp(damage_dealt * move_def.drain);
        }
        if move_def.recoil > 0.0 {
            state
                .side_mut(actor)
                .active_mon_mut()
                .adjust_hp(-(damage_dealt * move_def.recoil));
        }
    }

    // Life Orb chips the holder after any damaging move.
    if move_def.is_damaging() && state.side(actor).active_mon().has_item("lifeorb") {
        state
            .side_mut(actor)
            .active_mon_mut()
            .adjust_hp(-constants::LIFE_ORB_RECOIL);
    }

    // Hazard removal.
    if constants::is_own_side_hazard_removal(move_id.as_str()) {
        state.side_mut(actor).conditions.clear_hazards();
    } else if constants::is_both_sides_hazard_removal(move_id.as_str()) {
        state.side_mut(actor).conditions.clear_hazards();
        state.side_mut(defender_side).conditions.clear_hazards();
    }

    // Field and side-condition setting.
    if let Some(weather) = move_def.sets_weather {
        state.field.set_weather(weather);
    }
    if let Some(terrain) = move_def.sets_terrain {
        state.field.set_terrain(terrain);
    }
    if move_def.sets_trick_room {
        state.field.toggle_trick_room();
    }
    if let Some(condition) = move_def.sets_side_condition {
        state.side_mut(actor).conditions.apply(condition);
    }

    // Choice lock sticks after a successful move.
    if state.side(actor).active_mon().holds_choice_item() {
        state.side_mut(actor).choice_lock = Some(move_id.clone());
    }

    MoveOutcome {
        hit: true,
        damage_dealt,
        pivot_requested: constants::is_pivot_move(move_id.as_str()),
    }
}

fn apply_status_secondary(
    state: &mut ShadowState,
    actor: SideRef,
    move_def: &MoveDef,
    cfg: &SearchConfig,
    rng: &mut StdRng,
) {
    let Some((status, chance)) = move_def.status_infliction() else {
        return;
    };
    if chance < cfg.status_threshold {
        return;
    }

    let defender_side = actor.opponent();
    let defender_grounded = state.side(defender_side).active_mon().is_grounded();

    // Terrain immunities for grounded targets.
    if defender_grounded {
        if status == Status::Sleep && state.field.terrain == Terrain::Electric {
            return;
        }
        if state.field.terrain == Terrain::Misty {
            return;
        }
    }

    if chance < 1.0 && rng.gen::<f32>() >= chance {
        return;
    }

    // Type immunities: Poison/Steel cannot be poisoned, Fire cannot be
    // burned, Electric cannot be paralyzed.
    let defender = state.side(defender_side).active_mon();
    let immune = match status {
        Status::Poison | Status::Toxic => {
            defender.is_poison_type() || defender.types.contains(&PokemonType::Steel)
        }
        Status::Burn => defender.types.contains(&PokemonType::Fire),
        Status::Paralysis => defender.types.contains(&PokemonType::Electric),
        _ => false,
    };
    if immune {
        return;
    }

    if defender.status.blocks_new_status() || defender.is_fainted() {
        return;
    }

    let sleep_turns = if status == Status::Sleep {
        rng.gen_range(1..=3)
    } else {
        0
    };
    let mon = state.side_mut(defender_side).active_mon_mut();
    mon.status = status;
    if status == Status::Sleep {
        mon.volatiles.sleep_turns = sleep_turns;
    }
}

fn apply_boost_effects(
    state: &mut ShadowState,
    actor: SideRef,
    move_def: &MoveDef,
    rng: &mut StdRng,
) {
    let defender_side = actor.opponent();

    for (stat, delta) in &move_def.self_boosts {
        state
            .side_mut(actor)
            .active_mon_mut()
            .stages
            .apply(*stat, *delta);
    }
    for (stat, delta) in &move_def.target_boosts {
        state
            .side_mut(defender_side)
            .active_mon_mut()
            .stages
            .apply(*stat, *delta);
    }

    for secondary in &move_def.secondaries {
        let SecondaryEffect::BoostChange(changes) = &secondary.effect else {
            continue;
        };
        if secondary.chance < 1.0 && rng.gen::<f32>() >= secondary.chance {
            continue;
        }
        let side = match secondary.target {
            EffectTarget::User => actor,
            EffectTarget::Target => defender_side,
        };
        for (stat, delta) in changes {
            state.side_mut(side).active_mon_mut().stages.apply(*stat, *delta);
        }
    }
}

fn apply_confusion(
    state: &mut ShadowState,
    actor: SideRef,
    move_def: &MoveDef,
    cfg: &SearchConfig,
    rng: &mut StdRng,
) {
    let mut chance = if move_def.confuses { 1.0 } else { 0.0 };
    if chance == 0.0 {
        for secondary in &move_def.secondaries {
            if matches!(secondary.effect, SecondaryEffect::Confusion) {
                chance = secondary.chance;
                break;
            }
        }
    }
    if chance == 0.0 || chance < cfg.status_threshold {
        return;
    }
    if chance < 1.0 && rng.gen::<f32>() >= chance {
        return;
    }

    let turns = rng.gen_range(2..=5);
    let defender = state.side_mut(actor.opponent()).active_mon_mut();
    if defender.volatiles.confusion_turns == 0 && defender.is_alive() {
        defender.volatiles.confusion_turns = turns;
    }
}
