//! # Turn Transition
//!
//! `step` advances one full turn: opponent action sampling from the
//! determinised belief, turn ordering, both action resolutions with faint
//! and flinch skips, the end-of-turn pipeline, and forced replacement after
//! faints. Deterministic given the state and the RNG.

use crate::config::SearchConfig;
use crate::core::action::Action;
use crate::core::state::{ShadowState, SideRef, TurnEvent};
use crate::data::GameData;
use crate::engine::end_of_turn::apply_end_of_turn;
use crate::engine::move_effects::{apply_move, MoveOutcome};
use crate::engine::switch_effects::{apply_switch, apply_switch_unseen};
use crate::scoring::{score_move, score_switch, ScoreContext};
use crate::types::{DecisionError, DecisionResult, MoveId};
use crate::utils::sample_softmax;
use rand::rngs::StdRng;
use rand::Rng;

/// Advance one full turn. Returns a new state with `ply + 1`; the input
/// state is never mutated.
///
/// `our_action` must come from `state.legal_actions(data)`; anything else is
/// a programming error reported as `IllegalAction` so the planner can abort
/// the offending simulation and continue.
pub fn step(
    state: &ShadowState,
    our_action: &Action,
    data: &GameData,
    cfg: &SearchConfig,
    rng: &mut StdRng,
) -> DecisionResult<ShadowState> {
    if state.is_terminal() {
        return Ok(state.clone());
    }

    let legal = state.legal_actions(data);
    if !legal.contains(our_action) {
        return Err(DecisionError::IllegalAction {
            reason: format!("{our_action} is not legal in this state"),
        });
    }

    let mut s = state.clone();
    s.events.clear();
    s.pre_autoswitch_eval = None;

    let opp_action = choose_opponent_action(&s, data, cfg, rng);

    // Protect flags from the previous turn lapse before anything resolves.
    s.ours.active_mon_mut().volatiles.protect_this_turn = false;
    s.theirs.active_mon_mut().volatiles.protect_this_turn = false;

    let we_protect = uses_protect(our_action);
    let they_protect = uses_protect(&opp_action);

    let order = turn_order(&s, our_action, &opp_action, data, rng);
    let (first, first_action, second, second_action) = match order {
        Order::OursFirst => (SideRef::Ours, our_action, SideRef::Theirs, &opp_action),
        Order::TheirsFirst => (SideRef::Theirs, &opp_action, SideRef::Ours, our_action),
    };

    let first_outcome = apply_action(&mut s, first, first_action, data, cfg, rng)?;

    // The second mover is skipped entirely if it was KO'd, and may flinch.
    let mut skip_second = s.is_terminal() || s.side(second).active_mon().is_fainted();
    if !skip_second && first_outcome.hit {
        if let Action::Move(move_id) = first_action {
            let flinch_chance = data.movedex.get_or_fallback(move_id).flinch_chance();
            if flinch_chance > 0.0 && rng.gen::<f32>() < flinch_chance {
                s.record(TurnEvent::Flinch { side: second });
                skip_second = true;
            }
        }
    }

    if !skip_second {
        apply_action(&mut s, second, second_action, data, cfg, rng)?;
    }

    // Protect streaks reset for any side that did not protect this turn.
    if !we_protect {
        s.ours.protect_count = 0;
    }
    if !they_protect {
        s.theirs.protect_count = 0;
    }

    if !s.is_terminal() {
        apply_end_of_turn(&mut s);
    }

    force_replacements(&mut s, data, rng);

    s.ply += 1;
    Ok(s)
}

fn uses_protect(action: &Action) -> bool {
    action
        .move_id()
        .map(|id| crate::constants::is_protect_move(id.as_str()))
        .unwrap_or(false)
}

fn apply_action(
    s: &mut ShadowState,
    actor: SideRef,
    action: &Action,
    data: &GameData,
    cfg: &SearchConfig,
    rng: &mut StdRng,
) -> DecisionResult<MoveOutcome> {
    match action {
        Action::Switch(handle) => {
            apply_switch(s, actor, *handle, &data.type_chart);
            Ok(MoveOutcome::default())
        }
        Action::SwitchUnseen(_) => {
            if actor == SideRef::Ours {
                return Err(DecisionError::IllegalAction {
                    reason: "our side cannot switch to an unseen slot".to_string(),
                });
            }
            apply_switch_unseen(s, actor, data, rng);
            Ok(MoveOutcome::default())
        }
        Action::Move(move_id) => {
            let outcome = apply_move(s, actor, move_id, data, cfg, rng);
            if outcome.pivot_requested && !s.is_terminal() {
                pivot_out(s, actor, data, rng);
            }
            Ok(outcome)
        }
    }
}

enum Order {
    OursFirst,
    TheirsFirst,
}

/// Turn ordering: switches resolve before moves; two switches race on
/// effective speed; two moves compare priority, then speed (inverted under
/// Trick Room), with random tie-breaks throughout.
fn turn_order(
    s: &ShadowState,
    ours: &Action,
    theirs: &Action,
    data: &GameData,
    rng: &mut StdRng,
) -> Order {
    let our_switch = ours.is_switch();
    let their_switch = theirs.is_switch();

    if our_switch != their_switch {
        return if our_switch {
            Order::OursFirst
        } else {
            Order::TheirsFirst
        };
    }

    let my_speed = s.ours.active_effective_speed();
    let their_speed = s.theirs.active_effective_speed();

    if our_switch && their_switch {
        return if my_speed != their_speed {
            if my_speed > their_speed {
                Order::OursFirst
            } else {
                Order::TheirsFirst
            }
        } else if rng.gen::<bool>() {
            Order::OursFirst
        } else {
            Order::TheirsFirst
        };
    }

    let priority_of = |action: &Action| {
        action
            .move_id()
            .map(|id| data.movedex.get_or_fallback(id).priority)
            .unwrap_or(0)
    };
    let my_priority = priority_of(ours);
    let their_priority = priority_of(theirs);

    if my_priority != their_priority {
        return if my_priority > their_priority {
            Order::OursFirst
        } else {
            Order::TheirsFirst
        };
    }

    // Trick Room inverts the speed comparison for moves only.
    let (my_speed, their_speed) = if s.field.trick_room {
        (their_speed, my_speed)
    } else {
        (my_speed, their_speed)
    };

    if my_speed != their_speed {
        if my_speed > their_speed {
            Order::OursFirst
        } else {
            Order::TheirsFirst
        }
    } else if rng.gen::<bool>() {
        Order::OursFirst
    } else {
        Order::TheirsFirst
    }
}

/// Sample the opposing action: determinise the belief for the active, build
/// the legal action list (sampled moves constrained to include revealed
/// ones, known switches, unseen slots), score everything with the shared
/// heuristics and sample from the softmax at `tau_opp`.
fn choose_opponent_action(
    s: &ShadowState,
    data: &GameData,
    cfg: &SearchConfig,
    rng: &mut StdRng,
) -> Action {
    let side = &s.theirs;
    let mut actions: Vec<Action>;

    if side.active_mon().is_fainted() {
        actions = s.legal_actions_for(SideRef::Theirs, data);
    } else if let Some(belief) = side.active_belief() {
        let det = belief.determinize(rng);
        let mut move_ids: Vec<MoveId> = det.moves4;
        for revealed in &side.active_mon().moves {
            if !move_ids.contains(revealed) {
                move_ids.push(revealed.clone());
            }
        }

        // Choice lock trumps the sampled set.
        if let Some(locked) = &side.choice_lock {
            if side.active_mon().holds_choice_item() && move_ids.contains(locked) {
                move_ids = vec![locked.clone()];
            }
        }

        // Sleep usability mirrors the known-move path: a mon staying asleep
        // can only use sleep-usable moves, a waking mon drops them.
        if side.active_mon().status == crate::types::Status::Sleep {
            let sleep_turns = side.active_mon().volatiles.sleep_turns;
            let keep_sleep_usable = sleep_turns > 1;
            let filtered: Vec<MoveId> = move_ids
                .iter()
                .filter(|id| {
                    let usable = data
                        .movedex
                        .get(id)
                        .map(|def| def.sleep_usable)
                        .unwrap_or(false);
                    usable == keep_sleep_usable
                })
                .cloned()
                .collect();
            if !filtered.is_empty() {
                move_ids = filtered;
            }
        }

        actions = move_ids.into_iter().map(Action::Move).collect();
        for handle in side.alive_bench() {
            actions.push(Action::Switch(handle));
        }
        if side.can_materialize_unseen() {
            for slot in side.team.len()..crate::core::side::TEAM_SIZE {
                actions.push(Action::SwitchUnseen(slot));
            }
        }
    } else {
        actions = s.legal_actions_for(SideRef::Theirs, data);
    }

    // Protect availability: a third consecutive protect almost never works,
    // so the sampled policy stops considering it.
    if side.protect_count >= 2 {
        let filtered: Vec<Action> = actions
            .iter()
            .filter(|a| !uses_protect(a))
            .cloned()
            .collect();
        if !filtered.is_empty() {
            actions = filtered;
        }
    }

    if actions.is_empty() {
        // Nothing legal at all: model a no-op struggle.
        return Action::Move(MoveId::new("struggle"));
    }
    if actions.len() == 1 {
        return actions.remove(0);
    }

    // Peek-sample one species to stand in for every unseen slot this turn.
    let unseen_species = if actions.iter().any(|a| matches!(a, Action::SwitchUnseen(_))) {
        side.team_belief
            .as_ref()
            .and_then(|tb| tb.peek(rng).cloned())
    } else {
        None
    };

    let ctx = ScoreContext::new(s, SideRef::Theirs, data);
    let scores: Vec<f32> = actions
        .iter()
        .map(|action| match action {
            Action::Move(id) => score_move(&ctx, id),
            Action::Switch(handle) => score_switch(&ctx, *handle),
            Action::SwitchUnseen(_) => match &unseen_species {
                Some(species) => {
                    crate::scoring::switch_score::score_unseen_switch(&ctx, species)
                }
                None => 0.0,
            },
        })
        .collect();

    let idx = sample_softmax(&scores, cfg.tau_opp, rng);
    actions.swap_remove(idx)
}

/// Pivot exit: the actor switches to its best-scoring alive bench option.
fn pivot_out(s: &mut ShadowState, actor: SideRef, data: &GameData, rng: &mut StdRng) {
    match best_switch_target(s, actor, data) {
        Some(BestSwitch::Known(handle)) => {
            apply_switch(s, actor, handle, &data.type_chart);
        }
        Some(BestSwitch::Unseen) => {
            apply_switch_unseen(s, actor, data, rng);
        }
        None => {}
    }
}

enum BestSwitch {
    Known(usize),
    Unseen,
}

fn best_switch_target(s: &ShadowState, side_ref: SideRef, data: &GameData) -> Option<BestSwitch> {
    let side = s.side(side_ref);
    let ctx = ScoreContext::new(s, side_ref, data);

    let best_known = side
        .alive_bench()
        .into_iter()
        .map(|handle| (handle, score_switch(&ctx, handle)))
        .max_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((handle, _)) = best_known {
        return Some(BestSwitch::Known(handle));
    }
    if side_ref == SideRef::Theirs && side.can_materialize_unseen() {
        return Some(BestSwitch::Unseen);
    }
    None
}

/// Forced replacement after faints.
///
/// When our active went down and the opponent's is still standing, the
/// pre-autoswitch evaluation is snapshotted first so the search still sees
/// the KO penalty after the bench replacement.
fn force_replacements(s: &mut ShadowState, data: &GameData, rng: &mut StdRng) {
    if !s.is_terminal() && s.ours.active_mon().is_fainted() {
        if s.theirs.active_mon().is_alive() {
            s.pre_autoswitch_eval = Some(crate::eval::pre_autoswitch_value(s));
        }
        if let Some(BestSwitch::Known(handle)) = best_switch_target(s, SideRef::Ours, data) {
            let species = s.ours.team[handle].species.clone();
            apply_switch(s, SideRef::Ours, handle, &data.type_chart);
            s.record(TurnEvent::AutoSwitch {
                side: SideRef::Ours,
                species,
            });
        }
    }

    if !s.is_terminal() && s.theirs.active_mon().is_fainted() {
        match best_switch_target(s, SideRef::Theirs, data) {
            Some(BestSwitch::Known(handle)) => {
                let species = s.theirs.team[handle].species.clone();
                apply_switch(s, SideRef::Theirs, handle, &data.type_chart);
                s.record(TurnEvent::AutoSwitch {
                    side: SideRef::Theirs,
                    species,
                });
            }
            Some(BestSwitch::Unseen) => {
                apply_switch_unseen(s, SideRef::Theirs, data, rng);
            }
            None => {}
        }
    }
}
