//! # Decision Agent
//!
//! The per-turn entry point: build the root shadow state from the observed
//! snapshot, refresh beliefs, run (or short-circuit) the planner and return
//! the chosen action with its search statistics.

use crate::config::SearchConfig;
use crate::core::action::Action;
use crate::core::snapshot::BattleSnapshot;
use crate::core::state::{ShadowState, SideRef};
use crate::data::GameData;
use crate::scoring::{score_move, score_switch, ScoreContext};
use crate::search::{run_search, ActionStats};
use crate::types::{DecisionResult, SpeciesId};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// What the agent decided to do this turn.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionAction {
    Chosen(Action),
    /// No action could be produced; the client should submit any legal
    /// action (or forfeit).
    Fallback,
}

/// A decision together with its observability payload.
#[derive(Debug, Clone)]
pub struct Decision {
    pub action: DecisionAction,
    /// Per-action visit/Q/prior statistics from the search (empty when the
    /// search was short-circuited)
    pub stats: Vec<ActionStats>,
    /// 0 indicates a dominant-move short-circuit or a single legal action
    pub simulations_used: u32,
    pub failed_simulations: u32,
}

impl Decision {
    fn immediate(action: Action) -> Self {
        Self {
            action: DecisionAction::Chosen(action),
            stats: Vec::new(),
            simulations_used: 0,
            failed_simulations: 0,
        }
    }

    fn fallback() -> Self {
        Self {
            action: DecisionAction::Fallback,
            stats: Vec::new(),
            simulations_used: 0,
            failed_simulations: 0,
        }
    }
}

/// Stateful battle agent.
///
/// Beliefs persist across turns keyed by opposing species; `decide` can also
/// be used one-shot since every snapshot carries enough to rebuild them.
pub struct Agent {
    data: Arc<GameData>,
    beliefs: HashMap<SpeciesId, crate::belief::Belief>,
}

impl Agent {
    pub fn new(data: Arc<GameData>) -> Self {
        Self {
            data,
            beliefs: HashMap::new(),
        }
    }

    pub fn data(&self) -> &Arc<GameData> {
        &self.data
    }

    /// Fold the snapshot's observations into the persistent beliefs.
    ///
    /// New observations are hard filters; previously applied ones are
    /// naturally idempotent.
    pub fn update_belief(&mut self, snapshot: &BattleSnapshot) {
        for view in &snapshot.theirs.pokemon {
            let entry = self.beliefs.entry(view.species.clone()).or_insert_with(|| {
                crate::belief::Belief::build(
                    view.species.clone(),
                    &view.moves.iter().cloned().collect(),
                    view.item.clone(),
                    view.ability.clone(),
                    view.tera_type,
                    &self.data,
                )
            });
            for move_id in &view.moves {
                if !entry.revealed_moves.contains(move_id) {
                    entry.observe_move(move_id.clone());
                }
            }
            if let Some(item) = &view.item {
                if entry.revealed_item.as_ref() != Some(item) {
                    entry.observe_item(item.clone());
                }
            }
            if let Some(ability) = &view.ability {
                if entry.revealed_ability.as_ref() != Some(ability) {
                    entry.observe_ability(ability.clone());
                }
            }
            if let Some(tera) = view.tera_type {
                if entry.revealed_tera != Some(tera) {
                    entry.observe_tera(tera);
                }
            }
        }
    }

    /// Decide one turn.
    ///
    /// `available_actions` is the client's legal action list for this turn;
    /// when `None`, the engine derives legality itself. The search can be
    /// cancelled between simulations through `cancel`; whatever visit counts
    /// exist at that point still select the action.
    pub fn decide(
        &mut self,
        snapshot: &BattleSnapshot,
        available_actions: Option<&[Action]>,
        cfg: &SearchConfig,
        cancel: Option<&AtomicBool>,
    ) -> DecisionResult<Decision> {
        self.update_belief(snapshot);
        let mut state = ShadowState::from_snapshot(snapshot, &self.data)?;

        // Splice the persistent (longer-lived) beliefs over the fresh ones.
        for (handle, view) in snapshot.theirs.pokemon.iter().enumerate() {
            if let Some(belief) = self.beliefs.get(&view.species) {
                state.theirs.beliefs[handle] = Some(belief.clone());
            }
        }

        let actions = match available_actions {
            Some(provided) => provided.to_vec(),
            None => state.legal_actions(&self.data),
        };
        if actions.is_empty() {
            return Ok(Decision::fallback());
        }
        if let [only] = actions.as_slice() {
            return Ok(Decision::immediate(only.clone()));
        }

        // Dominant-move short-circuit: an obvious KO skips the search.
        let scored = self.score_actions(&state, &actions);
        if let Some((action, score)) = scored
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(a, s)| (a.clone(), *s))
        {
            if action.is_move() && score >= cfg.dominant_move_threshold {
                tracing::debug!(%action, score, "dominant move short-circuit");
                return Ok(Decision::immediate(action));
            }
        }

        let result = run_search(&state, &self.data, cfg, cancel);

        // The search plans over the engine's own legal set; respect the
        // client's constraint when picking.
        let best = result
            .stats
            .iter()
            .filter(|s| actions.contains(&s.action))
            .max_by(|a, b| {
                a.visits
                    .cmp(&b.visits)
                    .then(a.q.total_cmp(&b.q))
                    .then(a.prior.total_cmp(&b.prior))
            })
            .map(|s| s.action.clone());

        let action = match best {
            Some(action) => action,
            // Zero simulations completed: fall back to the heuristic best.
            None => match scored.into_iter().max_by(|a, b| a.1.total_cmp(&b.1)) {
                Some((action, _)) => action,
                None => return Ok(Decision::fallback()),
            },
        };

        Ok(Decision {
            action: DecisionAction::Chosen(action),
            stats: result.stats,
            simulations_used: result.simulations_used,
            failed_simulations: result.failed_simulations,
        })
    }

    fn score_actions(&self, state: &ShadowState, actions: &[Action]) -> Vec<(Action, f32)> {
        let ctx = ScoreContext::new(state, SideRef::Ours, &self.data);
        actions
            .iter()
            .map(|action| {
                let score = match action {
                    Action::Move(id) => score_move(&ctx, id),
                    Action::Switch(handle) => score_switch(&ctx, *handle),
                    Action::SwitchUnseen(_) => -200.0,
                };
                (action.clone(), score)
            })
            .collect()
    }
}

/// One-shot convenience wrapper around a throwaway `Agent`.
pub fn decide(
    snapshot: &BattleSnapshot,
    available_actions: Option<&[Action]>,
    cfg: &SearchConfig,
    data: Arc<GameData>,
) -> DecisionResult<Decision> {
    Agent::new(data).decide(snapshot, available_actions, cfg, None)
}
