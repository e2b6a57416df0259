//! # PUCT Monte-Carlo Tree Search
//!
//! Upper-Confidence-Tree planner over shadow states: heuristic softmax
//! priors, optional hybrid (outcome-split) expansion for inaccurate or
//! high-crit moves, bounded policy-weighted rollouts with the positional
//! evaluator at the leaves, and visit-count action selection at the root.
//!
//! Determinism: each simulation draws from a child RNG seeded from the root
//! seed and the simulation index, so a fixed (state, config, seed) triple
//! reproduces the decision bit for bit. Optional root parallelism builds
//! independent trees on rayon workers and sums their visit counts.

use crate::config::SearchConfig;
use crate::core::action::Action;
use crate::core::state::{ShadowState, SideRef};
use crate::data::GameData;
use crate::engine::turn::step;
use crate::eval::evaluate;
use crate::scoring::{score_move, score_switch, ScoreContext};
use crate::types::DecisionResult;
use crate::utils::{sample_softmax, softmax_probs};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Stochastic-outcome tag on a hybrid-expanded child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeTag {
    Hit,
    HitCrit,
    Miss,
}

/// Per-action statistics aggregated over outcome tags.
#[derive(Debug, Clone)]
pub struct ActionStats {
    pub action: Action,
    pub visits: u32,
    pub q: f32,
    pub prior: f32,
}

/// The outcome of one search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best: Option<Action>,
    pub stats: Vec<ActionStats>,
    pub simulations_used: u32,
    pub failed_simulations: u32,
}

struct Child {
    action: Action,
    outcome: Option<OutcomeTag>,
    prior: f32,
    node: usize,
}

struct Node {
    /// Materialised lazily on first visit (root starts materialised)
    state: Option<ShadowState>,
    visits: u32,
    value_sum: f32,
    expanded: bool,
    children: Vec<Child>,
}

impl Node {
    fn unmaterialized() -> Self {
        Self {
            state: None,
            visits: 0,
            value_sum: 0.0,
            expanded: false,
            children: Vec::new(),
        }
    }

    fn q(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f32
        }
    }
}

/// Single search tree.
struct Tree<'a> {
    arena: Vec<Node>,
    data: &'a GameData,
    cfg: &'a SearchConfig,
}

impl<'a> Tree<'a> {
    fn new(root_state: ShadowState, data: &'a GameData, cfg: &'a SearchConfig) -> Self {
        let mut root = Node::unmaterialized();
        root.state = Some(root_state);
        Self {
            arena: vec![root],
            data,
            cfg,
        }
    }

    /// One MCTS iteration: select, expand, simulate, backup.
    fn simulate_once(&mut self, rng: &mut StdRng) -> DecisionResult<()> {
        let mut path = vec![0usize];
        let mut node_idx = 0usize;

        // Selection: descend while the node is expanded and non-terminal.
        loop {
            self.materialize(node_idx, &mut path, rng)?;
            let node = &self.arena[node_idx];
            let state = node.state.as_ref().ok_or_else(|| {
                crate::types::DecisionError::IllegalAction {
                    reason: "search node lost its state".to_string(),
                }
            })?;
            if state.is_terminal() {
                break;
            }
            if !node.expanded {
                self.expand(node_idx)?;
            }
            if self.arena[node_idx].children.is_empty() {
                break;
            }
            let child_idx = self.select_child(node_idx, rng);
            node_idx = self.arena[node_idx].children[child_idx].node;
            path.push(node_idx);
            if self.arena[node_idx].visits > 0 {
                continue;
            }
            // Freshly reached node: materialise and stop the descent here.
            self.materialize(node_idx, &mut path, rng)?;
            break;
        }

        // Simulation from the leaf.
        let value = {
            let leaf_state = self.arena[node_idx]
                .state
                .as_ref()
                .ok_or_else(|| crate::types::DecisionError::IllegalAction {
                    reason: "unmaterialized leaf".to_string(),
                })?
                .clone();
            self.rollout(leaf_state, rng)?
        };

        // Backup: values are already signed from our perspective.
        for idx in path {
            let node = &mut self.arena[idx];
            node.visits += 1;
            node.value_sum += value;
        }
        Ok(())
    }

    /// Ensure the node at the end of `path` has a state, computing it from
    /// its parent with `step` (honouring a forced-outcome tag).
    fn materialize(
        &mut self,
        node_idx: usize,
        path: &mut Vec<usize>,
        rng: &mut StdRng,
    ) -> DecisionResult<()> {
        if self.arena[node_idx].state.is_some() {
            return Ok(());
        }
        // Find the parent and the connecting child edge.
        let parent_idx = path[path.len() - 2];
        let (action, outcome) = {
            let parent = &self.arena[parent_idx];
            let child = parent
                .children
                .iter()
                .find(|c| c.node == node_idx)
                .ok_or_else(|| crate::types::DecisionError::IllegalAction {
                    reason: "dangling tree edge".to_string(),
                })?;
            (child.action.clone(), child.outcome)
        };

        let new_state = {
            let parent_state = self.arena[parent_idx].state.as_ref().ok_or_else(|| {
                crate::types::DecisionError::IllegalAction {
                    reason: "parent state missing".to_string(),
                }
            })?;
            let seed_state = match outcome {
                Some(OutcomeTag::Hit) => parent_state.with_forced_outcome(Some(true), Some(false)),
                Some(OutcomeTag::HitCrit) => {
                    parent_state.with_forced_outcome(Some(true), Some(true))
                }
                Some(OutcomeTag::Miss) => parent_state.with_forced_outcome(Some(false), None),
                None => parent_state.clone(),
            };
            step(&seed_state, &action, self.data, self.cfg, rng)?
        };
        self.arena[node_idx].state = Some(new_state);
        Ok(())
    }

    /// Expand a leaf: enumerate legal actions, convert heuristic scores to
    /// softmax priors, and split stochastic moves into outcome children when
    /// hybrid expansion is on.
    fn expand(&mut self, node_idx: usize) -> DecisionResult<()> {
        let (actions, scores) = {
            let state = self.arena[node_idx].state.as_ref().ok_or_else(|| {
                crate::types::DecisionError::IllegalAction {
                    reason: "expanding unmaterialized node".to_string(),
                }
            })?;
            let actions = state.legal_actions(self.data);
            let ctx = ScoreContext::new(state, SideRef::Ours, self.data);
            let scores: Vec<f32> = actions
                .iter()
                .map(|action| match action {
                    Action::Move(id) => score_move(&ctx, id),
                    Action::Switch(handle) => score_switch(&ctx, *handle),
                    Action::SwitchUnseen(_) => -100.0,
                })
                .collect();
            (actions, scores)
        };

        if actions.is_empty() {
            self.arena[node_idx].expanded = true;
            return Ok(());
        }

        let priors = softmax_probs(&scores, self.cfg.tau_prior, 1e-6);
        let mut children = Vec::new();

        for (action, prior) in actions.into_iter().zip(priors) {
            let splits = self.outcome_splits(&action, prior);
            for (outcome, split_prior) in splits {
                let node = self.push_node();
                children.push(Child {
                    action: action.clone(),
                    outcome,
                    prior: split_prior,
                    node,
                });
            }
        }

        // Renormalise after splitting so priors still sum to one.
        let total: f32 = children.iter().map(|c| c.prior).sum();
        if total > 0.0 && total.is_finite() {
            for child in children.iter_mut() {
                child.prior /= total;
            }
        }

        let node = &mut self.arena[node_idx];
        node.children = children;
        node.expanded = true;
        Ok(())
    }

    /// Outcome splits for one action under hybrid expansion: up to
    /// {hit, hit+crit, miss} children with the action's prior redistributed
    /// by outcome probability.
    fn outcome_splits(&self, action: &Action, prior: f32) -> Vec<(Option<OutcomeTag>, f32)> {
        if !self.cfg.hybrid_expansion {
            return vec![(None, prior)];
        }
        let Some(move_id) = action.move_id() else {
            return vec![(None, prior)];
        };
        let def = self.data.movedex.get_or_fallback(move_id);
        if !def.is_damaging() {
            return vec![(None, prior)];
        }

        let hit_p = def.hit_probability();
        let crit_p = if self.cfg.model_crit { def.crit_chance() } else { 0.0 };
        let inaccurate = self.cfg.model_miss && hit_p < self.cfg.hybrid_accuracy_threshold;
        let crit_branch = crit_p >= self.cfg.hybrid_crit_threshold;

        if !inaccurate && !crit_branch {
            return vec![(None, prior)];
        }

        let mut splits = Vec::new();
        if crit_branch {
            splits.push((Some(OutcomeTag::Hit), prior * hit_p * (1.0 - crit_p)));
            splits.push((Some(OutcomeTag::HitCrit), prior * hit_p * crit_p));
        } else {
            splits.push((Some(OutcomeTag::Hit), prior * hit_p));
        }
        if self.cfg.model_miss && hit_p < 1.0 {
            splits.push((Some(OutcomeTag::Miss), prior * (1.0 - hit_p)));
        }
        splits
    }

    fn push_node(&mut self) -> usize {
        self.arena.push(Node::unmaterialized());
        self.arena.len() - 1
    }

    /// PUCT child selection with a random tie-break.
    fn select_child(&self, node_idx: usize, rng: &mut StdRng) -> usize {
        let node = &self.arena[node_idx];
        let sqrt_parent = (node.visits.max(1) as f32).sqrt();

        let mut best_score = f32::NEG_INFINITY;
        let mut best: Vec<usize> = Vec::new();
        for (i, child) in node.children.iter().enumerate() {
            let child_node = &self.arena[child.node];
            let exploration =
                self.cfg.c_puct * child.prior * sqrt_parent / (1.0 + child_node.visits as f32);
            let score = child_node.q() + exploration;
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(i);
            } else if score == best_score {
                best.push(i);
            }
        }
        if best.len() == 1 {
            best[0]
        } else {
            use rand::Rng;
            best[rng.gen_range(0..best.len())]
        }
    }

    /// Bounded stochastic rollout: our action sampled from the heuristic
    /// softmax each ply (the opponent's comes from `step` itself), stopping
    /// at a terminal state, the depth bound, or evaluator saturation.
    fn rollout(&self, mut state: ShadowState, rng: &mut StdRng) -> DecisionResult<f32> {
        for _ in 0..self.cfg.max_rollout_depth {
            if state.is_terminal() || state.ours.hp_sum() <= 1e-6 || state.theirs.hp_sum() <= 1e-6 {
                break;
            }
            let actions = state.legal_actions(self.data);
            if actions.is_empty() {
                break;
            }
            let action = {
                let ctx = ScoreContext::new(&state, SideRef::Ours, self.data);
                let scores: Vec<f32> = actions
                    .iter()
                    .map(|action| match action {
                        Action::Move(id) => score_move(&ctx, id),
                        Action::Switch(handle) => score_switch(&ctx, *handle),
                        Action::SwitchUnseen(_) => -100.0,
                    })
                    .collect();
                actions[sample_softmax(&scores, self.cfg.tau_prior, rng)].clone()
            };
            state = step(&state, &action, self.data, self.cfg, rng)?;
        }
        Ok(evaluate(&state, self.data))
    }

    /// Aggregate root statistics by action, summing visits across outcome
    /// children.
    fn root_stats(&self) -> Vec<ActionStats> {
        let root = &self.arena[0];
        let mut by_action: HashMap<Action, (u32, f32, f32)> = HashMap::new();
        let mut order: Vec<Action> = Vec::new();

        for child in &root.children {
            let node = &self.arena[child.node];
            let entry = by_action.entry(child.action.clone()).or_insert_with(|| {
                order.push(child.action.clone());
                (0, 0.0, 0.0)
            });
            entry.0 += node.visits;
            entry.1 += node.value_sum;
            entry.2 += child.prior;
        }

        order
            .into_iter()
            .map(|action| {
                let (visits, value_sum, prior) = by_action[&action];
                ActionStats {
                    q: if visits > 0 { value_sum / visits as f32 } else { 0.0 },
                    action,
                    visits,
                    prior,
                }
            })
            .collect()
    }
}

fn mix_seed(seed: u64, index: u64) -> u64 {
    // splitmix64 finaliser over the (seed, index) pair
    let mut z = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Run one tree to its budget and return the per-action statistics.
fn search_one_tree(
    root_state: &ShadowState,
    data: &GameData,
    cfg: &SearchConfig,
    tree_seed: u64,
    cancel: Option<&AtomicBool>,
    deadline: Option<Instant>,
) -> (Vec<ActionStats>, u32, u32) {
    let mut tree = Tree::new(root_state.clone(), data, cfg);
    let mut used = 0u32;
    let mut failed = 0u32;

    for sim_index in 0..cfg.num_simulations {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                break;
            }
        }

        let mut rng = StdRng::seed_from_u64(mix_seed(tree_seed, sim_index as u64));
        match tree.simulate_once(&mut rng) {
            Ok(()) => used += 1,
            Err(e) => {
                failed += 1;
                tracing::debug!(error = %e, sim = sim_index, "simulation aborted");
            }
        }
    }

    (tree.root_stats(), used, failed)
}

/// Run the full search, with root parallelism when configured.
///
/// The best action is the one with the most visits; ties break on Q, then
/// prior. With zero completed simulations the highest-prior action wins.
pub fn run_search(
    root_state: &ShadowState,
    data: &GameData,
    cfg: &SearchConfig,
    cancel: Option<&AtomicBool>,
) -> SearchResult {
    let deadline = cfg
        .time_budget_ms
        .map(|ms| Instant::now() + std::time::Duration::from_millis(ms));

    let tree_results: Vec<(Vec<ActionStats>, u32, u32)> = if cfg.root_parallelism <= 1 {
        vec![search_one_tree(root_state, data, cfg, cfg.seed, cancel, deadline)]
    } else {
        (0..cfg.root_parallelism as u64)
            .into_par_iter()
            .map(|tree_index| {
                search_one_tree(
                    root_state,
                    data,
                    cfg,
                    mix_seed(cfg.seed, 0xFEED ^ tree_index),
                    cancel,
                    deadline,
                )
            })
            .collect()
    };

    // Merge per-action statistics across trees.
    let mut merged: HashMap<Action, ActionStats> = HashMap::new();
    let mut order: Vec<Action> = Vec::new();
    let mut simulations_used = 0;
    let mut failed_simulations = 0;
    for (stats, used, failed) in tree_results {
        simulations_used += used;
        failed_simulations += failed;
        for stat in stats {
            match merged.get_mut(&stat.action) {
                Some(existing) => {
                    let total_visits = existing.visits + stat.visits;
                    if total_visits > 0 {
                        existing.q = (existing.q * existing.visits as f32
                            + stat.q * stat.visits as f32)
                            / total_visits as f32;
                    }
                    existing.visits = total_visits;
                    existing.prior = existing.prior.max(stat.prior);
                }
                None => {
                    order.push(stat.action.clone());
                    merged.insert(stat.action.clone(), stat);
                }
            }
        }
    }

    let stats: Vec<ActionStats> = order.into_iter().map(|a| merged[&a].clone()).collect();

    let best = stats
        .iter()
        .max_by(|a, b| {
            a.visits
                .cmp(&b.visits)
                .then(a.q.total_cmp(&b.q))
                .then(a.prior.total_cmp(&b.prior))
        })
        .map(|s| s.action.clone());

    SearchResult {
        best,
        stats,
        simulations_used,
        failed_simulations,
    }
}
