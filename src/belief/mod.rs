//! # Opponent Belief Model
//!
//! Posterior distributions over unrevealed opponent role candidates, updated
//! by hard-filter observations and sampled ("determinised") once per MCTS
//! simulation. `TeamBelief` tracks the species distribution for still-unseen
//! opposing slots with without-replacement sampling.

use crate::data::{GameData, RoleCandidate};
use crate::types::{AbilityId, ItemId, MoveId, PokemonType, SpeciesId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// A single sampled "world" for one MCTS simulation: a concrete role and a
/// concrete 4-move subset consistent with everything revealed.
#[derive(Debug, Clone)]
pub struct Determinized {
    pub candidate: RoleCandidate,
    pub moves4: Vec<MoveId>,
}

/// Persistent belief state for one opposing Pokemon.
///
/// `dist` is an ordered list of (candidate, weight) with weights summing to
/// one. Observations are hard filters that renormalise; a filter that would
/// empty the distribution is rejected (the observation is still recorded).
#[derive(Debug, Clone)]
pub struct Belief {
    pub species: SpeciesId,
    pub dist: Vec<(RoleCandidate, f32)>,
    pub revealed_moves: BTreeSet<MoveId>,
    pub revealed_item: Option<ItemId>,
    pub revealed_ability: Option<AbilityId>,
    pub revealed_tera: Option<PokemonType>,
}

impl Belief {
    /// Build a belief for a revealed opposing Pokemon.
    ///
    /// Role candidates come from the role database; if the species is
    /// missing, a single fallback candidate is constructed from the revealed
    /// moves so planning can proceed (data-missing is never fatal).
    pub fn build(
        species: SpeciesId,
        revealed_moves: &BTreeSet<MoveId>,
        revealed_item: Option<ItemId>,
        revealed_ability: Option<AbilityId>,
        revealed_tera: Option<PokemonType>,
        data: &GameData,
    ) -> Self {
        let candidates: Vec<RoleCandidate> = data
            .randbats
            .candidates(&species)
            .map(|c| c.to_vec())
            .unwrap_or_else(|| {
                vec![RoleCandidate::fallback(
                    species.clone(),
                    revealed_moves,
                    &data.movedex,
                )]
            });

        let uniform = 1.0 / candidates.len() as f32;
        let mut belief = Self {
            species,
            dist: candidates.into_iter().map(|c| (c, uniform)).collect(),
            revealed_moves: BTreeSet::new(),
            revealed_item: None,
            revealed_ability: None,
            revealed_tera: None,
        };

        for m in revealed_moves {
            belief.observe_move(m.clone());
        }
        if let Some(item) = revealed_item {
            belief.observe_item(item);
        }
        if let Some(ability) = revealed_ability {
            belief.observe_ability(ability);
        }
        if let Some(tera) = revealed_tera {
            belief.observe_tera(tera);
        }
        belief
    }

    fn normalize(&mut self) {
        let total: f32 = self.dist.iter().map(|(_, w)| w).sum();
        if total <= 0.0 || !total.is_finite() {
            let uniform = 1.0 / self.dist.len().max(1) as f32;
            for (_, w) in self.dist.iter_mut() {
                *w = uniform;
            }
            return;
        }
        for (_, w) in self.dist.iter_mut() {
            *w /= total;
        }
    }

    /// Keep only candidates passing the predicate. If nothing survives, the
    /// filter is rejected and the prior distribution stands.
    fn filter_and_renorm(&mut self, keep: impl Fn(&RoleCandidate) -> bool) {
        let surviving: Vec<(RoleCandidate, f32)> = self
            .dist
            .iter()
            .filter(|(c, _)| keep(c))
            .cloned()
            .collect();
        if !surviving.is_empty() {
            self.dist = surviving;
            self.normalize();
        } else {
            tracing::debug!(species = %self.species, "belief filter rejected (would empty distribution)");
        }
    }

    /// Record a revealed move and filter to candidates containing it.
    pub fn observe_move(&mut self, move_id: MoveId) {
        if move_id.is_empty() {
            return;
        }
        self.revealed_moves.insert(move_id.clone());
        self.filter_and_renorm(|c| c.moves.contains(&move_id));
    }

    /// Record a revealed item; an empty candidate item set is a wildcard.
    pub fn observe_item(&mut self, item: ItemId) {
        if item.is_empty() {
            return;
        }
        self.revealed_item = Some(item.clone());
        self.filter_and_renorm(|c| c.items.is_empty() || c.items.contains(&item));
    }

    /// Record a revealed ability; an empty candidate set is a wildcard.
    pub fn observe_ability(&mut self, ability: AbilityId) {
        if ability.is_empty() {
            return;
        }
        self.revealed_ability = Some(ability.clone());
        self.filter_and_renorm(|c| c.abilities.is_empty() || c.abilities.contains(&ability));
    }

    /// Record a revealed tera type; an empty candidate set is a wildcard.
    pub fn observe_tera(&mut self, tera: PokemonType) {
        self.revealed_tera = Some(tera);
        self.filter_and_renorm(|c| c.tera_types.is_empty() || c.tera_types.contains(&tera));
    }

    /// Sample a role candidate proportional to the belief weights.
    pub fn sample_role(&self, rng: &mut impl Rng) -> &RoleCandidate {
        let total: f32 = self.dist.iter().map(|(_, w)| w).sum();
        let mut r = rng.gen::<f32>() * total;
        for (c, w) in &self.dist {
            r -= w;
            if r <= 0.0 {
                return c;
            }
        }
        &self.dist[self.dist.len() - 1].0
    }

    /// Sample a concrete (candidate, 4 moves) world for one simulation.
    ///
    /// The move set is seeded with the revealed moves (truncated to the first
    /// four in canonical order if more are somehow revealed), then filled
    /// uniformly without replacement from the candidate's remaining pool.
    pub fn determinize(&self, rng: &mut impl Rng) -> Determinized {
        let candidate = self.sample_role(rng).clone();

        let mut revealed: Vec<MoveId> = self.revealed_moves.iter().cloned().collect();
        revealed.sort();
        revealed.truncate(4);

        let revealed_set: BTreeSet<&MoveId> = revealed.iter().collect();
        let pool: Vec<&MoveId> = candidate
            .moves
            .iter()
            .filter(|m| !revealed_set.contains(m))
            .collect();

        let need = 4usize.saturating_sub(revealed.len());
        let mut sampled = revealed;
        for m in pool.choose_multiple(rng, need) {
            sampled.push((*m).clone());
        }

        // Pad in the degenerate case of a role listing fewer than 4 moves.
        while sampled.len() < 4 {
            let filler = sampled
                .last()
                .cloned()
                .unwrap_or_else(|| MoveId::new("struggle"));
            sampled.push(filler);
        }

        sampled.sort();
        sampled.truncate(4);
        Determinized {
            candidate,
            moves4: sampled,
        }
    }

    /// How concentrated the distribution is: 0 = uniform, 1 = single
    /// candidate (normalised entropy complement).
    pub fn certainty(&self) -> f32 {
        let k = self.dist.len();
        if k <= 1 {
            return 1.0;
        }
        let mut entropy = 0.0;
        for (_, w) in &self.dist {
            if *w > 1e-12 {
                entropy -= w * w.ln();
            }
        }
        let max_entropy = (k as f32).ln();
        (1.0 - entropy / max_entropy.max(1e-12)).clamp(0.0, 1.0)
    }

    /// Belief-weighted probability that some predicate holds.
    pub fn probability(&self, pred: impl Fn(&RoleCandidate) -> bool) -> f32 {
        self.dist
            .iter()
            .filter(|(c, _)| pred(c))
            .map(|(_, w)| w)
            .sum::<f32>()
            .clamp(0.0, 1.0)
    }

    /// P(Heavy-Duty Boots) under the belief.
    pub fn boots_prob(&self) -> f32 {
        self.probability(|c| c.has_boots())
    }

    /// P(hazard removal in the move pool) under the belief.
    pub fn removal_prob(&self) -> f32 {
        self.probability(|c| c.has_removal())
    }

    /// Belief-averaged role weight, clamped the way the evaluator expects.
    pub fn role_weight(&self) -> f32 {
        let w: f32 = self.dist.iter().map(|(c, p)| p * c.role_weight()).sum();
        w.clamp(0.80, 1.35)
    }

    /// Total weight, which should always be ~1 after normalisation.
    pub fn total_weight(&self) -> f32 {
        self.dist.iter().map(|(_, w)| w).sum()
    }
}

/// Distribution over species for still-unseen opposing slots.
///
/// `peek` samples without consuming probability mass (used for scoring
/// hypothetical switches); `sample` removes the sampled species' mass and
/// renormalises, so each determinised future respects "each opposing slot is
/// a different Pokemon".
#[derive(Debug, Clone, Default)]
pub struct TeamBelief {
    dist: Vec<(SpeciesId, f32)>,
}

impl TeamBelief {
    /// Uniform distribution over all database species not yet revealed.
    /// Species are kept in sorted order so sampling is reproducible across
    /// processes.
    pub fn build(data: &GameData, revealed: &BTreeSet<SpeciesId>) -> Self {
        let mut unseen: Vec<SpeciesId> = data
            .randbats
            .species_ids()
            .filter(|s| !revealed.contains(*s))
            .cloned()
            .collect();
        unseen.sort();
        if unseen.is_empty() {
            return Self::default();
        }
        let uniform = 1.0 / unseen.len() as f32;
        Self {
            dist: unseen.into_iter().map(|s| (s, uniform)).collect(),
        }
    }

    pub fn has_mass(&self) -> bool {
        !self.dist.is_empty()
    }

    fn weighted_index(&self, rng: &mut impl Rng) -> Option<usize> {
        if self.dist.is_empty() {
            return None;
        }
        let total: f32 = self.dist.iter().map(|(_, w)| w).sum();
        if total <= 0.0 || !total.is_finite() {
            return Some(rng.gen_range(0..self.dist.len()));
        }
        let mut r = rng.gen::<f32>() * total;
        for (i, (_, w)) in self.dist.iter().enumerate() {
            r -= w;
            if r <= 0.0 {
                return Some(i);
            }
        }
        Some(self.dist.len() - 1)
    }

    /// Sample a species without consuming mass.
    pub fn peek(&self, rng: &mut impl Rng) -> Option<&SpeciesId> {
        self.weighted_index(rng).map(|i| &self.dist[i].0)
    }

    /// Sample a species and remove its mass, renormalising the remainder.
    pub fn sample(&mut self, rng: &mut impl Rng) -> Option<SpeciesId> {
        let idx = self.weighted_index(rng)?;
        let (species, _) = self.dist.remove(idx);
        let total: f32 = self.dist.iter().map(|(_, w)| w).sum();
        if total > 0.0 {
            for (_, w) in self.dist.iter_mut() {
                *w /= total;
            }
        }
        Some(species)
    }

    pub fn remaining(&self) -> usize {
        self.dist.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MoveDex, RandbatsDb};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_data() -> std::sync::Arc<GameData> {
        let json = r#"{
            "Alcremie": {
                "roles": {
                    "Role A": {
                        "moves": ["Moonblast", "Calm Mind", "Recover", "Dazzling Gleam", "Psychic"],
                        "items": ["Leftovers"]
                    },
                    "Role B": {
                        "moves": ["Moonblast", "Mystical Fire", "Recover", "Draining Kiss"],
                        "items": ["Heavy-Duty Boots"]
                    },
                    "Role C": {
                        "moves": ["Thunderbolt", "Energy Ball", "Psychic", "Dazzling Gleam"],
                        "items": []
                    }
                }
            },
            "Garchomp": {
                "roles": {
                    "Fast Attacker": {
                        "moves": ["Earthquake", "Dragon Claw", "Stone Edge", "Fire Blast"],
                        "items": ["Choice Scarf"]
                    }
                }
            }
        }"#;
        let dex = MoveDex::builtin();
        GameData::with_randbats(RandbatsDb::from_json(json, &dex).unwrap())
    }

    fn build_belief(data: &GameData) -> Belief {
        Belief::build(
            SpeciesId::new("Alcremie"),
            &BTreeSet::new(),
            None,
            None,
            None,
            data,
        )
    }

    #[test]
    fn test_uniform_prior_sums_to_one() {
        let data = test_data();
        let belief = build_belief(&data);
        assert_eq!(belief.dist.len(), 3);
        assert!((belief.total_weight() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_observe_move_filters_candidates() {
        let data = test_data();
        let mut belief = build_belief(&data);
        belief.observe_move(MoveId::new("Calm Mind"));
        assert_eq!(belief.dist.len(), 1);
        assert_eq!(belief.dist[0].0.role_name, "Role A");
        assert!((belief.total_weight() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_observe_move_idempotent() {
        let data = test_data();
        let mut once = build_belief(&data);
        once.observe_move(MoveId::new("moonblast"));
        let mut twice = build_belief(&data);
        twice.observe_move(MoveId::new("moonblast"));
        twice.observe_move(MoveId::new("moonblast"));
        assert_eq!(once.dist.len(), twice.dist.len());
        for ((c1, w1), (c2, w2)) in once.dist.iter().zip(twice.dist.iter()) {
            assert_eq!(c1.id, c2.id);
            assert!((w1 - w2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_collapse_rejected_keeps_prior() {
        let data = test_data();
        let mut belief = build_belief(&data);
        belief.observe_move(MoveId::new("Calm Mind")); // collapses to Role A
        belief.observe_move(MoveId::new("Mystical Fire")); // would empty: rejected
        assert_eq!(belief.dist.len(), 1);
        assert_eq!(belief.dist[0].0.role_name, "Role A");
        assert!((belief.dist[0].1 - 1.0).abs() < 1e-6);
        // The observation is still recorded.
        assert!(belief.revealed_moves.contains(&MoveId::new("mysticalfire")));
    }

    #[test]
    fn test_item_wildcard_kept() {
        let data = test_data();
        let mut belief = build_belief(&data);
        belief.observe_item(ItemId::new("Leftovers"));
        // Role A has Leftovers; Role C has an empty (wildcard) item set.
        assert_eq!(belief.dist.len(), 2);
    }

    #[test]
    fn test_determinize_includes_revealed_moves() {
        let data = test_data();
        let mut belief = build_belief(&data);
        belief.observe_move(MoveId::new("moonblast"));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let det = belief.determinize(&mut rng);
            assert_eq!(det.moves4.len(), 4);
            assert!(det.moves4.contains(&MoveId::new("moonblast")));
            // Sampled fills must come from the candidate's pool.
            for m in &det.moves4 {
                assert!(
                    det.candidate.moves.contains(m) || belief.revealed_moves.contains(m),
                    "{m} not in candidate pool"
                );
            }
        }
    }

    #[test]
    fn test_certainty_bounds() {
        let data = test_data();
        let mut belief = build_belief(&data);
        assert!(belief.certainty() < 0.05);
        belief.observe_move(MoveId::new("calmmind"));
        assert!((belief.certainty() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_team_belief_without_replacement() {
        let data = test_data();
        let mut tb = TeamBelief::build(&data, &BTreeSet::new());
        assert_eq!(tb.remaining(), 2);
        let mut rng = StdRng::seed_from_u64(1);
        let first = tb.sample(&mut rng).unwrap();
        assert_eq!(tb.remaining(), 1);
        let second = tb.sample(&mut rng).unwrap();
        assert_ne!(first, second);
        assert!(!tb.has_mass());
        assert!(tb.sample(&mut rng).is_none());
    }

    #[test]
    fn test_team_belief_peek_does_not_consume() {
        let data = test_data();
        let tb = TeamBelief::build(&data, &BTreeSet::new());
        let mut rng = StdRng::seed_from_u64(5);
        let _ = tb.peek(&mut rng);
        assert_eq!(tb.remaining(), 2);
    }

    #[test]
    fn test_fallback_candidate_when_species_unknown() {
        let data = test_data();
        let mut revealed = BTreeSet::new();
        revealed.insert(MoveId::new("surf"));
        let belief = Belief::build(
            SpeciesId::new("NotARealMon"),
            &revealed,
            None,
            None,
            None,
            &data,
        );
        assert_eq!(belief.dist.len(), 1);
        assert!(belief.dist[0].0.moves.contains(&MoveId::new("surf")));
    }
}
