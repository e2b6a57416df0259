//! Randomised invariant tests: drive long seeded playouts through `step`
//! and assert the structural invariants hold at every reachable state.

mod common;

use common::{data_with_roles, mon, species, state};
use oranguru::belief::TeamBelief;
use oranguru::config::SearchConfig;
use oranguru::core::ShadowState;
use oranguru::engine::step;
use oranguru::eval::evaluate;
use oranguru::types::{MoveId, PokemonType, Stat};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

fn battle_state() -> ShadowState {
    let mut lead = mon(
        "garchomp",
        &[PokemonType::Dragon, PokemonType::Ground],
        &["earthquake", "stoneedge", "swordsdance", "uturn"],
    );
    lead.stats.attack = 180;
    lead.stats.speed = 150;

    let mut pex = mon(
        "toxapex",
        &[PokemonType::Poison, PokemonType::Water],
        &["scald", "recover", "toxic", "toxicspikes"],
    );
    pex.stats.defense = 220;

    let bird = mon(
        "corviknight",
        &[PokemonType::Flying, PokemonType::Steel],
        &["bravebird", "roost", "defog", "ironhead"],
    );

    let mut tran = mon(
        "heatran",
        &[PokemonType::Fire, PokemonType::Steel],
        &["lavaplume", "stealthrock", "earthpower", "protect"],
    );
    tran.stats.special_attack = 180;

    let mut opp_lead = mon(
        "garchomp",
        &[PokemonType::Dragon, PokemonType::Ground],
        &["earthquake"],
    );
    opp_lead.stats.speed = 140;

    let mut s = state(vec![lead, pex, bird], vec![opp_lead, tran]);

    // Give the opponent side an unseen-slot distribution so materialisation
    // paths get exercised.
    let data = data_with_roles();
    let mut revealed = BTreeSet::new();
    revealed.insert(species("garchomp"));
    revealed.insert(species("heatran"));
    s.theirs.team_belief = Some(TeamBelief::build(&data, &revealed));
    s
}

/// I1 + I2 + I3 + I9 + R3 over many random seeded playouts.
#[test]
fn invariants_hold_across_random_playouts() {
    let data = data_with_roles();
    let cfg = SearchConfig::default();

    for seed in 0..40u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s = battle_state();

        for _ply in 0..25 {
            if s.is_terminal() {
                break;
            }
            let actions = s.legal_actions(&data);
            assert!(!actions.is_empty(), "non-terminal state must offer actions");
            let action = actions.choose(&mut rng).unwrap().clone();
            s = step(&s, &action, &data, &cfg, &mut rng)
                .unwrap_or_else(|e| panic!("seed {seed}: legal action rejected: {e}"));

            // I1: HP fractions stay in [0, 1].
            for mon in s.ours.team.iter().chain(s.theirs.team.iter()) {
                assert!(
                    (0.0..=1.0).contains(&mon.hp),
                    "seed {seed}: hp out of range: {}",
                    mon.hp
                );
                // I2: stat stages stay in [-6, +6].
                for stat in Stat::all() {
                    let stage = mon.stages.get(stat);
                    assert!((-6..=6).contains(&stage), "seed {seed}: stage {stage}");
                }
            }

            // I3: the active is alive unless the side is out of Pokemon.
            if !s.ours.all_fainted() {
                assert!(
                    s.ours.active_mon().is_alive(),
                    "seed {seed}: dead active without terminal flag"
                );
            }

            // I9: the toxic counter only exists while a toxic'd active is up
            // (a KO with no replacement left may strand it until terminal).
            if s.theirs.toxic_counter > 0 {
                let active = s.theirs.active_mon();
                assert!(
                    active.status == oranguru::types::Status::Toxic || active.is_fainted(),
                    "seed {seed}: stale toxic counter"
                );
            }

            // R3: the evaluator stays clamped everywhere reachable.
            let value = evaluate(&s, &data);
            assert!(
                (-1.0..=1.0).contains(&value),
                "seed {seed}: evaluator escaped clamp: {value}"
            );
        }
    }
}

/// I4 + I5: belief distributions stay normalised and consistent with the
/// revealed moves through arbitrary observation sequences.
#[test]
fn belief_distributions_stay_normalised() {
    let data = data_with_roles();
    let mut belief = oranguru::belief::Belief::build(
        species("garchomp"),
        &BTreeSet::new(),
        None,
        None,
        None,
        &data,
    );

    let observations = [
        "earthquake",
        "dragonclaw",
        "swordsdance",
        "stoneedge", // would empty the distribution: rejected
    ];
    for obs in observations {
        belief.observe_move(MoveId::new(obs));
        assert!(
            (belief.total_weight() - 1.0).abs() < 1e-5,
            "distribution must stay normalised after observing {obs}"
        );
        assert!(!belief.dist.is_empty());
    }

    // I5: surviving candidates contain every revealed move that was not part
    // of a rejected filter.
    for (candidate, _) in &belief.dist {
        assert!(candidate.moves.contains(&MoveId::new("earthquake")));
        assert!(candidate.moves.contains(&MoveId::new("swordsdance")));
    }
}

/// Unseen opposing slots prop up the opponent's evaluation until the roster
/// is fully revealed.
#[test]
fn unseen_slots_contribute_opponent_value() {
    let data = data_with_roles();
    let with_unseen = battle_state();

    let mut fully_known = battle_state();
    fully_known.theirs.team_belief = None;

    let v_unseen = evaluate(&with_unseen, &data);
    let v_known = evaluate(&fully_known, &data);
    assert!(
        v_unseen < v_known,
        "unseen reinforcements should worry us: {v_unseen} vs {v_known}"
    );
}
