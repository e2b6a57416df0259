//! Statistical properties of the stochastic model, measured over many
//! seeded trials: protect decay, base crit rate, and bitwise decision
//! reproducibility.

mod common;

use common::{data, mon, state};
use oranguru::config::SearchConfig;
use oranguru::core::{SideRef, TurnEvent};
use oranguru::engine::move_effects::apply_move;
use oranguru::types::{MoveId, PokemonType};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn duel() -> oranguru::core::ShadowState {
    state(
        vec![mon("a", &[PokemonType::Normal], &["protect", "tackle"])],
        vec![mon("b", &[PokemonType::Normal], &["tackle"])],
    )
}

/// Protect success with n prior consecutive uses is 1/3^n.
#[test]
fn protect_success_decays_geometrically() {
    let data = data();
    let cfg = SearchConfig::default();
    let protect = MoveId::new("protect");

    for (streak, expected) in [(0u8, 1.0f32), (1, 1.0 / 3.0), (2, 1.0 / 9.0)] {
        let trials = 4000u64;
        let mut successes = 0u32;
        for seed in 0..trials {
            let mut s = duel();
            s.ours.protect_count = streak;
            let mut rng = StdRng::seed_from_u64(7_000_000 + streak as u64 * 100_000 + seed);
            apply_move(&mut s, SideRef::Ours, &protect, &data, &cfg, &mut rng);
            if s.events.iter().any(|e| matches!(e, TurnEvent::ProtectSuccess { .. })) {
                successes += 1;
            }
        }
        let rate = successes as f32 / trials as f32;
        assert!(
            (rate - expected).abs() < 0.05,
            "streak {streak}: expected ~{expected}, measured {rate}"
        );
    }
}

/// The base critical-hit rate of an ordinary move is 1/24.
#[test]
fn base_crit_rate_is_one_in_twentyfour() {
    let data = data();
    let cfg = SearchConfig::default();
    let tackle = MoveId::new("tackle");

    let trials = 6000u64;
    let mut crits = 0u32;
    for seed in 0..trials {
        let mut s = duel();
        let mut rng = StdRng::seed_from_u64(31_000_000 + seed);
        apply_move(&mut s, SideRef::Ours, &tackle, &data, &cfg, &mut rng);
        if s.events.iter().any(|e| matches!(e, TurnEvent::Crit { .. })) {
            crits += 1;
        }
    }
    let rate = crits as f32 / trials as f32;
    let expected = 1.0 / 24.0;
    assert!(
        (rate - expected).abs() < 0.012,
        "expected ~{expected}, measured {rate}"
    );
}
