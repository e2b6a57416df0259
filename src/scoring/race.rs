//! # Damage Race
//!
//! Priority-aware "who KOs first" estimate for a specific move, shared by
//! the move scorer and the positional evaluator's race term.

use crate::data::MoveCategory;
use crate::engine::damage::{expected_damage_fraction, DamageContext};
use crate::scoring::ScoreContext;
use crate::types::MoveId;

/// Continuous turns-to-KO estimates for one of our moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRace {
    /// Expected turns for us to KO the opponent with this move
    pub tko_opp: f32,
    /// Expected turns until the opponent KOs us
    pub ttd_me: f32,
    /// Accuracy-weighted expected damage fraction of this move
    pub move_exp_dmg: f32,
    pub move_priority: i8,
}

impl DamageRace {
    pub fn neutral() -> Self {
        Self {
            tko_opp: 99.0,
            ttd_me: 99.0,
            move_exp_dmg: 0.0,
            move_priority: 0,
        }
    }

    pub fn winning(&self) -> bool {
        self.tko_opp + 0.6 < self.ttd_me
    }

    pub fn losing(&self) -> bool {
        self.ttd_me + 0.6 < self.tko_opp
    }
}

/// Expected per-turn damage pressure from the opposing active: the best
/// revealed move, widened by belief-expected setup/priority potential, with
/// a conservative default when nothing is revealed.
pub fn opponent_pressure(ctx: &ScoreContext) -> (f32, f32) {
    let opp = ctx.opp();
    let me = ctx.me();
    let damage_ctx = DamageContext {
        field: &ctx.state.field,
        defender_conditions: &ctx.me_side().conditions,
        type_chart: &ctx.data.type_chart,
    };

    let mut best = 0.0f32;
    for move_id in &opp.moves {
        let def = ctx.data.movedex.get_or_fallback(move_id);
        let dmg = expected_damage_fraction(def, opp, me, &damage_ctx, false) * def.hit_probability();
        best = best.max(dmg);
    }
    if best <= 0.0 {
        best = 0.26;
    }

    let belief = ctx.opp_side().belief_for(ctx.opp_side().active);
    let priority_prob = belief.map(|b| b.probability(|c| c.has_priority)).unwrap_or(0.15);
    if let Some(b) = belief {
        // Unrevealed setup potential inflates the projected pressure a bit.
        let setup_p = b.probability(|c| c.has_setup);
        best *= 1.0 + 0.25 * setup_p;
    }

    (best.min(1.5), priority_prob)
}

fn speed_order(ctx: &ScoreContext) -> i8 {
    let (mine, theirs) = (ctx.my_speed(), ctx.opp_speed());
    let (mine, theirs) = if ctx.state.field.trick_room {
        (theirs, mine)
    } else {
        (mine, theirs)
    };
    if mine >= theirs * 1.05 {
        1
    } else if theirs >= mine * 1.05 {
        -1
    } else {
        0
    }
}

/// Tie-break shaping: moving second in a close race costs most of a turn,
/// and opponent priority makes "going first" less reliable.
fn initiative_penalty(tko_opp: f32, ttd_me: f32, effective_order: i8, opp_priority_p: f32) -> f32 {
    let diff = (tko_opp - ttd_me).abs();
    let close01 = (1.0 - diff / 1.2).clamp(0.0, 1.0);

    let mut pen = match effective_order {
        -1 => 0.90 * close01,
        1 => -0.35 * close01,
        _ => 0.0,
    };
    pen += 0.45 * opp_priority_p * close01;
    pen
}

/// Race evaluation for one of our damaging moves.
pub fn evaluate_race_for_move(ctx: &ScoreContext, move_id: &MoveId) -> DamageRace {
    let def = ctx.data.movedex.get_or_fallback(move_id);
    if def.category == MoveCategory::Status {
        let mut race = DamageRace::neutral();
        race.move_priority = def.priority;
        return race;
    }

    let me = ctx.me();
    let opp = ctx.opp();
    let my_hp = me.hp.max(0.01);
    let opp_hp = opp.hp.max(0.01);

    let damage_ctx = DamageContext {
        field: &ctx.state.field,
        defender_conditions: &ctx.opp_side().conditions,
        type_chart: &ctx.data.type_chart,
    };
    let exp_dmg = expected_damage_fraction(def, me, opp, &damage_ctx, false) * def.hit_probability();

    let mut tko_opp = if exp_dmg <= 1e-9 { 99.0 } else { opp_hp / exp_dmg };

    let (opp_pressure, opp_priority_p) = opponent_pressure(ctx);
    let mut ttd_me = if opp_pressure <= 1e-9 {
        99.0
    } else {
        my_hp / opp_pressure
    };

    let mut effective_order = speed_order(ctx);
    if def.priority > 0 {
        effective_order = 1;
    }

    match effective_order {
        -1 => tko_opp += 0.55,
        1 => ttd_me += 0.55,
        _ => {}
    }

    tko_opp += initiative_penalty(tko_opp, ttd_me, effective_order, opp_priority_p);

    // One-hit corrections: a KO that lands second is less reliable, and
    // going first against a mon that one-shots us buys a turn.
    if exp_dmg + 1e-6 >= opp_hp && effective_order == -1 {
        tko_opp += 1.10;
    }
    if opp_pressure + 1e-6 >= my_hp && effective_order == 1 {
        ttd_me += 0.90;
    }

    DamageRace {
        tko_opp,
        ttd_me,
        move_exp_dmg: exp_dmg,
        move_priority: def.priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pokemon::PokemonState;
    use crate::core::side::SideState;
    use crate::core::state::{ShadowState, SideRef};
    use crate::data::GameData;
    use crate::types::{MoveId, PokemonType};

    fn setup() -> (ShadowState, GameData) {
        let mut me = PokemonState::new("garchomp");
        me.types = vec![PokemonType::Dragon, PokemonType::Ground];
        me.stats.attack = 200;
        me.stats.speed = 150;
        me.moves.push(MoveId::new("earthquake"));

        let mut opp = PokemonState::new("heatran");
        opp.types = vec![PokemonType::Fire, PokemonType::Steel];
        opp.stats.speed = 100;
        opp.moves.push(MoveId::new("flamethrower"));

        let state = ShadowState::new(
            SideState::new(vec![me], 0),
            SideState::new(vec![opp], 0),
        );
        (state, GameData::default())
    }

    #[test]
    fn test_winning_race_when_super_effective_and_faster() {
        let (state, data) = setup();
        let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
        let race = evaluate_race_for_move(&ctx, &MoveId::new("earthquake"));
        assert!(race.winning(), "expected winning race: {race:?}");
        assert!(race.tko_opp < 2.5);
    }

    #[test]
    fn test_status_move_is_neutral() {
        let (state, data) = setup();
        let ctx = ScoreContext::new(&state, SideRef::Ours, &data);
        let race = evaluate_race_for_move(&ctx, &MoveId::new("toxic"));
        assert_eq!(race.move_exp_dmg, 0.0);
        assert!(!race.winning() && !race.losing());
    }
}
