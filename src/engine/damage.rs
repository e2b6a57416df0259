//! # Expected-Value Damage Calculator
//!
//! Returns damage as an expected fraction of the defender's max HP, averaged
//! over the 85-100% damage roll range. Accuracy and critical hits are NOT
//! folded in here; the turn engine resolves those stochastically (or via a
//! forced outcome) and the planner applies accuracy weighting where it needs
//! expectations.

use crate::core::field::FieldState;
use crate::core::pokemon::PokemonState;
use crate::core::side::SideConditions;
use crate::data::{MoveCategory, MoveDef};
use crate::types::{PokemonType, SideCondition, Stat, StatStages, Status, Terrain, TypeChart, Weather};

/// Average of the uniform 85%..100% damage roll range.
const AVERAGE_ROLL: f32 = 0.925;

/// Read-only context for one damage calculation.
pub struct DamageContext<'a> {
    pub field: &'a FieldState,
    pub defender_conditions: &'a SideConditions,
    pub type_chart: &'a TypeChart,
}

/// Expected damage as a fraction of the defender's max HP.
///
/// Applies base power, level, stage multipliers (with crits ignoring the
/// attacker's drops and the defender's boosts), STAB with tera override,
/// type effectiveness, burn halving, weather and terrain modifiers, screens
/// (bypassed on a crit), item modifiers and multi-hit scaling. Negative or
/// non-finite results clamp to zero.
pub fn expected_damage_fraction(
    move_def: &MoveDef,
    attacker: &PokemonState,
    defender: &PokemonState,
    ctx: &DamageContext,
    is_crit: bool,
) -> f32 {
    if move_def.category == MoveCategory::Status || move_def.base_power == 0 {
        return 0.0;
    }

    let type_mult = ctx
        .type_chart
        .effectiveness_against(move_def.move_type, &defender.types);
    if type_mult == 0.0 {
        return 0.0;
    }

    let level = attacker.level as f32;
    let base_power = move_def.base_power as f32;

    let (attack_stat, attack_stage, defense_stat, defense_stage) =
        if move_def.category == MoveCategory::Physical {
            (
                attacker.stats.attack as f32,
                attacker.stages.get(Stat::Attack),
                defender.stats.defense as f32,
                defender.stages.get(Stat::Defense),
            )
        } else {
            (
                attacker.stats.special_attack as f32,
                attacker.stages.get(Stat::SpecialAttack),
                defender.stats.special_defense as f32,
                defender.stages.get(Stat::SpecialDefense),
            )
        };

    // Crits ignore the attacker's offensive drops and the defender's
    // defensive boosts.
    let attack_stage = if is_crit { attack_stage.max(0) } else { attack_stage };
    let defense_stage = if is_crit { defense_stage.min(0) } else { defense_stage };

    let attack = attack_stat * StatStages::multiplier(attack_stage);
    let defense = (defense_stat * StatStages::multiplier(defense_stage)).max(1.0);

    let mut damage = ((2.0 * level / 5.0 + 2.0) * base_power * attack / defense) / 50.0 + 2.0;

    // STAB, honouring an adopted tera type.
    let has_stab = match attacker.tera_type {
        Some(tera) => tera == move_def.move_type,
        None => attacker.types.contains(&move_def.move_type),
    };
    if has_stab {
        damage *= 1.5;
    }

    damage *= type_mult;

    // Burn halves physical damage unless the attacker's ability bypasses it.
    if attacker.status == Status::Burn
        && move_def.category == MoveCategory::Physical
        && !attacker
            .ability
            .as_ref()
            .map(|a| a.as_str() == "guts")
            .unwrap_or(false)
    {
        damage *= 0.5;
    }

    damage *= weather_modifier(ctx.field.weather, move_def.move_type);
    damage *= terrain_modifier(ctx.field.terrain, move_def.move_type, attacker, defender);

    // Screens halve damage of the matching category; crits go through them.
    if !is_crit {
        let veiled = ctx.defender_conditions.is_active(SideCondition::AuroraVeil);
        let screened = match move_def.category {
            MoveCategory::Physical => ctx.defender_conditions.is_active(SideCondition::Reflect),
            MoveCategory::Special => ctx.defender_conditions.is_active(SideCondition::LightScreen),
            MoveCategory::Status => false,
        };
        if veiled || screened {
            damage *= 0.5;
        }
    }

    damage *= item_modifier(attacker, move_def.category);
    damage *= move_def.hits.max(1) as f32;
    damage *= AVERAGE_ROLL;

    let max_hp = (defender.stats.hp as f32).max(1.0);
    let fraction = damage / max_hp;
    if !fraction.is_finite() {
        return 0.0;
    }
    fraction.max(0.0)
}

fn weather_modifier(weather: Weather, move_type: PokemonType) -> f32 {
    match (weather, move_type) {
        (Weather::Sun, PokemonType::Fire) => 1.5,
        (Weather::Sun, PokemonType::Water) => 0.5,
        (Weather::Rain, PokemonType::Water) => 1.5,
        (Weather::Rain, PokemonType::Fire) => 0.5,
        _ => 1.0,
    }
}

fn terrain_modifier(
    terrain: Terrain,
    move_type: PokemonType,
    attacker: &PokemonState,
    defender: &PokemonState,
) -> f32 {
    match (terrain, move_type) {
        (Terrain::Electric, PokemonType::Electric) if attacker.is_grounded() => 1.3,
        (Terrain::Grassy, PokemonType::Grass) if attacker.is_grounded() => 1.3,
        (Terrain::Psychic, PokemonType::Psychic) if attacker.is_grounded() => 1.3,
        (Terrain::Misty, PokemonType::Dragon) if defender.is_grounded() => 0.5,
        _ => 1.0,
    }
}

fn item_modifier(attacker: &PokemonState, category: MoveCategory) -> f32 {
    match attacker.item.as_ref().map(|i| i.as_str()) {
        Some("lifeorb") => 1.3,
        Some("choiceband") if category == MoveCategory::Physical => 1.5,
        Some("choicespecs") if category == MoveCategory::Special => 1.5,
        _ => 1.0,
    }
}

/// Probability that a hit KOs, given that the calculator reports the average
/// roll and real rolls span 85%..100% of it.
pub fn ko_probability(avg_damage_fraction: f32, defender_hp: f32) -> f32 {
    if defender_hp <= 0.0 {
        return 1.0;
    }
    if avg_damage_fraction <= 0.0 {
        return 0.0;
    }
    let min_roll = avg_damage_fraction * (0.85 / AVERAGE_ROLL);
    let max_roll = avg_damage_fraction * (1.0 / AVERAGE_ROLL);
    if min_roll >= defender_hp {
        return 1.0;
    }
    if max_roll < defender_hp {
        return 0.0;
    }
    let range = max_roll - min_roll;
    if range <= 0.0 {
        return 0.0;
    }
    ((max_roll - defender_hp) / range).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MoveDex;
    use crate::types::{ItemId, MoveId};

    fn ctx_parts() -> (FieldState, SideConditions, TypeChart) {
        (FieldState::default(), SideConditions::default(), TypeChart::new())
    }

    fn attacker() -> PokemonState {
        let mut mon = PokemonState::new("garchomp");
        mon.types = vec![PokemonType::Dragon, PokemonType::Ground];
        mon.stats.attack = 200;
        mon
    }

    fn defender() -> PokemonState {
        let mut mon = PokemonState::new("heatran");
        mon.types = vec![PokemonType::Fire, PokemonType::Steel];
        mon.stats.hp = 300;
        mon.stats.defense = 150;
        mon
    }

    fn eq_def() -> MoveDef {
        MoveDex::builtin()
            .get(&MoveId::new("earthquake"))
            .unwrap()
            .clone()
    }

    #[test]
    fn test_super_effective_stab_damage() {
        let (field, conditions, chart) = ctx_parts();
        let ctx = DamageContext {
            field: &field,
            defender_conditions: &conditions,
            type_chart: &chart,
        };
        let frac = expected_damage_fraction(&eq_def(), &attacker(), &defender(), &ctx, false);
        // Ground vs Fire/Steel is 4x with STAB; should be a massive hit.
        assert!(frac > 1.0, "expected OHKO-range damage, got {frac}");
    }

    #[test]
    fn test_immunity_is_zero() {
        let (field, conditions, chart) = ctx_parts();
        let ctx = DamageContext {
            field: &field,
            defender_conditions: &conditions,
            type_chart: &chart,
        };
        let mut bird = defender();
        bird.types = vec![PokemonType::Flying];
        let frac = expected_damage_fraction(&eq_def(), &attacker(), &bird, &ctx, false);
        assert_eq!(frac, 0.0);
    }

    #[test]
    fn test_burn_halves_physical() {
        let (field, conditions, chart) = ctx_parts();
        let ctx = DamageContext {
            field: &field,
            defender_conditions: &conditions,
            type_chart: &chart,
        };
        let healthy = expected_damage_fraction(&eq_def(), &attacker(), &defender(), &ctx, false);
        let mut burned = attacker();
        burned.status = Status::Burn;
        let halved = expected_damage_fraction(&eq_def(), &burned, &defender(), &ctx, false);
        assert!((halved - healthy * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_reflect_halves_and_crit_ignores_it() {
        let (field, mut conditions, chart) = ctx_parts();
        conditions.apply(SideCondition::Reflect);
        let ctx = DamageContext {
            field: &field,
            defender_conditions: &conditions,
            type_chart: &chart,
        };
        let screened = expected_damage_fraction(&eq_def(), &attacker(), &defender(), &ctx, false);
        let crit = expected_damage_fraction(&eq_def(), &attacker(), &defender(), &ctx, true);
        assert!(crit > screened * 1.8);
    }

    #[test]
    fn test_choice_band_boost() {
        let (field, conditions, chart) = ctx_parts();
        let ctx = DamageContext {
            field: &field,
            defender_conditions: &conditions,
            type_chart: &chart,
        };
        let plain = expected_damage_fraction(&eq_def(), &attacker(), &defender(), &ctx, false);
        let mut banded = attacker();
        banded.item = Some(ItemId::new("choiceband"));
        let boosted = expected_damage_fraction(&eq_def(), &banded, &defender(), &ctx, false);
        assert!((boosted / plain - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_crit_ignores_defense_boost() {
        let (field, conditions, chart) = ctx_parts();
        let ctx = DamageContext {
            field: &field,
            defender_conditions: &conditions,
            type_chart: &chart,
        };
        let mut tank = defender();
        tank.stages.apply(Stat::Defense, 2);
        let boosted = expected_damage_fraction(&eq_def(), &attacker(), &tank, &ctx, false);
        let crit = expected_damage_fraction(&eq_def(), &attacker(), &tank, &ctx, true);
        assert!((crit / boosted - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_ko_probability_boundaries() {
        assert_eq!(ko_probability(0.5, 0.0), 1.0);
        assert_eq!(ko_probability(0.0, 0.5), 0.0);
        // Min roll already KOs.
        assert_eq!(ko_probability(0.925, 0.80), 1.0);
        // Max roll cannot KO.
        assert_eq!(ko_probability(0.5, 0.60), 0.0);
        // Partial range.
        let p = ko_probability(0.925, 0.95);
        assert!(p > 0.0 && p < 1.0);
    }
}
