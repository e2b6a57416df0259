//! Battle mechanics: the damage calculator, move and switch resolution, the
//! end-of-turn pipeline and the one-turn transition.

pub mod damage;
pub mod end_of_turn;
pub mod move_effects;
pub mod switch_effects;
pub mod turn;

pub use damage::{expected_damage_fraction, ko_probability, DamageContext};
pub use turn::step;
