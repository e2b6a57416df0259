//! # Field Conditions
//!
//! Weather, terrain and Trick Room with age counters. Counters start at zero
//! when set, increment at each end-of-turn, and the condition expires when
//! its counter reaches `FIELD_EXPIRY`.

use crate::constants::FIELD_EXPIRY;
use crate::types::{Terrain, Weather};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub weather: Weather,
    pub weather_counter: u8,
    pub terrain: Terrain,
    pub terrain_counter: u8,
    pub trick_room: bool,
    pub trick_room_counter: u8,
}

impl FieldState {
    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
        self.weather_counter = 0;
    }

    pub fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
        self.terrain_counter = 0;
    }

    /// Trick Room toggles: using it while up takes it down.
    pub fn toggle_trick_room(&mut self) {
        if self.trick_room {
            self.trick_room = false;
            self.trick_room_counter = 0;
        } else {
            self.trick_room = true;
            self.trick_room_counter = 0;
        }
    }

    /// Advance all field counters by one end-of-turn, dropping expired
    /// conditions.
    pub fn advance_counters(&mut self) {
        if self.weather != Weather::None {
            self.weather_counter += 1;
            if self.weather_counter >= FIELD_EXPIRY {
                self.weather = Weather::None;
                self.weather_counter = 0;
            }
        }
        if self.terrain != Terrain::None {
            self.terrain_counter += 1;
            if self.terrain_counter >= FIELD_EXPIRY {
                self.terrain = Terrain::None;
                self.terrain_counter = 0;
            }
        }
        if self.trick_room {
            self.trick_room_counter += 1;
            if self.trick_room_counter >= FIELD_EXPIRY {
                self.trick_room = false;
                self.trick_room_counter = 0;
            }
        }
    }

    /// Remaining turns before a field counter expires.
    pub fn turns_remaining(counter: u8) -> u8 {
        FIELD_EXPIRY.saturating_sub(counter)
    }
}
