use serde::{Deserialize, Serialize};

/// Conditions attached to one side of the field.
///
/// Hazards persist until cleared; the timed set (screens, tailwind) counts
/// down each end-of-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideCondition {
    StealthRock,
    Spikes,
    ToxicSpikes,
    StickyWeb,
    Reflect,
    LightScreen,
    AuroraVeil,
    Tailwind,
}

impl SideCondition {
    /// Hazards damage or debuff on entry and never expire on their own.
    pub fn is_hazard(&self) -> bool {
        matches!(
            self,
            SideCondition::StealthRock
                | SideCondition::Spikes
                | SideCondition::ToxicSpikes
                | SideCondition::StickyWeb
        )
    }

    /// Timed conditions decrement each end-of-turn and drop at zero.
    pub fn is_timed(&self) -> bool {
        !self.is_hazard()
    }

    pub fn from_normalized_str(s: &str) -> Option<Self> {
        match s {
            "stealthrock" => Some(SideCondition::StealthRock),
            "spikes" => Some(SideCondition::Spikes),
            "toxicspikes" => Some(SideCondition::ToxicSpikes),
            "stickyweb" => Some(SideCondition::StickyWeb),
            "reflect" => Some(SideCondition::Reflect),
            "lightscreen" => Some(SideCondition::LightScreen),
            "auroraveil" => Some(SideCondition::AuroraVeil),
            "tailwind" => Some(SideCondition::Tailwind),
            _ => None,
        }
    }

    pub fn all() -> [Self; 8] {
        [
            SideCondition::StealthRock,
            SideCondition::Spikes,
            SideCondition::ToxicSpikes,
            SideCondition::StickyWeb,
            SideCondition::Reflect,
            SideCondition::LightScreen,
            SideCondition::AuroraVeil,
            SideCondition::Tailwind,
        ]
    }
}
