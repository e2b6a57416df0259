//! # Move Dex
//!
//! Static move definitions consumed read-only by the turn engine, damage
//! calculator and scoring heuristics. A baseline table covering the moves
//! that matter for random-battle planning is compiled in; a JSON file with
//! the same schema can be merged over it at startup.
//!
//! Lookups never fail hard: a missing move resolves to a conservative
//! fallback definition so a single unknown id cannot abort a simulation.

use crate::types::{
    DataError, DataResult, MoveId, PokemonType, SideCondition, Stat, Status, Terrain, Weather,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Damage category of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl Default for MoveCategory {
    fn default() -> Self {
        MoveCategory::Physical
    }
}

/// Which side a secondary effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    User,
    Target,
}

/// One secondary effect entry with its proc chance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secondary {
    /// Proc probability in [0, 1]
    pub chance: f32,
    pub target: EffectTarget,
    pub effect: SecondaryEffect,
}

/// The effect payload of a secondary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SecondaryEffect {
    StatusInfliction(Status),
    BoostChange(Vec<(Stat, i8)>),
    Confusion,
    Flinch,
}

/// Move flags relevant to planning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    #[serde(default)]
    pub contact: bool,
    #[serde(default)]
    pub sound: bool,
    #[serde(default)]
    pub punch: bool,
}

/// Static definition of a move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDef {
    pub id: MoveId,
    pub category: MoveCategory,
    pub move_type: PokemonType,
    pub base_power: u16,
    /// None means the move never misses
    pub accuracy: Option<f32>,
    pub priority: i8,
    /// Crit-ratio class: 0 = 1/24, 1 = 1/8, 2 = 1/2, 3+ = always
    #[serde(default)]
    pub crit_class: u8,
    /// Guaranteed self stat changes (Swords Dance +2, Close Combat -1/-1)
    #[serde(default)]
    pub self_boosts: Vec<(Stat, i8)>,
    /// Guaranteed target stat changes (Charm, Screech)
    #[serde(default)]
    pub target_boosts: Vec<(Stat, i8)>,
    /// Guaranteed non-volatile status on the target (Will-O-Wisp, Spore)
    #[serde(default)]
    pub status: Option<Status>,
    /// Guaranteed confusion on the target (Confuse Ray)
    #[serde(default)]
    pub confuses: bool,
    #[serde(default)]
    pub secondaries: Vec<Secondary>,
    /// Fraction of damage dealt taken as recoil
    #[serde(default)]
    pub recoil: f32,
    /// Fraction of damage dealt restored to the user
    #[serde(default)]
    pub drain: f32,
    /// Fraction of max HP restored to the user (Recover = 0.5)
    #[serde(default)]
    pub heal: f32,
    #[serde(default)]
    pub sets_weather: Option<Weather>,
    #[serde(default)]
    pub sets_terrain: Option<Terrain>,
    #[serde(default)]
    pub sets_trick_room: bool,
    #[serde(default)]
    pub sets_side_condition: Option<SideCondition>,
    /// Usable while asleep (Sleep Talk, Snore)
    #[serde(default)]
    pub sleep_usable: bool,
    /// 50% self-damage on a miss (High Jump Kick)
    #[serde(default)]
    pub crash_on_miss: bool,
    /// Expected hit count (1 for single-hit, 3 for 2-5-hit moves)
    #[serde(default = "default_hits")]
    pub hits: u8,
    #[serde(default)]
    pub flags: MoveFlags,
}

fn default_hits() -> u8 {
    1
}

impl MoveDef {
    pub fn new(id: impl Into<MoveId>) -> Self {
        Self {
            id: id.into(),
            category: MoveCategory::Status,
            move_type: PokemonType::Normal,
            base_power: 0,
            accuracy: None,
            priority: 0,
            crit_class: 0,
            self_boosts: Vec::new(),
            target_boosts: Vec::new(),
            status: None,
            confuses: false,
            secondaries: Vec::new(),
            recoil: 0.0,
            drain: 0.0,
            heal: 0.0,
            sets_weather: None,
            sets_terrain: None,
            sets_trick_room: false,
            sets_side_condition: None,
            sleep_usable: false,
            crash_on_miss: false,
            hits: 1,
            flags: MoveFlags::default(),
        }
    }

    pub fn is_damaging(&self) -> bool {
        self.base_power > 0
    }

    /// Accuracy as a hit probability (never-miss moves resolve to 1.0).
    pub fn hit_probability(&self) -> f32 {
        self.accuracy.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Crit probability implied by the crit-ratio class.
    pub fn crit_chance(&self) -> f32 {
        match self.crit_class {
            0 => 1.0 / 24.0,
            1 => 1.0 / 8.0,
            2 => 0.5,
            _ => 1.0,
        }
    }

    /// Chance-weighted flinch probability (0 when no flinch secondary).
    pub fn flinch_chance(&self) -> f32 {
        self.secondaries
            .iter()
            .filter(|s| matches!(s.effect, SecondaryEffect::Flinch))
            .map(|s| s.chance)
            .fold(0.0, f32::max)
    }

    /// The move's status infliction as (status, probability), if any.
    pub fn status_infliction(&self) -> Option<(Status, f32)> {
        if let Some(st) = self.status {
            return Some((st, 1.0));
        }
        self.secondaries.iter().find_map(|s| match s.effect {
            SecondaryEffect::StatusInfliction(st) if s.chance > 0.0 => Some((st, s.chance)),
            _ => None,
        })
    }

    /// Guaranteed positive self-boost total (setup detection).
    pub fn setup_stages(&self) -> i8 {
        self.self_boosts.iter().map(|(_, d)| (*d).max(0)).sum()
    }

    // Builder-style constructors for the compiled-in table.

    fn physical(id: &str, move_type: PokemonType, power: u16, accuracy: f32) -> Self {
        let mut m = Self::new(id);
        m.category = MoveCategory::Physical;
        m.move_type = move_type;
        m.base_power = power;
        m.accuracy = if accuracy >= 1.0 { None } else { Some(accuracy) };
        m
    }

    fn special(id: &str, move_type: PokemonType, power: u16, accuracy: f32) -> Self {
        let mut m = Self::physical(id, move_type, power, accuracy);
        m.category = MoveCategory::Special;
        m
    }

    fn status_move(id: &str, move_type: PokemonType) -> Self {
        let mut m = Self::new(id);
        m.move_type = move_type;
        m
    }

    fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    fn with_contact(mut self) -> Self {
        self.flags.contact = true;
        self
    }

    fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    fn with_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    fn with_secondary(mut self, chance: f32, target: EffectTarget, effect: SecondaryEffect) -> Self {
        self.secondaries.push(Secondary { chance, target, effect });
        self
    }

    fn with_self_boosts(mut self, boosts: &[(Stat, i8)]) -> Self {
        self.self_boosts = boosts.to_vec();
        self
    }

    fn with_target_boosts(mut self, boosts: &[(Stat, i8)]) -> Self {
        self.target_boosts = boosts.to_vec();
        self
    }

    fn with_recoil(mut self, recoil: f32) -> Self {
        self.recoil = recoil;
        self
    }

    fn with_drain(mut self, drain: f32) -> Self {
        self.drain = drain;
        self
    }

    fn with_heal(mut self, heal: f32) -> Self {
        self.heal = heal;
        self
    }

    fn with_crit_class(mut self, class: u8) -> Self {
        self.crit_class = class;
        self
    }

    fn with_side_condition(mut self, condition: SideCondition) -> Self {
        self.sets_side_condition = Some(condition);
        self
    }

    fn with_hits(mut self, hits: u8) -> Self {
        self.hits = hits;
        self
    }
}

/// Read-only move lookup table
#[derive(Debug, Clone, Default)]
pub struct MoveDex {
    moves: HashMap<MoveId, MoveDef>,
}

lazy_static! {
    /// Conservative definition used when a move id is unknown: a neutral
    /// 60 BP physical hit that never sets anything.
    static ref FALLBACK_MOVE: MoveDef = {
        let mut m = MoveDef::new("unknownmove");
        m.category = MoveCategory::Physical;
        m.move_type = PokemonType::Typeless;
        m.base_power = 60;
        m.accuracy = Some(1.0);
        m
    };
}

impl MoveDex {
    /// Build the compiled-in baseline dex.
    pub fn builtin() -> Self {
        let mut dex = Self::default();
        for def in builtin_moves() {
            dex.insert(def);
        }
        dex
    }

    /// Load additional or overriding definitions from a JSON file
    /// (a map of move id to `MoveDef`).
    pub fn merge_json_file(&mut self, path: impl AsRef<Path>) -> DataResult<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DataError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let parsed: HashMap<String, MoveDef> =
            serde_json::from_str(&content).map_err(|e| DataError::JsonParse {
                file: path.display().to_string(),
                source: e,
            })?;
        for (_, def) in parsed {
            self.insert(def);
        }
        Ok(())
    }

    pub fn insert(&mut self, def: MoveDef) {
        self.moves.insert(def.id.clone(), def);
    }

    pub fn get(&self, id: &MoveId) -> Option<&MoveDef> {
        self.moves.get(id)
    }

    /// Lookup with the conservative fallback for unknown ids.
    pub fn get_or_fallback(&self, id: &MoveId) -> &MoveDef {
        self.moves.get(id).unwrap_or(&FALLBACK_MOVE)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// The compiled-in baseline table.
fn builtin_moves() -> Vec<MoveDef> {
    use EffectTarget::*;
    use PokemonType::*;
    use SecondaryEffect::*;

    vec![
        // Normal
        MoveDef::physical("tackle", Normal, 40, 1.0).with_contact(),
        MoveDef::physical("bodyslam", Normal, 85, 1.0)
            .with_contact()
            .with_secondary(0.30, Target, StatusInfliction(Status::Paralysis)),
        MoveDef::physical("doubleedge", Normal, 120, 1.0)
            .with_contact()
            .with_recoil(1.0 / 3.0),
        MoveDef::physical("extremespeed", Normal, 80, 1.0)
            .with_contact()
            .with_priority(2),
        MoveDef::physical("quickattack", Normal, 40, 1.0)
            .with_contact()
            .with_priority(1),
        MoveDef::physical("facade", Normal, 70, 1.0).with_contact(),
        MoveDef::special("hypervoice", Normal, 90, 1.0),
        MoveDef::physical("struggle", Typeless, 50, 1.0)
            .with_contact()
            .with_recoil(0.25),
        // Fire
        MoveDef::special("flamethrower", Fire, 90, 1.0)
            .with_secondary(0.10, Target, StatusInfliction(Status::Burn)),
        MoveDef::special("fireblast", Fire, 110, 0.85)
            .with_secondary(0.10, Target, StatusInfliction(Status::Burn)),
        MoveDef::special("overheat", Fire, 130, 0.90)
            .with_self_boosts(&[(Stat::SpecialAttack, -2)]),
        MoveDef::physical("flareblitz", Fire, 120, 1.0)
            .with_contact()
            .with_recoil(1.0 / 3.0)
            .with_secondary(0.10, Target, StatusInfliction(Status::Burn)),
        MoveDef::physical("firepunch", Fire, 75, 1.0)
            .with_contact()
            .with_secondary(0.10, Target, StatusInfliction(Status::Burn)),
        MoveDef::special("lavaplume", Fire, 80, 1.0)
            .with_secondary(0.30, Target, StatusInfliction(Status::Burn)),
        MoveDef::status_move("willowisp", Fire)
            .with_accuracy(0.85)
            .with_status(Status::Burn),
        MoveDef::status_move("sunnyday", Fire).set_weather(Weather::Sun),
        // Water
        MoveDef::special("surf", Water, 90, 1.0),
        MoveDef::special("hydropump", Water, 110, 0.80),
        MoveDef::special("scald", Water, 80, 1.0)
            .with_secondary(0.30, Target, StatusInfliction(Status::Burn)),
        MoveDef::physical("liquidation", Water, 85, 1.0)
            .with_contact()
            .with_secondary(0.20, Target, BoostChange(vec![(Stat::Defense, -1)])),
        MoveDef::physical("aquajet", Water, 40, 1.0)
            .with_contact()
            .with_priority(1),
        MoveDef::physical("flipturn", Water, 60, 1.0).with_contact(),
        MoveDef::physical("waterfall", Water, 80, 1.0)
            .with_contact()
            .with_secondary(0.20, Target, Flinch),
        MoveDef::status_move("raindance", Water).set_weather(Weather::Rain),
        MoveDef::status_move("chillyreception", Ice).set_weather(Weather::Snow),
        // Electric
        MoveDef::special("thunderbolt", Electric, 90, 1.0)
            .with_secondary(0.10, Target, StatusInfliction(Status::Paralysis)),
        MoveDef::special("thunder", Electric, 110, 0.70)
            .with_secondary(0.30, Target, StatusInfliction(Status::Paralysis)),
        MoveDef::special("voltswitch", Electric, 70, 1.0),
        MoveDef::physical("wildcharge", Electric, 90, 1.0)
            .with_contact()
            .with_recoil(0.25)
            .with_secondary(0.10, Target, StatusInfliction(Status::Paralysis)),
        MoveDef::status_move("thunderwave", Electric)
            .with_accuracy(0.90)
            .with_status(Status::Paralysis),
        MoveDef::status_move("electricterrain", Electric).set_terrain(Terrain::Electric),
        // Grass
        MoveDef::special("gigadrain", Grass, 75, 1.0).with_drain(0.5),
        MoveDef::special("energyball", Grass, 90, 1.0)
            .with_secondary(0.10, Target, BoostChange(vec![(Stat::SpecialDefense, -1)])),
        MoveDef::special("leafstorm", Grass, 130, 0.90)
            .with_self_boosts(&[(Stat::SpecialAttack, -2)]),
        MoveDef::physical("powerwhip", Grass, 120, 0.85).with_contact(),
        MoveDef::physical("woodhammer", Grass, 120, 1.0)
            .with_contact()
            .with_recoil(1.0 / 3.0),
        MoveDef::status_move("sleeppowder", Grass)
            .with_accuracy(0.75)
            .with_status(Status::Sleep),
        MoveDef::status_move("spore", Grass).with_status(Status::Sleep),
        MoveDef::status_move("grassyterrain", Grass).set_terrain(Terrain::Grassy),
        // Ice
        MoveDef::special("icebeam", Ice, 90, 1.0)
            .with_secondary(0.10, Target, StatusInfliction(Status::Freeze)),
        MoveDef::special("blizzard", Ice, 110, 0.70)
            .with_secondary(0.10, Target, StatusInfliction(Status::Freeze)),
        MoveDef::special("freezedry", Ice, 70, 1.0)
            .with_secondary(0.10, Target, StatusInfliction(Status::Freeze)),
        MoveDef::physical("iceshard", Ice, 40, 1.0).with_priority(1),
        MoveDef::physical("icepunch", Ice, 75, 1.0)
            .with_contact()
            .with_secondary(0.10, Target, StatusInfliction(Status::Freeze)),
        MoveDef::physical("iciclespear", Ice, 25, 1.0).with_hits(3),
        MoveDef::physical("tripleaxel", Ice, 40, 0.90).with_contact().with_hits(3),
        MoveDef::status_move("auroraveil", Ice).with_side_condition(SideCondition::AuroraVeil),
        MoveDef::status_move("snowscape", Ice).set_weather(Weather::Snow),
        // Fighting
        MoveDef::physical("closecombat", Fighting, 120, 1.0)
            .with_contact()
            .with_self_boosts(&[(Stat::Defense, -1), (Stat::SpecialDefense, -1)]),
        MoveDef::physical("drainpunch", Fighting, 75, 1.0)
            .with_contact()
            .with_drain(0.5),
        MoveDef::physical("machpunch", Fighting, 40, 1.0)
            .with_contact()
            .with_priority(1),
        MoveDef::special("focusblast", Fighting, 120, 0.70)
            .with_secondary(0.10, Target, BoostChange(vec![(Stat::SpecialDefense, -1)])),
        MoveDef::physical("highjumpkick", Fighting, 130, 0.90).with_contact().crash(),
        MoveDef::special("aurasphere", Fighting, 80, 1.0),
        MoveDef::status_move("bulkup", Fighting)
            .with_self_boosts(&[(Stat::Attack, 1), (Stat::Defense, 1)]),
        // Poison
        MoveDef::special("sludgebomb", Poison, 90, 1.0)
            .with_secondary(0.30, Target, StatusInfliction(Status::Poison)),
        MoveDef::physical("gunkshot", Poison, 120, 0.80)
            .with_secondary(0.30, Target, StatusInfliction(Status::Poison)),
        MoveDef::physical("poisonjab", Poison, 80, 1.0)
            .with_contact()
            .with_secondary(0.30, Target, StatusInfliction(Status::Poison)),
        MoveDef::status_move("toxic", Poison)
            .with_accuracy(0.90)
            .with_status(Status::Toxic),
        MoveDef::status_move("toxicspikes", Poison).with_side_condition(SideCondition::ToxicSpikes),
        // Ground
        MoveDef::physical("earthquake", Ground, 100, 1.0),
        MoveDef::special("earthpower", Ground, 90, 1.0)
            .with_secondary(0.10, Target, BoostChange(vec![(Stat::SpecialDefense, -1)])),
        MoveDef::physical("stompingtantrum", Ground, 75, 1.0).with_contact(),
        // Flying
        MoveDef::physical("bravebird", Flying, 120, 1.0)
            .with_contact()
            .with_recoil(1.0 / 3.0),
        MoveDef::special("hurricane", Flying, 110, 0.70)
            .with_secondary(0.30, Target, Confusion),
        MoveDef::special("airslash", Flying, 75, 0.95)
            .with_secondary(0.30, Target, Flinch),
        MoveDef::physical("uturn", Bug, 70, 1.0).with_contact(),
        MoveDef::status_move("roost", Flying).with_heal(0.5),
        MoveDef::status_move("tailwind", Flying).with_side_condition(SideCondition::Tailwind),
        MoveDef::status_move("defog", Flying),
        // Psychic
        MoveDef::special("psychic", Psychic, 90, 1.0)
            .with_secondary(0.10, Target, BoostChange(vec![(Stat::SpecialDefense, -1)])),
        MoveDef::special("psyshock", Psychic, 80, 1.0),
        MoveDef::physical("zenheadbutt", Psychic, 80, 0.90)
            .with_contact()
            .with_secondary(0.20, Target, Flinch),
        MoveDef::status_move("calmmind", Psychic)
            .with_self_boosts(&[(Stat::SpecialAttack, 1), (Stat::SpecialDefense, 1)]),
        MoveDef::status_move("agility", Psychic).with_self_boosts(&[(Stat::Speed, 2)]),
        MoveDef::status_move("trickroom", Psychic).set_trick_room(),
        MoveDef::status_move("psychicterrain", Psychic).set_terrain(Terrain::Psychic),
        MoveDef::status_move("hypnosis", Psychic)
            .with_accuracy(0.60)
            .with_status(Status::Sleep),
        MoveDef::status_move("reflect", Psychic).with_side_condition(SideCondition::Reflect),
        MoveDef::status_move("lightscreen", Psychic).with_side_condition(SideCondition::LightScreen),
        MoveDef::status_move("teleport", Psychic).with_priority(-6),
        // Bug
        MoveDef::special("bugbuzz", Bug, 90, 1.0)
            .with_secondary(0.10, Target, BoostChange(vec![(Stat::SpecialDefense, -1)])),
        MoveDef::physical("firstimpression", Bug, 90, 1.0)
            .with_contact()
            .with_priority(2),
        MoveDef::physical("xscissor", Bug, 80, 1.0).with_contact(),
        MoveDef::status_move("stickyweb", Bug).with_side_condition(SideCondition::StickyWeb),
        // Rock
        MoveDef::physical("stoneedge", Rock, 100, 0.80).with_crit_class(1),
        MoveDef::physical("rockslide", Rock, 75, 0.90)
            .with_secondary(0.30, Target, Flinch),
        MoveDef::physical("rockblast", Rock, 25, 0.90).with_hits(3),
        MoveDef::status_move("stealthrock", Rock).with_side_condition(SideCondition::StealthRock),
        // Ghost
        MoveDef::special("shadowball", Ghost, 80, 1.0)
            .with_secondary(0.20, Target, BoostChange(vec![(Stat::SpecialDefense, -1)])),
        MoveDef::physical("shadowsneak", Ghost, 40, 1.0)
            .with_contact()
            .with_priority(1),
        MoveDef::special("hex", Ghost, 65, 1.0),
        MoveDef::physical("poltergeist", Ghost, 110, 0.90),
        // Dragon
        MoveDef::special("dracometeor", Dragon, 130, 0.90)
            .with_self_boosts(&[(Stat::SpecialAttack, -2)]),
        MoveDef::special("dragonpulse", Dragon, 85, 1.0),
        MoveDef::physical("dragonclaw", Dragon, 80, 1.0).with_contact(),
        MoveDef::physical("outrage", Dragon, 120, 1.0).with_contact(),
        MoveDef::physical("dragondarts", Dragon, 50, 1.0).with_hits(2),
        MoveDef::status_move("dragondance", Dragon)
            .with_self_boosts(&[(Stat::Attack, 1), (Stat::Speed, 1)]),
        // Dark
        MoveDef::special("darkpulse", Dark, 80, 1.0)
            .with_secondary(0.20, Target, Flinch),
        MoveDef::physical("knockoff", Dark, 65, 1.0).with_contact(),
        MoveDef::physical("suckerpunch", Dark, 70, 1.0)
            .with_contact()
            .with_priority(1),
        MoveDef::physical("crunch", Dark, 80, 1.0)
            .with_contact()
            .with_secondary(0.20, Target, BoostChange(vec![(Stat::Defense, -1)])),
        MoveDef::status_move("partingshot", Dark)
            .with_target_boosts(&[(Stat::Attack, -1), (Stat::SpecialAttack, -1)]),
        MoveDef::status_move("nastyplot", Dark).with_self_boosts(&[(Stat::SpecialAttack, 2)]),
        // Steel
        MoveDef::physical("ironhead", Steel, 80, 1.0)
            .with_contact()
            .with_secondary(0.30, Target, Flinch),
        MoveDef::special("flashcannon", Steel, 80, 1.0)
            .with_secondary(0.10, Target, BoostChange(vec![(Stat::SpecialDefense, -1)])),
        MoveDef::physical("bulletpunch", Steel, 40, 1.0)
            .with_contact()
            .with_priority(1),
        MoveDef::physical("heavyslam", Steel, 100, 1.0).with_contact(),
        MoveDef::status_move("shiftgear", Steel)
            .with_self_boosts(&[(Stat::Attack, 1), (Stat::Speed, 2)]),
        // Fairy
        MoveDef::special("moonblast", Fairy, 95, 1.0)
            .with_secondary(0.30, Target, BoostChange(vec![(Stat::SpecialAttack, -1)])),
        MoveDef::physical("playrough", Fairy, 90, 0.90)
            .with_contact()
            .with_secondary(0.10, Target, BoostChange(vec![(Stat::Attack, -1)])),
        MoveDef::special("dazzlinggleam", Fairy, 80, 1.0),
        MoveDef::status_move("mistyterrain", Fairy).set_terrain(Terrain::Misty),
        // Generic status / utility
        MoveDef::status_move("protect", Normal).with_priority(4),
        MoveDef::status_move("detect", Fighting).with_priority(4),
        MoveDef::status_move("recover", Normal).with_heal(0.5),
        MoveDef::status_move("slackoff", Normal).with_heal(0.5),
        MoveDef::status_move("softboiled", Normal).with_heal(0.5),
        MoveDef::status_move("swordsdance", Normal).with_self_boosts(&[(Stat::Attack, 2)]),
        MoveDef::status_move("shellsmash", Normal).with_self_boosts(&[
            (Stat::Attack, 2),
            (Stat::SpecialAttack, 2),
            (Stat::Speed, 2),
            (Stat::Defense, -1),
            (Stat::SpecialDefense, -1),
        ]),
        MoveDef::status_move("quiverdance", Bug).with_self_boosts(&[
            (Stat::SpecialAttack, 1),
            (Stat::SpecialDefense, 1),
            (Stat::Speed, 1),
        ]),
        MoveDef::status_move("confuseray", Ghost).confuse(),
        MoveDef::status_move("spikes", Ground).with_side_condition(SideCondition::Spikes),
        MoveDef::physical("rapidspin", Normal, 50, 1.0)
            .with_contact()
            .with_secondary(1.0, User, BoostChange(vec![(Stat::Speed, 1)])),
        MoveDef::status_move("sandstorm", Rock).set_weather(Weather::Sand),
        MoveDef::status_move("sleeptalk", Normal).sleep_usable(),
        MoveDef::status_move("charm", Fairy).with_target_boosts(&[(Stat::Attack, -2)]),
        MoveDef::status_move("screech", Normal)
            .with_accuracy(0.85)
            .with_target_boosts(&[(Stat::Defense, -2)]),
    ]
}

// Extra builder helpers kept separate so the table reads compactly.
impl MoveDef {
    fn set_weather(mut self, weather: Weather) -> Self {
        self.sets_weather = Some(weather);
        self
    }

    fn set_terrain(mut self, terrain: Terrain) -> Self {
        self.sets_terrain = Some(terrain);
        self
    }

    fn set_trick_room(mut self) -> Self {
        self.sets_trick_room = true;
        self
    }

    fn crash(mut self) -> Self {
        self.crash_on_miss = true;
        self
    }

    fn confuse(mut self) -> Self {
        self.confuses = true;
        self
    }

    fn sleep_usable(mut self) -> Self {
        self.sleep_usable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dex_has_core_moves() {
        let dex = MoveDex::builtin();
        assert!(dex.get(&MoveId::new("earthquake")).is_some());
        assert!(dex.get(&MoveId::new("Stealth Rock")).is_some());
        assert!(dex.get(&MoveId::new("uturn")).is_some());
        assert!(dex.len() > 80);
    }

    #[test]
    fn test_fallback_for_unknown_move() {
        let dex = MoveDex::builtin();
        let def = dex.get_or_fallback(&MoveId::new("definitelynotamove"));
        assert_eq!(def.base_power, 60);
        assert_eq!(def.move_type, PokemonType::Typeless);
    }

    #[test]
    fn test_crit_classes() {
        let dex = MoveDex::builtin();
        let stoneedge = dex.get(&MoveId::new("stoneedge")).unwrap();
        assert!((stoneedge.crit_chance() - 1.0 / 8.0).abs() < 1e-6);
        let tackle = dex.get(&MoveId::new("tackle")).unwrap();
        assert!((tackle.crit_chance() - 1.0 / 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_status_infliction_extraction() {
        let dex = MoveDex::builtin();
        let wisp = dex.get(&MoveId::new("willowisp")).unwrap();
        assert_eq!(wisp.status_infliction(), Some((Status::Burn, 1.0)));
        let scald = dex.get(&MoveId::new("scald")).unwrap();
        let (st, chance) = scald.status_infliction().unwrap();
        assert_eq!(st, Status::Burn);
        assert!((chance - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_never_miss_accuracy() {
        let dex = MoveDex::builtin();
        let surf = dex.get(&MoveId::new("surf")).unwrap();
        assert_eq!(surf.accuracy, None);
        assert_eq!(surf.hit_probability(), 1.0);
        let hydro = dex.get(&MoveId::new("hydropump")).unwrap();
        assert!((hydro.hit_probability() - 0.80).abs() < 1e-6);
    }
}
