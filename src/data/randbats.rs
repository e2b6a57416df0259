//! # Random-Battle Role Database
//!
//! Loader for the role database JSON (species -> roles -> move/ability/item/
//! tera sets). The database is parsed once at startup into `RoleCandidate`
//! values with derived archetype tags, then shared read-only behind
//! `GameData`.
//!
//! The loader degrades gracefully: a missing database yields an empty
//! `RandbatsDb` and belief construction falls back to revealed-only
//! candidates.

use crate::constants::{is_priority_move, is_setup_move, is_weather_ability};
use crate::data::movedex::{MoveCategory, MoveDex};
use crate::types::{AbilityId, DataError, DataResult, ItemId, MoveId, PokemonType, RoleId, SpeciesId};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// One role candidate for a species: the unit the opponent belief tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleCandidate {
    /// e.g. "garchomp:fastattacker"
    pub id: RoleId,
    pub species: SpeciesId,
    pub role_name: String,
    pub level: u8,
    pub moves: BTreeSet<MoveId>,
    pub abilities: BTreeSet<AbilityId>,
    pub items: BTreeSet<ItemId>,
    pub tera_types: BTreeSet<PokemonType>,
    /// Derived archetype tags
    pub is_physical: bool,
    pub has_setup: bool,
    pub has_priority: bool,
    /// Threat shaping knobs used by the evaluator's belief terms
    pub speed_mult: f32,
    pub physical_threat: f32,
}

impl RoleCandidate {
    /// Single-candidate fallback built from revealed information only.
    pub fn fallback(species: SpeciesId, revealed_moves: &BTreeSet<MoveId>, dex: &MoveDex) -> Self {
        let (is_physical, has_setup, has_priority) = infer_tags(revealed_moves, dex);
        Self {
            id: RoleId::new(format!("{}:fallback", species)),
            species,
            role_name: "fallback".to_string(),
            level: 80,
            moves: revealed_moves.clone(),
            abilities: BTreeSet::new(),
            items: BTreeSet::new(),
            tera_types: BTreeSet::new(),
            is_physical,
            has_setup,
            has_priority,
            speed_mult: 1.0,
            physical_threat: if is_physical { 0.65 } else { 0.35 },
        }
    }

    /// Strategic weight of this role: wincon and enabler roles count for more
    /// than a bare attacker when valuing material.
    pub fn role_weight(&self) -> f32 {
        let mut w = 1.0;
        if self.has_setup {
            w *= 1.10;
        }
        if self.has_priority {
            w *= 1.05;
        }
        if self.moves.iter().any(|m| crate::constants::is_hazard_move(m.as_str())) {
            w *= 1.06;
        }
        if self.moves.iter().any(|m| crate::constants::is_hazard_removal(m.as_str())) {
            w *= 1.04;
        }
        if self.abilities.iter().any(|a| is_weather_ability(a.as_str())) {
            w *= 1.12;
        }
        w
    }

    pub fn has_removal(&self) -> bool {
        self.moves.iter().any(|m| crate::constants::is_hazard_removal(m.as_str()))
    }

    pub fn has_boots(&self) -> bool {
        self.items.iter().any(|i| i.as_str() == "heavydutyboots")
    }
}

/// Derive (is_physical, has_setup, has_priority) from a move set.
fn infer_tags(moves: &BTreeSet<MoveId>, dex: &MoveDex) -> (bool, bool, bool) {
    let mut phys_dmg = 0u32;
    let mut dmg_total = 0u32;
    let mut has_setup = false;
    let mut has_priority = false;

    for mid in moves {
        if is_setup_move(mid.as_str()) {
            has_setup = true;
        }
        if is_priority_move(mid.as_str()) {
            has_priority = true;
        }
        if let Some(def) = dex.get(mid) {
            if def.priority > 0 && def.is_damaging() {
                has_priority = true;
            }
            if def.setup_stages() > 0 && !def.is_damaging() {
                has_setup = true;
            }
            if def.is_damaging() {
                dmg_total += 1;
                if def.category == MoveCategory::Physical {
                    phys_dmg += 1;
                }
            }
        }
    }

    let is_physical = dmg_total > 0 && phys_dmg * 10 >= dmg_total * 6;
    (is_physical, has_setup, has_priority)
}

#[derive(Debug, Deserialize)]
struct RawRole {
    #[serde(default)]
    moves: Vec<String>,
    #[serde(default)]
    abilities: Vec<String>,
    #[serde(default)]
    items: Vec<String>,
    #[serde(default, rename = "teraTypes")]
    tera_types: Vec<String>,
    #[serde(default)]
    level: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawSpecies {
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    roles: BTreeMap<String, RawRole>,
}

/// Parsed role database shared read-only for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct RandbatsDb {
    species: HashMap<SpeciesId, Vec<RoleCandidate>>,
    /// Average role weight across the whole database, used to value unseen
    /// opposing slots.
    avg_role_weight: f32,
}

impl RandbatsDb {
    /// Empty database (belief falls back to revealed-only candidates).
    pub fn empty() -> Self {
        Self {
            species: HashMap::new(),
            avg_role_weight: 1.0,
        }
    }

    /// Load from the first available location: the `RANDBATS_DB_PATH`
    /// environment variable, then well-known relative paths.
    pub fn load_default(dex: &MoveDex) -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Ok(path) = std::env::var("RANDBATS_DB_PATH") {
            if !path.is_empty() {
                candidates.push(PathBuf::from(path));
            }
        }
        candidates.push(PathBuf::from("gen9randombattle.json"));
        candidates.push(PathBuf::from("data/gen9randombattle.json"));

        for path in candidates {
            if path.exists() {
                match Self::from_path(&path, dex) {
                    Ok(db) => {
                        tracing::info!(path = %path.display(), species = db.species.len(), "loaded role database");
                        return db;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to load role database");
                    }
                }
            }
        }
        tracing::warn!("no role database found; beliefs will use revealed-only candidates");
        Self::empty()
    }

    /// Load and parse a role database file.
    pub fn from_path(path: impl AsRef<Path>, dex: &MoveDex) -> DataResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DataError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content, dex).map_err(|e| DataError::JsonParse {
            file: path.display().to_string(),
            source: e,
        })
    }

    /// Parse a role database from a JSON string.
    pub fn from_json(json: &str, dex: &MoveDex) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, RawSpecies> = serde_json::from_str(json)?;
        let mut species = HashMap::new();

        for (species_name, entry) in raw {
            let species_id = SpeciesId::new(species_name.as_str());
            let default_level = entry.level.unwrap_or(80);
            let mut roles = Vec::new();

            for (role_name, role) in entry.roles {
                let moves: BTreeSet<MoveId> =
                    role.moves.iter().map(|m| MoveId::new(m.as_str())).collect();
                let abilities: BTreeSet<AbilityId> =
                    role.abilities.iter().map(|a| AbilityId::new(a.as_str())).collect();
                let items: BTreeSet<ItemId> =
                    role.items.iter().map(|i| ItemId::new(i.as_str())).collect();
                let tera_types: BTreeSet<PokemonType> = role
                    .tera_types
                    .iter()
                    .filter_map(|t| PokemonType::from_normalized_str(t))
                    .collect();

                let (is_physical, has_setup, has_priority) = infer_tags(&moves, dex);
                let has_setup =
                    has_setup || role_name.to_lowercase().contains("setup");

                roles.push(RoleCandidate {
                    id: RoleId::new(format!(
                        "{}:{}",
                        species_id,
                        crate::utils::normalize_name(&role_name)
                    )),
                    species: species_id.clone(),
                    role_name: role_name.clone(),
                    level: role.level.unwrap_or(default_level),
                    moves,
                    abilities,
                    items,
                    tera_types,
                    is_physical,
                    has_setup,
                    has_priority,
                    speed_mult: 1.0,
                    physical_threat: if is_physical { 0.65 } else { 0.35 },
                });
            }

            if !roles.is_empty() {
                species.insert(species_id, roles);
            }
        }

        let mut db = Self {
            species,
            avg_role_weight: 1.0,
        };
        db.avg_role_weight = db.compute_avg_role_weight();
        Ok(db)
    }

    fn compute_avg_role_weight(&self) -> f32 {
        let mut total = 0.0;
        let mut count = 0u32;
        for roles in self.species.values() {
            for role in roles {
                total += role.role_weight();
                count += 1;
            }
        }
        if count == 0 {
            1.0
        } else {
            total / count as f32
        }
    }

    pub fn candidates(&self, species: &SpeciesId) -> Option<&[RoleCandidate]> {
        self.species.get(species).map(|v| v.as_slice())
    }

    /// All species in the database (the unseen-slot sampling universe).
    pub fn species_ids(&self) -> impl Iterator<Item = &SpeciesId> {
        self.species.keys()
    }

    pub fn avg_role_weight(&self) -> f32 {
        self.avg_role_weight
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db() -> RandbatsDb {
        let json = r#"{
            "Garchomp": {
                "level": 76,
                "roles": {
                    "Fast Attacker": {
                        "moves": ["Earthquake", "Dragon Claw", "Stone Edge", "Fire Blast", "Swords Dance"],
                        "abilities": ["Rough Skin"],
                        "items": ["Choice Scarf", "Heavy-Duty Boots"],
                        "teraTypes": ["Steel", "Fire"]
                    },
                    "Bulky Support": {
                        "moves": ["Earthquake", "Stealth Rock", "Dragon Tail", "Fire Blast"],
                        "abilities": ["Rough Skin"],
                        "items": ["Rocky Helmet", "Leftovers"],
                        "teraTypes": ["Water"]
                    }
                }
            }
        }"#;
        RandbatsDb::from_json(json, &MoveDex::builtin()).unwrap()
    }

    #[test]
    fn test_parse_roles() {
        let db = sample_db();
        let roles = db.candidates(&SpeciesId::new("Garchomp")).unwrap();
        assert_eq!(roles.len(), 2);
        let fast = roles.iter().find(|r| r.role_name == "Fast Attacker").unwrap();
        assert!(fast.moves.contains(&MoveId::new("earthquake")));
        assert!(fast.items.contains(&ItemId::new("heavydutyboots")));
        assert_eq!(fast.level, 76);
    }

    #[test]
    fn test_derived_tags() {
        let db = sample_db();
        let roles = db.candidates(&SpeciesId::new("garchomp")).unwrap();
        let fast = roles.iter().find(|r| r.role_name == "Fast Attacker").unwrap();
        assert!(fast.has_setup, "Swords Dance should tag has_setup");
        assert!(fast.is_physical);
        let bulky = roles.iter().find(|r| r.role_name == "Bulky Support").unwrap();
        assert!(!bulky.has_setup);
    }

    #[test]
    fn test_role_weight_favors_setup_and_hazards() {
        let db = sample_db();
        let roles = db.candidates(&SpeciesId::new("garchomp")).unwrap();
        let fast = roles.iter().find(|r| r.role_name == "Fast Attacker").unwrap();
        let bulky = roles.iter().find(|r| r.role_name == "Bulky Support").unwrap();
        assert!(fast.role_weight() > 1.0);
        // Bulky carries Stealth Rock, so it is weighted above a plain attacker too.
        assert!(bulky.role_weight() > 1.0);
        assert!(db.avg_role_weight() > 1.0);
    }

    #[test]
    fn test_missing_species_is_none() {
        let db = sample_db();
        assert!(db.candidates(&SpeciesId::new("mew")).is_none());
    }
}
