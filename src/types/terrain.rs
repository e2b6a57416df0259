use serde::{Deserialize, Serialize};

/// Terrain conditions (affect grounded Pokemon only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    None,
    Electric,
    Grassy,
    Psychic,
    Misty,
}

impl Terrain {
    pub fn from_normalized_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Terrain::None),
            "electric" | "electricterrain" => Some(Terrain::Electric),
            "grassy" | "grassyterrain" => Some(Terrain::Grassy),
            "psychic" | "psychicterrain" => Some(Terrain::Psychic),
            "misty" | "mistyterrain" => Some(Terrain::Misty),
            _ => None,
        }
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::None
    }
}
