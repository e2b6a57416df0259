use crate::utils::normalize_name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate type-safe identifier types with identical implementations.
///
/// Each generated type stores a normalized (lowercase, alphanumeric-only)
/// string and provides the standard conversion traits. Identifiers compare
/// and hash by their normalized form, so `MoveId::new("U-turn")` and
/// `MoveId::new("uturn")` are the same key.
macro_rules! define_id_type {
    ($name:ident) => {
        #[doc = concat!("Type-safe wrapper for ", stringify!($name), " identifiers")]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier with automatic normalization.
            pub fn new(id: impl Into<String>) -> Self {
                Self(normalize_name(&id.into()))
            }

            /// Get the normalized string representation.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for the empty identifier used as a default placeholder.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(String::new())
            }
        }
    };
}

define_id_type!(MoveId);
define_id_type!(SpeciesId);
define_id_type!(AbilityId);
define_id_type!(ItemId);
define_id_type!(RoleId);

impl ItemId {
    /// Choice Band / Choice Specs / Choice Scarf lock the holder into the
    /// first move used.
    pub fn is_choice_item(&self) -> bool {
        matches!(self.as_str(), "choiceband" | "choicespecs" | "choicescarf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_on_construction() {
        assert_eq!(MoveId::new("Stealth Rock").as_str(), "stealthrock");
        assert_eq!(MoveId::new("U-turn").as_str(), "uturn");
        assert_eq!(SpeciesId::new("Mr. Mime").as_str(), "mrmime");
        assert_eq!(ItemId::new("Heavy-Duty Boots").as_str(), "heavydutyboots");
    }

    #[test]
    fn test_normalized_forms_are_equal() {
        assert_eq!(MoveId::new("Volt Switch"), MoveId::new("voltswitch"));
    }

    #[test]
    fn test_choice_item_detection() {
        assert!(ItemId::new("Choice Scarf").is_choice_item());
        assert!(ItemId::new("choiceband").is_choice_item());
        assert!(!ItemId::new("Leftovers").is_choice_item());
    }
}
