//! Shared identifier types used across the Odin workspace.
//!
//! These newtypes validate their contents once at construction so that
//! downstream code can treat them as well-formed.

use crate::error::OdinError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Identifier of a gated module, the join key between catalog entries and
/// the access evaluator.
///
/// The reserved value `"any"` marks globally public destinations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(String);

impl ModuleId {
    /// The sentinel shared by all public pages.
    pub const ANY: &'static str = "any";

    /// Create a new `ModuleId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, OdinError> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(OdinError::Validation(format!(
                "invalid module ID: must be non-empty without whitespace, got '{id}'"
            )));
        }
        Ok(Self(id))
    }

    /// The public sentinel module.
    #[must_use]
    pub fn any() -> Self {
        Self(Self::ANY.to_string())
    }

    /// Whether this is the public sentinel.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.0 == Self::ANY
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for Munin Atlas discipline identifiers.
///
/// Discipline IDs are lowercase alphanumeric with hyphens, 2-64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisciplineId(String);

impl DisciplineId {
    /// Create a new `DisciplineId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, OdinError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), OdinError> {
        static DISCIPLINE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = DISCIPLINE_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,62}[a-z0-9]$").expect("valid regex"));

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(OdinError::Validation(format!(
                "invalid discipline ID: must be 2-64 lowercase alphanumeric characters or hyphens, got '{id}'"
            )))
        }
    }
}

impl AsRef<str> for DisciplineId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisciplineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an entity, unique within its discipline.
///
/// Entity IDs travel in route segments and in the comma-separated
/// `entities=` comparison parameter, so they may not contain `/`, `,`,
/// `?`, `&` or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new `EntityId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains a reserved character.
    pub fn new(id: impl Into<String>) -> Result<Self, OdinError> {
        let id = id.into();
        let reserved = |c: char| matches!(c, '/' | ',' | '?' | '&' | '=') || c.is_whitespace();

        if id.is_empty() || id.chars().any(reserved) {
            return Err(OdinError::Validation(format!(
                "invalid entity ID: must be non-empty without '/', ',', '?', '&', '=' or whitespace, got '{id}'"
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_any() {
        let any = ModuleId::any();
        assert!(any.is_public());
        assert_eq!(any.as_str(), "any");
        assert!(!ModuleId::new("munin").expect("valid module").is_public());
    }

    #[test]
    fn test_module_id_invalid() {
        assert!(ModuleId::new("").is_err());
        assert!(ModuleId::new("lab notebook").is_err());
    }

    #[test]
    fn test_discipline_id_valid() {
        for id in ["bacteriology", "cell-biology", "ph", "organic-chemistry-2"] {
            assert!(DisciplineId::new(id).is_ok(), "Failed for: {id}");
        }
    }

    #[test]
    fn test_discipline_id_invalid() {
        let too_long = "a".repeat(65);
        let invalid_ids = vec![
            "b",               // Too short
            "Bacteriology",    // Uppercase
            "cell_biology",    // Underscore
            "cell biology",    // Space
            "-virology",       // Starts with hyphen
            "virology-",       // Ends with hyphen
            "../etc",          // Path traversal
            too_long.as_str(), // Too long
        ];

        for id in invalid_ids {
            assert!(DisciplineId::new(id).is_err(), "Should fail for: {id}");
        }
    }

    #[test]
    fn test_entity_id_reserved_characters() {
        assert!(EntityId::new("e-coli").is_ok());
        assert!(EntityId::new("E1").is_ok());
        for id in ["", "a,b", "a/b", "a b", "a?b", "a=b"] {
            assert!(EntityId::new(id).is_err(), "Should fail for: {id:?}");
        }
    }

    #[test]
    fn test_id_serialization_is_transparent_string() {
        let id = DisciplineId::new("bacteriology").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"bacteriology\"");
    }
}
