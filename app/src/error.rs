//! Error type for app commands.

use odin_access::AccessError;
use odin_atlas::AtlasError;
use odin_catalog::CatalogError;
use odin_core::{ConfigError, OdinError, StorageError};
use odin_settings::SettingsError;
use serde::Serialize;
use std::fmt;

/// Serializable error returned by every command.
#[derive(Debug, Serialize)]
pub struct CommandError {
    /// Error code for frontend handling (e.g., "ENTITY_NOT_FOUND")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional debugging context
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<CatalogError> for CommandError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { entry_id } => Self::with_details(
                "ENTRY_NOT_FOUND",
                format!("No catalog entry named {entry_id}"),
                serde_json::json!({ "entryId": entry_id }),
            ),
            CatalogError::Storage(e) => e.into(),
            other => Self::new("CATALOG_ERROR", other.to_string()),
        }
    }
}

impl From<AtlasError> for CommandError {
    fn from(err: AtlasError) -> Self {
        match err {
            AtlasError::NotFound { discipline } => Self::with_details(
                "DISCIPLINE_NOT_FOUND",
                format!("No discipline named {discipline}"),
                serde_json::json!({ "discipline": discipline }),
            ),
            AtlasError::EntityNotFound {
                discipline,
                entity_id,
            } => Self::with_details(
                "ENTITY_NOT_FOUND",
                format!("No entity {entity_id} in {discipline}"),
                serde_json::json!({ "discipline": discipline, "entityId": entity_id }),
            ),
            AtlasError::PropertyNotFound {
                discipline,
                property_id,
            } => Self::with_details(
                "PROPERTY_NOT_FOUND",
                format!("No property {property_id} in {discipline}"),
                serde_json::json!({ "discipline": discipline, "propertyId": property_id }),
            ),
            other => Self::new("DATASET_ERROR", other.to_string()),
        }
    }
}

impl From<SettingsError> for CommandError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::InvalidImport { reason } => Self::with_details(
                "INVALID_IMPORT",
                "Settings file was rejected; nothing was changed",
                serde_json::json!({ "reason": reason }),
            ),
            SettingsError::UnknownTheme(theme) => {
                Self::new("UNKNOWN_THEME", format!("Unknown theme: {theme}"))
            }
            SettingsError::NoteNotFound(id) => {
                Self::new("NOTE_NOT_FOUND", format!("Note not found: {id}"))
            }
            SettingsError::Storage(e) => e.into(),
            SettingsError::Serialization(e) => {
                Self::new("SERIALIZATION_ERROR", format!("Serialization error: {e}"))
            }
        }
    }
}

impl From<AccessError> for CommandError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Anonymous => Self::new("NOT_SIGNED_IN", "No user is signed in"),
            AccessError::Storage(e) => e.into(),
            AccessError::Serialization(e) => {
                Self::new("SERIALIZATION_ERROR", format!("Serialization error: {e}"))
            }
        }
    }
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        Self::new("STORAGE_ERROR", format!("Storage error: {err}"))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", format!("Configuration error: {err}"))
    }
}

impl From<OdinError> for CommandError {
    fn from(err: OdinError) -> Self {
        match err {
            OdinError::Config(e) => e.into(),
            OdinError::Storage(e) => e.into(),
            other => Self::new("INTERNAL_ERROR", other.to_string()),
        }
    }
}
