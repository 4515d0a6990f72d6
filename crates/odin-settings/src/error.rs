use odin_core::StorageError;
use thiserror::Error;

/// Error types for theme, settings and note operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Persisted storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An imported settings document was rejected. Nothing was stored.
    #[error("Invalid settings import: {reason}")]
    InvalidImport {
        /// What was wrong with the document
        reason: String,
    },

    /// Theme identifier is not one of the known themes.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// No quick note has this id.
    #[error("Note not found: {0}")]
    NoteNotFound(String),
}

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
