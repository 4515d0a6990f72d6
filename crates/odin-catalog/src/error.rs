//! Error types for the catalog subsystem.

use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog entry not found
    #[error("catalog entry not found: {entry_id}")]
    NotFound {
        /// The entry ID that was not found
        entry_id: String,
    },

    /// Two entries share the same id
    #[error("duplicate catalog entry id: {entry_id}")]
    DuplicateId {
        /// The repeated entry ID
        entry_id: String,
    },

    /// Two entries share a gated module id
    #[error("module {module_id} is used by both {first} and {second}")]
    DuplicateModule {
        /// The repeated module ID
        module_id: String,
        /// Entry that claimed it first
        first: String,
        /// Entry that claimed it again
        second: String,
    },

    /// Invalid catalog entry (validation failed)
    #[error("invalid catalog entry {entry_id}: {reason}")]
    ValidationError {
        /// Entry ID being validated
        entry_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Persisted palette state could not be written
    #[error("storage error: {0}")]
    Storage(#[from] odin_core::StorageError),

    /// Invalid module ID format
    #[error("invalid module ID: {0}")]
    InvalidId(#[from] odin_core::OdinError),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
