//! Core error types for the Odin workspace.
//!
//! This module defines the central error type used across all subsystems.
//! Each subsystem error is represented as a variant for clear error propagation.

use thiserror::Error;

/// Central error type for all Odin operations.
#[derive(Error, Debug)]
pub enum OdinError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persisted key/value storage errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog errors (registry construction, unknown entries)
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Atlas errors (dataset loading, comparison)
    #[error("atlas error: {0}")]
    Atlas(String),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Key/value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path of the backing file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Backing document is not a JSON object of strings
    #[error("corrupt storage document at {path}: {source}")]
    Corrupt {
        /// Path of the backing file
        path: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized before writing
    #[error("failed to serialize value for key {key}: {source}")]
    Serialize {
        /// Storage key
        key: String,
        /// Serialization error
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias using `OdinError`.
pub type Result<T> = std::result::Result<T, OdinError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
