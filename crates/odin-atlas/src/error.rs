//! Error types for the atlas subsystem.

use thiserror::Error;

/// Errors that can occur while loading or browsing discipline datasets.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// Discipline id does not resolve to a dataset
    #[error("discipline not found: {discipline}")]
    NotFound {
        /// The discipline ID that was not found
        discipline: String,
    },

    /// Entity id does not resolve within the discipline
    #[error("entity {entity_id} not found in {discipline}")]
    EntityNotFound {
        /// Discipline searched
        discipline: String,
        /// The entity ID that was not found
        entity_id: String,
    },

    /// No entity carries the property and no definition names it
    #[error("property {property_id} not found in {discipline}")]
    PropertyNotFound {
        /// Discipline searched
        discipline: String,
        /// The property key that was not found
        property_id: String,
    },

    /// Dataset file exists but is not a valid dataset
    #[error("invalid dataset {discipline}: {source}")]
    InvalidDataset {
        /// Discipline being loaded
        discipline: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// An entity id cannot be carried in a route
    #[error("invalid dataset {discipline}: entity id '{entity_id}' cannot appear in a route")]
    UnroutableEntity {
        /// Discipline being loaded
        discipline: String,
        /// Offending entity id
        entity_id: String,
    },

    /// Dataset source could not be read
    #[error("failed to read dataset source {path}: {source}")]
    Io {
        /// Path being read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl AtlasError {
    /// Whether this error means "nothing by that id".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::EntityNotFound { .. } | Self::PropertyNotFound { .. }
        )
    }
}

/// Result type for atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
