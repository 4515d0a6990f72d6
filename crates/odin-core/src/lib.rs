//! Odin Core - Foundation crate for the Odin laboratory workspace.
//!
//! This crate provides shared types, error handling, configuration management,
//! and the key/value storage abstraction that all other Odin crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Validated identifier newtypes (`ModuleId`, `DisciplineId`, `EntityId`)
//! - [`storage`] - Injected key/value store replacing browser local storage
//!
//! # Example
//!
//! ```rust
//! use odin_core::{AppConfig, KeyValueStore, MemoryStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.atlas.compare_cap, 4);
//!
//! let store = MemoryStore::new();
//! store.set("currentUser", "ada")?;
//! assert_eq!(store.get("currentUser")?.as_deref(), Some("ada"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, AtlasConfig, CatalogConfig, GeneralConfig, StorageConfig};
pub use error::{ConfigError, ConfigResult, OdinError, Result, StorageError, StorageResult};
pub use storage::{keys, read_json_or_default, write_json, FileStore, KeyValueStore, MemoryStore};
pub use types::{DisciplineId, EntityId, ModuleId};
