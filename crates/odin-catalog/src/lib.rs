//! Odin Catalog - Navigable destinations, palette search and favorites.
//!
//! This crate holds the catalog of every page and tool a user can navigate
//! to, and the command palette that searches it.
//!
//! # Architecture
//!
//! - **Entries** ([`entry`]): catalog entry type and tool kinds
//! - **Advanced modules** ([`advanced`]): tool groups expanded to one entry per tool
//! - **Registry** ([`registry`]): ordered, validated entry list with queries
//! - **Built-in catalog** ([`builtin`]): the catalog shipped with the application
//! - **Search** ([`search`]): access-filtered substring search
//! - **Palette** ([`palette`]): keyboard state machine over search results
//! - **Favorites** ([`favorites`]) and **recent searches** ([`recent`]): persisted palette state
//!
//! # Example
//!
//! ```rust
//! use odin_catalog::{builtin_registry, search};
//! use std::collections::BTreeSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = builtin_registry()?;
//! let public_only = |module_id: &str| module_id == "any";
//!
//! let results = search(registry.entries(), public_only, "", &BTreeSet::new());
//! assert!(results.iter().any(|entry| entry.id == "home"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod advanced;
pub mod builtin;
pub mod entry;
pub mod error;
pub mod favorites;
pub mod palette;
pub mod recent;
pub mod registry;
pub mod search;

// Re-export commonly used types
pub use advanced::{AdvancedModule, AdvancedTool};
pub use builtin::builtin_registry;
pub use entry::{CatalogEntry, ToolType, ToolView};
pub use error::{CatalogError, Result};
pub use favorites::Favorites;
pub use palette::{AccessPredicate, CommandPalette, PaletteAction, PaletteKey};
pub use recent::{RecentSearches, DEFAULT_RECENT_CAP};
pub use registry::{CatalogRegistry, CatalogRegistryBuilder};
pub use search::search;
