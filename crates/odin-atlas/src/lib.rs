//! Odin Atlas - Munin Atlas discipline datasets and entity comparison.
//!
//! A discipline is a list of entities whose property bags do not share a
//! schema. This crate loads disciplines, lets a user search, filter and
//! select entities, and compares a selection key by key.
//!
//! # Architecture
//!
//! - **Dataset** ([`dataset`]): disciplines, entities and schema-less properties
//! - **Loader** ([`loader`]): async, memoizing, cancellable dataset loading
//! - **Comparison** ([`compare`]): key unions, structural equality and row filtering
//! - **Rendering** ([`render`]): cell text for absent, scalar, list and map values
//! - **Selection** ([`selection`]): search, filters and comparison selection
//! - **Detail** ([`detail`]): entity and property detail views
//! - **Routes** ([`routes`]): atlas paths
//!
//! # Example
//!
//! ```rust
//! use odin_atlas::{compare, DisciplineData, FilterMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data: DisciplineData = serde_json::from_str(r#"{
//!     "displayName": "Bacteriology",
//!     "entities": [
//!         {"id": "E1", "name": "E1", "properties": {"GRAM": "+"}},
//!         {"id": "E2", "name": "E2", "properties": {"GRAM": "-"}}
//!     ]
//! }"#)?;
//!
//! let outcome = compare(&data, &["E1", "E2"]);
//! let view = outcome.view().expect("two entities resolve");
//! assert_eq!(view.visible_rows(FilterMode::DiffOnly).len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod compare;
pub mod dataset;
pub mod detail;
pub mod error;
pub mod loader;
pub mod render;
pub mod routes;
pub mod selection;

// Re-export commonly used types
pub use compare::{
    canonicalize, compare, filter_rows, is_identical, union_keys, union_sections, value_of,
    CompareOutcome, ComparisonRow, ComparisonSummary, ComparisonView, FilterMode, RowKind,
    MIN_COMPARE,
};
pub use dataset::{
    CrossReference, DisciplineData, Entity, Property, PropertyBag, PropertyDefinition,
    PropertyValue,
};
pub use detail::{entity_detail, property_detail, EntityDetail, PropertyDetail};
pub use error::{AtlasError, Result};
pub use loader::{
    DatasetLoader, DatasetSource, DirectorySource, LoadOutcome, LoadState, MemorySource,
    Navigation,
};
pub use render::{render, render_text, RenderedCell, PLACEHOLDER};
pub use routes::Route;
pub use selection::{AfterRemoval, PropertyFilter, SelectionController, DEFAULT_COMPARE_CAP};
