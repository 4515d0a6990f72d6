//! Odin Settings - Theme, preferences and quick notes
//!
//! This crate owns the per-user state that is not about access or content:
//! which theme is shown, the preferences document and the quick-notes list.
//! Everything is persisted through an injected [`odin_core::KeyValueStore`].
//!
//! ## Architecture
//!
//! - **Theme**: user choice, then device choice, then configured default
//! - **Settings**: one JSON document per user, merged over defaults, with
//!   all-or-nothing import
//! - **Quick notes**: small colored notes, newest first
//! - **Notifications**: a [`Notifier`] sink for success and error toasts
//!
//! ## Example
//!
//! ```rust
//! use odin_core::MemoryStore;
//! use odin_settings::{SettingsManager, Theme, ThemeProvider};
//!
//! let store = MemoryStore::new();
//!
//! let themes = ThemeProvider::new(store.clone(), Theme::Light);
//! themes.set(Some("ada"), Theme::Dark).unwrap();
//! assert_eq!(themes.resolve(Some("ada")), Theme::Dark);
//!
//! let settings = SettingsManager::new(store);
//! assert!(settings.import(Some("ada"), "[]").is_err());
//! assert_eq!(settings.load(Some("ada")).language, "fr");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

/// Error types for settings operations.
pub mod error;
/// Quick notes.
pub mod notes;
/// Notification sink.
pub mod notify;
/// Preferences document.
pub mod settings;
/// Theme resolution.
pub mod theme;

pub use error::{Result, SettingsError};
pub use notes::{NoteColor, QuickNote, QuickNotes};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier};
pub use settings::{Settings, SettingsManager};
pub use theme::{Theme, ThemeProvider};
