//! Theme selection.
//!
//! A theme is picked per user (`theme_<username>`) or per device
//! (`selectedTheme`). Resolution falls through the user choice, then the
//! device choice, then the configured default. Unknown identifiers at any
//! level are skipped rather than surfaced.

use crate::error::{Result, SettingsError};
use odin_core::{keys, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Visual themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
    /// Blue accents on a dark background
    Ocean,
    /// Green accents on a light background
    Forest,
    /// Maximum contrast
    HighContrast,
}

impl Theme {
    /// Every theme, in picker order.
    pub const ALL: [Self; 5] = [
        Self::Light,
        Self::Dark,
        Self::Ocean,
        Self::Forest,
        Self::HighContrast,
    ];

    /// Stable identifier used in storage.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::HighContrast => "high-contrast",
        }
    }

    /// Whether text is drawn light on dark.
    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark | Self::Ocean | Self::HighContrast)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SettingsError::UnknownTheme(s.to_string()))
    }
}

/// Resolves and persists the active theme.
#[derive(Debug, Clone)]
pub struct ThemeProvider<S> {
    store: S,
    default: Theme,
}

impl<S: KeyValueStore> ThemeProvider<S> {
    /// Create a provider falling back to `default`.
    #[must_use]
    pub fn new(store: S, default: Theme) -> Self {
        Self { store, default }
    }

    /// Create a provider whose fallback is a configured identifier.
    ///
    /// An unknown identifier falls back to [`Theme::Light`].
    #[must_use]
    pub fn with_default_id(store: S, default_id: &str) -> Self {
        let default = default_id.parse().unwrap_or_else(|_| {
            warn!(theme = %default_id, "unknown default theme, using light");
            Theme::Light
        });
        Self::new(store, default)
    }

    /// Fallback theme.
    #[must_use]
    pub fn default_theme(&self) -> Theme {
        self.default
    }

    /// Theme for the session stored under `currentUser`.
    #[must_use]
    pub fn current(&self) -> Theme {
        let user = self.read(keys::CURRENT_USER).filter(|u| !u.is_empty());
        self.resolve(user.as_deref())
    }

    /// Theme for a given user, or for an anonymous session.
    #[must_use]
    pub fn resolve(&self, username: Option<&str>) -> Theme {
        let user_choice = username.and_then(|user| self.stored_theme(&keys::user_theme(user)));
        let theme = user_choice
            .or_else(|| self.stored_theme(keys::SELECTED_THEME))
            .unwrap_or(self.default);

        debug!(username = ?username, theme = %theme, "resolved theme");
        theme
    }

    /// Persist a choice. A user's choice also becomes the device choice.
    pub fn set(&self, username: Option<&str>, theme: Theme) -> Result<()> {
        if let Some(user) = username {
            self.store.set(&keys::user_theme(user), theme.id())?;
        }
        self.store.set(keys::SELECTED_THEME, theme.id())?;
        debug!(username = ?username, theme = %theme, "theme saved");
        Ok(())
    }

    /// Forget a user's choice so the device choice applies again.
    pub fn clear(&self, username: &str) -> Result<()> {
        self.store.remove(&keys::user_theme(username))?;
        Ok(())
    }

    fn stored_theme(&self, key: &str) -> Option<Theme> {
        let raw = self.read(key)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(_) => {
                warn!(key, value = %raw, "unknown stored theme, ignoring");
                None
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read theme state");
                None
            }
        }
    }
}
