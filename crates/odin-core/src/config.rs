//! Configuration management for Odin.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/odin/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General application settings
    pub general: GeneralConfig,
    /// Catalog and command palette settings
    pub catalog: CatalogConfig,
    /// Munin Atlas (discipline browser) settings
    pub atlas: AtlasConfig,
    /// Persisted key/value storage settings
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `ODIN_THEME`: Override the default theme
    /// - `ODIN_DATASETS_DIR`: Override the discipline dataset directory
    /// - `ODIN_COMPARE_CAP`: Override the maximum comparison selection size
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides using the given variable lookup.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(theme) = lookup("ODIN_THEME") {
            tracing::debug!("Override general.theme from env: {}", theme);
            self.general.theme = theme;
        }

        if let Some(dir) = lookup("ODIN_DATASETS_DIR") {
            tracing::debug!("Override atlas.datasets_dir from env: {}", dir);
            self.atlas.datasets_dir = Some(PathBuf::from(dir));
        }

        if let Some(val) = lookup("ODIN_COMPARE_CAP") {
            if let Ok(cap) = val.parse() {
                self.atlas.compare_cap = cap;
                tracing::debug!("Override atlas.compare_cap from env: {}", cap);
            }
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.atlas.compare_cap < 2 {
            return Err(ConfigError::InvalidValue {
                field: "atlas.compare_cap".to_string(),
                reason: format!(
                    "a comparison needs at least 2 entities, got cap {}",
                    self.atlas.compare_cap
                ),
            });
        }

        if self.catalog.recent_searches_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.recent_searches_cap".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/odin/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "odin", "odin").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/odin`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "odin", "odin").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Resolve the storage file, relative paths being taken from the data directory.
    pub fn storage_path(&self) -> ConfigResult<PathBuf> {
        if self.storage.file.is_absolute() {
            Ok(self.storage.file.clone())
        } else {
            Ok(Self::data_dir()?.join(&self.storage.file))
        }
    }

    /// Resolve the discipline dataset directory.
    ///
    /// Defaults to `<data_dir>/datasets` when not configured.
    pub fn datasets_dir(&self) -> ConfigResult<PathBuf> {
        match &self.atlas.datasets_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("datasets")),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default theme identifier when the user has not picked one
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
        }
    }
}

/// Catalog and command palette settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Maximum number of remembered palette searches
    pub recent_searches_cap: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            recent_searches_cap: 10,
        }
    }
}

/// Munin Atlas settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Directory holding `<discipline>.json` datasets
    pub datasets_dir: Option<PathBuf>,
    /// Maximum number of entities in one comparison
    pub compare_cap: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            datasets_dir: None,
            compare_cap: 4,
        }
    }
}

/// Persisted key/value storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backing JSON document, relative to the data directory unless absolute
    pub file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("storage.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.theme, "light");
        assert_eq!(config.catalog.recent_searches_cap, 10);
        assert_eq!(config.atlas.compare_cap, 4);
        assert!(config.atlas.datasets_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[catalog]"));
        assert!(toml_str.contains("[atlas]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.general.theme, config.general.theme);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let config = AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load");
        assert_eq!(config.atlas.compare_cap, 4);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            "[general]\ntheme = \"dark\"\n\n[atlas]\ncompare_cap = 3\n",
        )
        .expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.general.theme, "dark");
        assert_eq!(loaded.atlas.compare_cap, 3);
        // untouched sections keep their defaults
        assert_eq!(loaded.catalog.recent_searches_cap, 10);
    }

    #[test]
    fn test_load_rejects_invalid_cap() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[atlas]\ncompare_cap = 1\n").expect("write config file");

        let err = AppConfig::load_from(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ODIN_THEME", "dark"),
            ("ODIN_DATASETS_DIR", "/srv/odin/datasets"),
            ("ODIN_COMPARE_CAP", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| vars.get(name).map(ToString::to_string));

        assert_eq!(config.general.theme, "dark");
        assert_eq!(
            config.atlas.datasets_dir,
            Some(PathBuf::from("/srv/odin/datasets"))
        );
        // unparseable numbers are ignored
        assert_eq!(config.atlas.compare_cap, 4);
    }

    #[test]
    fn test_absolute_storage_path_is_kept() {
        let mut config = AppConfig::default();
        config.storage.file = PathBuf::from("/var/lib/odin/state.json");
        assert_eq!(
            config.storage_path().expect("storage path"),
            PathBuf::from("/var/lib/odin/state.json")
        );
    }
}
