//! User settings document with all-or-nothing import.

use crate::error::{Result, SettingsError};
use odin_core::{keys, read_json_or_default, write_json, KeyValueStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const MIN_FONT_SCALE: f64 = 0.5;
const MAX_FONT_SCALE: f64 = 2.0;

/// Preferences stored as one JSON object.
///
/// Missing keys take their default value. Keys this version does not know
/// are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Interface language code
    pub language: String,
    /// Show toast notifications
    pub notifications: bool,
    /// Dense layout
    pub compact_mode: bool,
    /// Disable animations
    pub reduced_motion: bool,
    /// Text size multiplier
    pub font_scale: f64,
    /// Initial comparison filter, `all` or `diff-only`
    pub compare_filter: String,
    /// Unrecognized keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "fr".to_string(),
            notifications: true,
            compact_mode: false,
            reduced_motion: false,
            font_scale: 1.0,
            compare_filter: "all".to_string(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Check value ranges that typing alone does not enforce.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(invalid("language must not be empty"));
        }
        if !(MIN_FONT_SCALE..=MAX_FONT_SCALE).contains(&self.font_scale) {
            return Err(invalid(format!(
                "fontScale must be between {MIN_FONT_SCALE} and {MAX_FONT_SCALE}, got {}",
                self.font_scale
            )));
        }
        if !matches!(self.compare_filter.as_str(), "all" | "diff-only") {
            return Err(invalid(format!(
                "compareFilter must be \"all\" or \"diff-only\", got {:?}",
                self.compare_filter
            )));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidImport {
        reason: reason.into(),
    }
}

/// Reads, writes, imports and exports settings documents.
#[derive(Debug, Clone)]
pub struct SettingsManager<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsManager<S> {
    /// Create a manager over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current settings. Missing or corrupt documents read as defaults.
    #[must_use]
    pub fn load(&self, username: Option<&str>) -> Settings {
        read_json_or_default(&self.store, &keys::settings(username))
    }

    /// Persist a full settings document after validating it.
    pub fn save(&self, username: Option<&str>, settings: &Settings) -> Result<()> {
        settings.validate()?;
        write_json(&self.store, &keys::settings(username), settings)?;
        debug!(username = ?username, "settings saved");
        Ok(())
    }

    /// Apply a change to the stored settings.
    pub fn update(
        &self,
        username: Option<&str>,
        change: impl FnOnce(&mut Settings),
    ) -> Result<Settings> {
        let mut settings = self.load(username);
        change(&mut settings);
        self.save(username, &settings)?;
        Ok(settings)
    }

    /// Restore defaults.
    pub fn reset(&self, username: Option<&str>) -> Result<()> {
        self.store.remove(&keys::settings(username))?;
        info!(username = ?username, "settings reset");
        Ok(())
    }

    /// Replace settings with an exported document.
    ///
    /// The whole document is parsed, merged over defaults and validated
    /// before anything is written. On error the stored settings are left
    /// exactly as they were.
    pub fn import(&self, username: Option<&str>, json: &str) -> Result<Settings> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| invalid(format!("not valid JSON: {e}")))?;

        let Value::Object(fields) = document else {
            return Err(invalid("expected a JSON object"));
        };

        let settings: Settings = serde_json::from_value(Value::Object(fields))
            .map_err(|e| invalid(e.to_string()))?;
        settings.validate()?;

        write_json(&self.store, &keys::settings(username), &settings)?;
        info!(username = ?username, "settings imported");
        Ok(settings)
    }

    /// Current settings as pretty-printed JSON.
    pub fn export(&self, username: Option<&str>) -> Result<String> {
        let settings = self.load(username);
        if let Err(e) = settings.validate() {
            warn!(username = ?username, error = %e, "exporting settings that fail validation");
        }
        Ok(serde_json::to_string_pretty(&settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odin_core::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_missing_reads_as_default() {
        let manager = SettingsManager::new(MemoryStore::new());
        assert_eq!(manager.load(Some("ada")), Settings::default());
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let store = MemoryStore::with_entries([(
            keys::settings(Some("ada")),
            r#"{"compactMode": true}"#.to_string(),
        )]);
        let settings = SettingsManager::new(store).load(Some("ada"));
        assert!(settings.compact_mode);
        assert_eq!(settings.language, "fr");
        assert!(settings.notifications);
    }

    #[test]
    fn test_corrupt_document_reads_as_default() {
        let store = MemoryStore::with_entries([(keys::settings(None), "{oops".to_string())]);
        assert_eq!(SettingsManager::new(store).load(None), Settings::default());
    }

    #[test]
    fn test_settings_are_per_user() {
        let manager = SettingsManager::new(MemoryStore::new());
        manager
            .update(Some("ada"), |s| s.language = "en".to_string())
            .unwrap();
        assert_eq!(manager.load(Some("ada")).language, "en");
        assert_eq!(manager.load(Some("bob")).language, "fr");
        assert_eq!(manager.load(None).language, "fr");
    }

    #[test]
    fn test_unknown_keys_survive_import_and_export() {
        let manager = SettingsManager::new(MemoryStore::new());
        manager
            .import(None, r#"{"language": "en", "sidebarWidth": 240}"#)
            .unwrap();

        let exported: Value = serde_json::from_str(&manager.export(None).unwrap()).unwrap();
        assert_eq!(exported["language"], json!("en"));
        assert_eq!(exported["sidebarWidth"], json!(240));
        assert_eq!(exported["notifications"], json!(true));
    }

    #[test]
    fn test_export_is_pretty() {
        let manager = SettingsManager::new(MemoryStore::new());
        let exported = manager.export(None).unwrap();
        assert!(exported.contains('\n'));
        assert!(exported.contains("\"compareFilter\": \"all\""));
    }

    #[test]
    fn test_import_rejections() {
        let manager = SettingsManager::new(MemoryStore::new());
        let cases = [
            "not json",
            "[1, 2]",
            "\"text\"",
            r#"{"notifications": "yes"}"#,
            r#"{"fontScale": 9}"#,
            r#"{"language": " "}"#,
            r#"{"compareFilter": "some"}"#,
        ];

        for case in cases {
            let err = manager.import(None, case).unwrap_err();
            assert!(
                matches!(err, SettingsError::InvalidImport { .. }),
                "input {case:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_failed_import_keeps_previous_settings() {
        let store = MemoryStore::new();
        let manager = SettingsManager::new(store.clone());
        manager.update(None, |s| s.compact_mode = true).unwrap();
        let before = store.get(&keys::settings(None)).unwrap();

        assert!(manager
            .import(None, r#"{"compactMode": false, "fontScale": "big"}"#)
            .is_err());
        assert_eq!(store.get(&keys::settings(None)).unwrap(), before);
    }

    #[test]
    fn test_save_validates() {
        let manager = SettingsManager::new(MemoryStore::new());
        let settings = Settings {
            font_scale: 0.1,
            ..Settings::default()
        };
        assert!(manager.save(None, &settings).is_err());
    }

    #[test]
    fn test_reset() {
        let manager = SettingsManager::new(MemoryStore::new());
        manager.update(None, |s| s.reduced_motion = true).unwrap();
        manager.reset(None).unwrap();
        assert_eq!(manager.load(None), Settings::default());
    }
}
