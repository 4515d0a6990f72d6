//! Persisted key/value storage.
//!
//! Every piece of user state (session, favorites, settings, notes) lives
//! under a string key holding a string value, usually JSON. Components take
//! a [`KeyValueStore`] instead of touching a global so they stay testable
//! with [`MemoryStore`].

use crate::error::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Well-known storage keys.
pub mod keys {
    /// Username of the active session.
    pub const CURRENT_USER: &str = "currentUser";
    /// JSON array of favorite catalog-entry ids.
    pub const FAVORITES: &str = "ols_favorites";
    /// JSON array of recent palette searches, most recent first.
    pub const RECENT_SEARCHES: &str = "recentSearches";
    /// JSON array of quick notes.
    pub const QUICK_NOTES: &str = "quickNotes";
    /// Device-wide theme identifier.
    pub const SELECTED_THEME: &str = "selectedTheme";

    const SETTINGS_PREFIX: &str = "odin-la-science-settings";

    /// Profile document of a user.
    #[must_use]
    pub fn user_profile(username: &str) -> String {
        format!("user_profile_{username}")
    }

    /// Theme picked by a specific user.
    #[must_use]
    pub fn user_theme(username: &str) -> String {
        format!("theme_{username}")
    }

    /// Settings document, per user when a username is known.
    #[must_use]
    pub fn settings(username: Option<&str>) -> String {
        match username {
            Some(user) => format!("{SETTINGS_PREFIX}-{user}"),
            None => SETTINGS_PREFIX.to_string(),
        }
    }
}

/// String key/value store with local-storage semantics.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// All keys currently stored, in sorted order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }
}

/// Read a JSON value, treating missing, unreadable and corrupt entries as
/// the type's default.
///
/// Corruption is logged and never surfaced; callers always get a usable value.
pub fn read_json_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "corrupt persisted value, using default");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read persisted value, using default");
            T::default()
        }
    }
}

/// Serialize a value as JSON and store it.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().expect("store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().expect("store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().expect("store lock poisoned");
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = self.entries.read().expect("store lock poisoned");
        Ok(entries.keys().cloned().collect())
    }
}

/// Store persisted as a single JSON object on disk.
///
/// The whole document is loaded on open and rewritten on every mutation
/// through a temporary file and a rename, so a crash never leaves a
/// half-written document behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or is not a JSON
    /// object of strings.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                path: path.display().to_string(),
                source,
            })?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), count = entries.len(), "opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let io_err = |source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let raw = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Serialize {
            key: "*".to_string(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().expect("store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().expect("store lock poisoned");
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().expect("store lock poisoned");
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = self.entries.read().expect("store lock poisoned");
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("currentUser").expect("get"), None);

        store.set("currentUser", "ada").expect("set");
        assert_eq!(store.get("currentUser").expect("get").as_deref(), Some("ada"));

        store.remove("currentUser").expect("remove");
        assert_eq!(store.get("currentUser").expect("get"), None);

        // removing twice is fine
        store.remove("currentUser").expect("remove again");
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").expect("set");
        assert_eq!(other.get("k").expect("get").as_deref(), Some("v"));
    }

    #[test]
    fn test_read_json_or_default_recovers_from_corruption() {
        let store = MemoryStore::with_entries([(keys::FAVORITES, "[not json")]);
        let favorites: Vec<String> = read_json_or_default(&store, keys::FAVORITES);
        assert!(favorites.is_empty());

        let missing: Vec<String> = read_json_or_default(&store, "absent");
        assert!(missing.is_empty());
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, keys::FAVORITES, &vec!["home", "munin"]).expect("write");
        let favorites: Vec<String> = read_json_or_default(&store, keys::FAVORITES);
        assert_eq!(favorites, vec!["home".to_string(), "munin".to_string()]);
    }

    #[test]
    fn test_key_helpers() {
        assert_eq!(keys::user_profile("ada"), "user_profile_ada");
        assert_eq!(keys::user_theme("ada"), "theme_ada");
        assert_eq!(keys::settings(None), "odin-la-science-settings");
        assert_eq!(keys::settings(Some("ada")), "odin-la-science-settings-ada");
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("nested").join("storage.json");

        {
            let store = FileStore::open(&path).expect("open store");
            store.set(keys::SELECTED_THEME, "dark").expect("set");
            store.set("scratch", "1").expect("set");
            store.remove("scratch").expect("remove");
        }

        let reopened = FileStore::open(&path).expect("reopen store");
        assert_eq!(
            reopened.get(keys::SELECTED_THEME).expect("get").as_deref(),
            Some("dark")
        );
        assert_eq!(reopened.keys().expect("keys"), vec![keys::SELECTED_THEME]);
    }

    #[test]
    fn test_file_store_failed_write_leaves_memory_unchanged() {
        let tmp = TempDir::new().expect("create temp dir");
        let dir = tmp.path().join("nested");
        let path = dir.join("storage.json");

        let store = FileStore::open(&path).expect("open store");
        store.set(keys::SELECTED_THEME, "dark").expect("set");

        // a plain file where the store's directory used to be
        fs::remove_dir_all(&dir).expect("remove store dir");
        fs::write(&dir, "blocker").expect("write blocker");

        assert!(matches!(
            store.set(keys::SELECTED_THEME, "ocean"),
            Err(StorageError::Io { .. })
        ));
        assert!(store.set("fresh", "1").is_err());
        assert!(store.remove(keys::SELECTED_THEME).is_err());

        assert_eq!(
            store.get(keys::SELECTED_THEME).expect("get").as_deref(),
            Some("dark")
        );
        assert_eq!(store.get("fresh").expect("get"), None);
        assert_eq!(store.keys().expect("keys"), vec![keys::SELECTED_THEME]);
    }

    #[test]
    fn test_file_store_rejects_corrupt_document() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("storage.json");
        fs::write(&path, "{\"a\": 1}").expect("write corrupt document");

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
