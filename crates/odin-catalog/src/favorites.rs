//! Persisted favorite catalog entries.

use crate::error::Result;
use odin_core::{keys, read_json_or_default, write_json, KeyValueStore};
use std::collections::BTreeSet;
use tracing::debug;

/// Favorite entry ids stored at `ols_favorites`.
///
/// The persisted form is a JSON array in insertion order. Reads always go to
/// the store; a corrupt array reads as no favorites.
#[derive(Debug, Clone)]
pub struct Favorites<S> {
    store: S,
}

impl<S: KeyValueStore> Favorites<S> {
    /// Create a favorites view over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<String> {
        read_json_or_default(&self.store, keys::FAVORITES)
    }

    /// Current favorite ids in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.load()
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    /// Current favorite ids as a set.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<String> {
        self.load().into_iter().collect()
    }

    /// Whether an entry is a favorite.
    #[must_use]
    pub fn is_favorite(&self, entry_id: &str) -> bool {
        self.load().iter().any(|id| id == entry_id)
    }

    /// Add the entry if absent, remove it if present.
    ///
    /// Returns whether the entry is a favorite afterwards.
    pub fn toggle(&self, entry_id: &str) -> Result<bool> {
        let mut favorites = self.list();
        let now_favorite = if let Some(pos) = favorites.iter().position(|id| id == entry_id) {
            favorites.remove(pos);
            false
        } else {
            favorites.push(entry_id.to_string());
            true
        };

        write_json(&self.store, keys::FAVORITES, &favorites)?;
        debug!(entry_id, favorite = now_favorite, "favorite toggled");
        Ok(now_favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odin_core::MemoryStore;

    #[test]
    fn test_toggle_adds_then_removes() {
        let favorites = Favorites::new(MemoryStore::new());
        assert!(!favorites.is_favorite("home"));

        assert!(favorites.toggle("home").expect("toggle"));
        assert!(favorites.is_favorite("home"));

        assert!(!favorites.toggle("home").expect("toggle"));
        assert!(!favorites.is_favorite("home"));
        assert!(favorites.ids().is_empty());
    }

    #[test]
    fn test_persisted_as_json_array() {
        let store = MemoryStore::new();
        let favorites = Favorites::new(store.clone());
        favorites.toggle("munin").expect("toggle");
        favorites.toggle("home").expect("toggle");

        let raw = store.get(keys::FAVORITES).expect("get").expect("stored");
        assert_eq!(raw, r#"["munin","home"]"#);
    }

    #[test]
    fn test_corrupt_favorites_read_as_empty() {
        let store = MemoryStore::with_entries([(keys::FAVORITES, "{oops")]);
        let favorites = Favorites::new(store);
        assert!(favorites.ids().is_empty());

        // toggling repairs the stored value
        assert!(favorites.toggle("home").expect("toggle"));
        assert_eq!(favorites.list(), vec!["home".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_collapse() {
        let store = MemoryStore::with_entries([(keys::FAVORITES, r#"["a","b","a"]"#)]);
        let favorites = Favorites::new(store);
        assert_eq!(favorites.list(), vec!["a".to_string(), "b".to_string()]);

        assert!(!favorites.toggle("a").expect("toggle"));
        assert!(!favorites.is_favorite("a"));
    }
}
