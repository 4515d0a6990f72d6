//! Recent palette searches.

use crate::error::Result;
use odin_core::{keys, read_json_or_default, write_json, KeyValueStore};
use tracing::debug;

/// Default number of remembered searches.
pub const DEFAULT_RECENT_CAP: usize = 10;

/// Recent search strings stored at `recentSearches`, most recent first.
#[derive(Debug, Clone)]
pub struct RecentSearches<S> {
    store: S,
    cap: usize,
}

impl<S: KeyValueStore> RecentSearches<S> {
    /// Create a list holding at most `cap` searches.
    #[must_use]
    pub fn new(store: S, cap: usize) -> Self {
        Self {
            store,
            cap: cap.max(1),
        }
    }

    /// Maximum number of searches kept.
    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Remembered searches, most recent first.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut searches: Vec<String> = read_json_or_default(&self.store, keys::RECENT_SEARCHES);
        searches.truncate(self.cap);
        searches
    }

    /// Remember a search. Blank queries are ignored; repeating a query moves
    /// it to the front.
    pub fn record(&self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let mut searches = self.list();
        searches.retain(|s| s != query);
        searches.insert(0, query.to_string());
        searches.truncate(self.cap);

        write_json(&self.store, keys::RECENT_SEARCHES, &searches)?;
        debug!(query, count = searches.len(), "recorded recent search");
        Ok(())
    }

    /// Forget all searches.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::RECENT_SEARCHES)?;
        Ok(())
    }
}
