//! Command palette state machine.
//!
//! The palette owns the query text, the filtered result list and the
//! keyboard selection. Results are recomputed synchronously on every input
//! event from the registry, the access predicate and the stored favorites.

use crate::{
    entry::CatalogEntry, favorites::Favorites, recent::RecentSearches, registry::CatalogRegistry,
    search::search, Result,
};
use odin_core::KeyValueStore;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Module visibility check used to filter results.
pub type AccessPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Keys the palette reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKey {
    /// Move the selection up, wrapping to the last result
    ArrowUp,
    /// Move the selection down, wrapping to the first result
    ArrowDown,
    /// Activate the selected result
    Enter,
    /// Close the palette
    Escape,
}

/// Effect of an input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PaletteAction {
    /// Nothing to do outside the palette
    None,
    /// The palette closed without navigating
    Closed,
    /// Navigate to an entry; the palette is closed
    #[serde(rename_all = "camelCase")]
    Navigate {
        /// Activated entry
        entry_id: String,
        /// Navigation target
        path: String,
    },
}

/// Interactive search over the catalog.
pub struct CommandPalette<S> {
    registry: CatalogRegistry,
    favorites: Favorites<S>,
    recent: RecentSearches<S>,
    access: AccessPredicate,
    open: bool,
    input_focused: bool,
    query: String,
    selected_index: usize,
    results: Vec<usize>,
}

impl<S> fmt::Debug for CommandPalette<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPalette")
            .field("open", &self.open)
            .field("query", &self.query)
            .field("selected_index", &self.selected_index)
            .field("results", &self.results.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore + Clone> CommandPalette<S> {
    /// Create a closed palette.
    pub fn new(
        registry: CatalogRegistry,
        store: S,
        recent_cap: usize,
        access: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            registry,
            favorites: Favorites::new(store.clone()),
            recent: RecentSearches::new(store, recent_cap),
            access: Box::new(access),
            open: false,
            input_focused: false,
            query: String::new(),
            selected_index: 0,
            results: Vec::new(),
        }
    }

    /// Open the palette with an empty query and the first result selected.
    pub fn open(&mut self) {
        self.open = true;
        self.input_focused = true;
        self.query.clear();
        self.selected_index = 0;
        self.refresh();
        debug!(results = self.results.len(), "palette opened");
    }

    /// Close the palette.
    pub fn close(&mut self) {
        self.open = false;
        self.input_focused = false;
    }

    /// Clicking outside the palette closes it.
    pub fn click_outside(&mut self) -> PaletteAction {
        if !self.open {
            return PaletteAction::None;
        }
        self.close();
        PaletteAction::Closed
    }

    /// Whether the palette is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the search input holds focus.
    #[must_use]
    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Index of the highlighted result.
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Replace the query text. Resets the selection to the first result.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected_index = 0;
        self.refresh();
    }

    /// Visible results in display order.
    #[must_use]
    pub fn results(&self) -> Vec<&CatalogEntry> {
        let entries = self.registry.entries();
        self.results.iter().map(|&i| &entries[i]).collect()
    }

    /// The highlighted result, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&CatalogEntry> {
        self.results
            .get(self.selected_index)
            .map(|&i| &self.registry.entries()[i])
    }

    /// Handle a key press.
    pub fn key(&mut self, key: PaletteKey) -> PaletteAction {
        if !self.open {
            return PaletteAction::None;
        }

        let len = self.results.len();
        match key {
            PaletteKey::ArrowDown => {
                if len > 0 {
                    self.selected_index = (self.selected_index + 1) % len;
                }
                PaletteAction::None
            }
            PaletteKey::ArrowUp => {
                if len > 0 {
                    self.selected_index = (self.selected_index + len - 1) % len;
                }
                PaletteAction::None
            }
            PaletteKey::Enter => self.activate(self.selected_index),
            PaletteKey::Escape => {
                self.close();
                PaletteAction::Closed
            }
        }
    }

    /// Activate the result at `index`, as by a click.
    pub fn activate(&mut self, index: usize) -> PaletteAction {
        let Some(entry) = self.results.get(index).map(|&i| &self.registry.entries()[i]) else {
            return PaletteAction::None;
        };
        let action = PaletteAction::Navigate {
            entry_id: entry.id.clone(),
            path: entry.path.clone(),
        };

        if let Err(e) = self.recent.record(&self.query) {
            warn!(error = %e, "failed to record recent search");
        }
        debug!(?action, "palette activated");
        self.close();
        action
    }

    /// Toggle an entry's favorite status.
    ///
    /// The result set keeps its membership and the same entry stays
    /// highlighted; only the favorites-first order of an empty query can
    /// change. Focus stays on the search input.
    pub fn toggle_favorite(&mut self, entry_id: &str) -> Result<bool> {
        let highlighted = self.results.get(self.selected_index).copied();
        let favorite = self.favorites.toggle(entry_id)?;
        self.refresh();

        if let Some(pos) = highlighted.and_then(|h| self.results.iter().position(|&i| i == h)) {
            self.selected_index = pos;
        }
        Ok(favorite)
    }

    /// Whether an entry is a favorite.
    #[must_use]
    pub fn is_favorite(&self, entry_id: &str) -> bool {
        self.favorites.is_favorite(entry_id)
    }

    /// Recent searches, most recent first.
    #[must_use]
    pub fn recent_searches(&self) -> Vec<String> {
        self.recent.list()
    }

    fn refresh(&mut self) {
        let favorites = self.favorites.ids();
        let results = search(self.registry.entries(), &self.access, &self.query, &favorites);
        self.results = results
            .iter()
            .filter_map(|entry| self.registry.position(&entry.id))
            .collect();

        if self.selected_index >= self.results.len() {
            self.selected_index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odin_core::MemoryStore;

    fn registry() -> CatalogRegistry {
        let entries = [
            ("notebook", "Lab Notebook", "Hugin Lab", "hugin-notebook"),
            ("inventory", "Inventory", "Hugin Lab", "hugin-inventory"),
            ("home", "Home", "General", "any"),
        ]
        .into_iter()
        .map(|(id, label, category, module)| {
            CatalogEntry::new(id, label, category, format!("/{id}"), module, "icon")
                .expect("valid entry")
        })
        .collect();
        CatalogRegistry::from_entries(entries).expect("build registry")
    }

    fn palette() -> CommandPalette<MemoryStore> {
        let mut palette = CommandPalette::new(registry(), MemoryStore::new(), 10, |_| true);
        palette.open();
        palette
    }

    #[test]
    fn test_open_resets_state() {
        let mut palette = palette();
        palette.set_query("inv");
        palette.close();
        palette.open();

        assert!(palette.is_open());
        assert!(palette.input_focused());
        assert_eq!(palette.query(), "");
        assert_eq!(palette.selected_index(), 0);
        assert_eq!(palette.results().len(), 3);
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let mut palette = palette();
        palette.key(PaletteKey::ArrowUp);
        assert_eq!(palette.selected_index(), 2);
        palette.key(PaletteKey::ArrowDown);
        assert_eq!(palette.selected_index(), 0);
        palette.key(PaletteKey::ArrowDown);
        palette.key(PaletteKey::ArrowDown);
        palette.key(PaletteKey::ArrowDown);
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn test_typing_resets_selection() {
        let mut palette = palette();
        palette.key(PaletteKey::ArrowDown);
        palette.set_query("lab");
        assert_eq!(palette.selected_index(), 0);
        assert_eq!(palette.results().len(), 2);
    }

    #[test]
    fn test_enter_navigates_and_records_search() {
        let mut palette = palette();
        palette.set_query("inv");
        let action = palette.key(PaletteKey::Enter);

        assert_eq!(
            action,
            PaletteAction::Navigate {
                entry_id: "inventory".to_string(),
                path: "/inventory".to_string(),
            }
        );
        assert!(!palette.is_open());
        assert_eq!(palette.recent_searches(), vec!["inv".to_string()]);
    }

    #[test]
    fn test_enter_with_no_results_does_nothing() {
        let mut palette = palette();
        palette.set_query("nothing matches");
        palette.key(PaletteKey::ArrowDown);
        assert_eq!(palette.key(PaletteKey::Enter), PaletteAction::None);
        assert!(palette.is_open());
    }

    #[test]
    fn test_escape_and_outside_click_close() {
        let mut palette = palette();
        assert_eq!(palette.key(PaletteKey::Escape), PaletteAction::Closed);
        assert!(!palette.is_open());
        assert_eq!(palette.key(PaletteKey::Escape), PaletteAction::None);

        palette.open();
        assert_eq!(palette.click_outside(), PaletteAction::Closed);
        assert!(!palette.is_open());
    }

    #[test]
    fn test_toggle_favorite_keeps_membership_and_focus() {
        let mut palette = palette();
        palette.key(PaletteKey::ArrowDown);
        palette.key(PaletteKey::ArrowDown);
        assert_eq!(palette.selected().map(|e| e.id.as_str()), Some("home"));

        assert!(palette.toggle_favorite("home").expect("toggle"));

        let ids: Vec<&str> = palette.results().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "notebook", "inventory"]);
        assert_eq!(palette.selected().map(|e| e.id.as_str()), Some("home"));
        assert!(palette.input_focused());
        assert!(palette.is_open());
    }

    #[test]
    fn test_toggle_favorite_with_query_keeps_order() {
        let mut palette = palette();
        palette.set_query("hugin");
        palette.toggle_favorite("inventory").expect("toggle");

        let ids: Vec<&str> = palette.results().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["notebook", "inventory"]);
    }

    #[test]
    fn test_access_predicate_filters_results() {
        let mut palette = CommandPalette::new(registry(), MemoryStore::new(), 10, |m| m == "any");
        palette.open();
        let ids: Vec<&str> = palette.results().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["home"]);
    }
}
