//! Catalog and command palette commands.

use crate::error::CommandError;
use crate::state::AppState;
use odin_catalog::{search, CatalogEntry, Favorites, PaletteAction, PaletteKey, RecentSearches};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// One palette result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The entry
    #[serde(flatten)]
    pub entry: CatalogEntry,
    /// Whether the entry is a favorite
    pub favorite: bool,
}

/// Search the catalog the way the palette does.
pub fn search_catalog(state: &AppState, query: &str) -> Vec<SearchResult> {
    let favorites = Favorites::new(Arc::clone(&state.store)).ids();
    let results = search(
        state.registry.entries(),
        |module_id| state.access.has_access(module_id),
        query,
        &favorites,
    );

    results
        .into_iter()
        .map(|entry| SearchResult {
            favorite: favorites.contains(&entry.id),
            entry: entry.clone(),
        })
        .collect()
}

/// Open the palette, type `query`, press `keys` in order.
///
/// Returns the first action that leaves the palette, or
/// [`PaletteAction::None`] if it is still open afterwards.
pub fn run_palette(state: &AppState, query: &str, keys: &[PaletteKey]) -> PaletteAction {
    let mut palette = state.palette();
    palette.open();
    palette.set_query(query);

    for &key in keys {
        let action = palette.key(key);
        if action != PaletteAction::None {
            info!(query, ?action, "palette closed");
            return action;
        }
    }
    PaletteAction::None
}

/// Toggle a favorite. Returns whether the entry is now a favorite.
pub fn toggle_favorite(state: &AppState, entry_id: &str) -> Result<bool, CommandError> {
    state.registry.get(entry_id)?;
    let favorite = Favorites::new(Arc::clone(&state.store)).toggle(entry_id)?;
    info!(entry_id, favorite, "favorite toggled");
    Ok(favorite)
}

/// Favorite entries in the order they were added.
///
/// Ids that no longer name a registry entry are skipped.
pub fn list_favorites(state: &AppState) -> Vec<CatalogEntry> {
    Favorites::new(Arc::clone(&state.store))
        .list()
        .iter()
        .filter_map(|id| state.registry.get(id).ok().cloned())
        .collect()
}

/// Recent palette searches, most recent first.
pub fn recent_searches(state: &AppState) -> Vec<String> {
    RecentSearches::new(
        Arc::clone(&state.store),
        state.config.catalog.recent_searches_cap,
    )
    .list()
}

/// Forget recent searches.
pub fn clear_recent_searches(state: &AppState) -> Result<(), CommandError> {
    RecentSearches::new(
        Arc::clone(&state.store),
        state.config.catalog.recent_searches_cap,
    )
    .clear()?;
    Ok(())
}

/// Access decision for one module.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheck {
    /// Module checked
    pub module_id: String,
    /// Whether it is visible
    pub allowed: bool,
    /// Whether the user hid it
    pub hidden: bool,
}

/// Check whether the current user may see a module.
pub fn check_access(state: &AppState, module_id: &str) -> AccessCheck {
    let data = state.access.access_data();
    AccessCheck {
        module_id: module_id.to_string(),
        allowed: state.access.has_access(module_id),
        hidden: data.hidden_tools.contains(module_id),
    }
}

/// Hide a module from the current user's menus.
pub fn hide_tool(state: &AppState, module_id: &str) -> Result<(), CommandError> {
    state.access.hide_tool(module_id)?;
    Ok(())
}

/// Show a previously hidden module.
pub fn show_tool(state: &AppState, module_id: &str) -> Result<(), CommandError> {
    state.access.show_tool(module_id)?;
    Ok(())
}
