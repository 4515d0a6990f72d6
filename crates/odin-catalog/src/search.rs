//! Access-filtered catalog search.

use crate::entry::CatalogEntry;
use std::collections::BTreeSet;
use tracing::trace;

/// Filter and order catalog entries for the palette.
///
/// Keeps an entry when `access` allows its module id and, for a non-empty
/// query, when the label or category contains the query case-insensitively.
/// A non-empty query keeps registry order. An empty query moves favorites
/// ahead of the rest, keeping registry order within each group.
pub fn search<'a, F>(
    entries: &'a [CatalogEntry],
    access: F,
    query: &str,
    favorites: &BTreeSet<String>,
) -> Vec<&'a CatalogEntry>
where
    F: Fn(&str) -> bool,
{
    let needle = query.trim().to_lowercase();

    let matched = entries
        .iter()
        .filter(|entry| access(entry.module_id.as_str()))
        .filter(|entry| needle.is_empty() || entry.matches_lowercase(&needle));

    let results: Vec<&CatalogEntry> = if needle.is_empty() {
        let (mut favored, rest): (Vec<_>, Vec<_>) =
            matched.partition(|entry| favorites.contains(&entry.id));
        favored.extend(rest);
        favored
    } else {
        matched.collect()
    };

    trace!(query, results = results.len(), "catalog search");
    results
}
