//! Property tests for catalog search and favorites.

use odin_catalog::{builtin_registry, search, Favorites};
use odin_core::MemoryStore;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn query() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("lab".to_string()),
        Just("HUGIN".to_string()),
        Just("e".to_string()),
        "[a-zA-Z ]{1,6}",
    ]
}

proptest! {
    #[test]
    fn non_empty_query_is_registry_subsequence(
        query in query(),
        favorite_picks in prop::collection::vec(0usize..40, 0..6),
    ) {
        let registry = builtin_registry().expect("builtin registry");
        let entries = registry.entries();
        let favorites: BTreeSet<String> = favorite_picks
            .iter()
            .filter_map(|&i| entries.get(i).map(|e| e.id.clone()))
            .collect();

        let results = search(entries, |_| true, &query, &favorites);
        let positions: Vec<usize> = results
            .iter()
            .filter_map(|e| registry.position(&e.id))
            .collect();

        prop_assert_eq!(positions.len(), results.len());
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_query_keeps_membership(
        favorite_picks in prop::collection::vec(0usize..40, 0..6),
    ) {
        let registry = builtin_registry().expect("builtin registry");
        let entries = registry.entries();
        let favorites: BTreeSet<String> = favorite_picks
            .iter()
            .filter_map(|&i| entries.get(i).map(|e| e.id.clone()))
            .collect();

        let plain = search(entries, |_| true, "", &BTreeSet::new());
        let favored = search(entries, |_| true, "", &favorites);

        let plain_ids: BTreeSet<&str> = plain.iter().map(|e| e.id.as_str()).collect();
        let favored_ids: BTreeSet<&str> = favored.iter().map(|e| e.id.as_str()).collect();
        prop_assert_eq!(plain_ids, favored_ids);

        let lead = favorites.len();
        prop_assert!(favored[..lead].iter().all(|e| favorites.contains(&e.id)));
    }

    #[test]
    fn favorite_toggle_is_involution(
        initial in prop::collection::btree_set("[a-z]{1,6}", 0..5),
        target in "[a-z]{1,6}",
    ) {
        let favorites = Favorites::new(MemoryStore::new());
        for id in &initial {
            favorites.toggle(id).expect("seed");
        }
        let before = favorites.ids();

        favorites.toggle(&target).expect("toggle");
        favorites.toggle(&target).expect("toggle back");

        prop_assert_eq!(favorites.ids(), before);
    }
}
