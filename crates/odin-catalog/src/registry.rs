//! Ordered, immutable registry of catalog entries.

use crate::{
    advanced::AdvancedModule,
    entry::CatalogEntry,
    error::{CatalogError, Result},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// The full list of navigable destinations, in registry order.
///
/// Registry order is the construction order: static entries, then one entry
/// per advanced tool, then general pages. Search results never reorder it
/// except for the favorites partition.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    entries: Arc<[CatalogEntry]>,
    index: Arc<HashMap<String, usize>>,
}

impl CatalogRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> CatalogRegistryBuilder {
        CatalogRegistryBuilder::default()
    }

    /// Build a registry from already ordered entries.
    ///
    /// # Errors
    /// Returns error if an entry is invalid, an id repeats, or a non-public
    /// module id is shared by two entries.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut module_owner: HashMap<&str, &str> = HashMap::new();

        for (position, entry) in entries.iter().enumerate() {
            entry.validate()?;

            if index.insert(entry.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId {
                    entry_id: entry.id.clone(),
                });
            }

            if !entry.is_public() {
                if let Some(first) = module_owner.insert(entry.module_id.as_str(), &entry.id) {
                    return Err(CatalogError::DuplicateModule {
                        module_id: entry.module_id.to_string(),
                        first: first.to_string(),
                        second: entry.id.clone(),
                    });
                }
            }
        }

        info!(count = entries.len(), "built catalog registry");

        Ok(Self {
            entries: entries.into(),
            index: Arc::new(index),
        })
    }

    /// All entries in registry order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Get an entry by id.
    ///
    /// # Errors
    /// Returns error if the entry is not found.
    pub fn get(&self, entry_id: &str) -> Result<&CatalogEntry> {
        self.index
            .get(entry_id)
            .map(|&position| &self.entries[position])
            .ok_or_else(|| CatalogError::NotFound {
                entry_id: entry_id.to_string(),
            })
    }

    /// Registry position of an entry.
    #[must_use]
    pub fn position(&self, entry_id: &str) -> Option<usize> {
        self.index.get(entry_id).copied()
    }

    /// Check if an entry exists.
    #[must_use]
    pub fn contains(&self, entry_id: &str) -> bool {
        self.index.contains_key(entry_id)
    }

    /// Total number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Entries of one category, in registry order.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Entries gated by a module id.
    ///
    /// At most one entry unless `module_id` is `"any"`.
    #[must_use]
    pub fn by_module(&self, module_id: &str) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.module_id.as_str() == module_id)
            .collect()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for entry in self.entries.iter() {
            if !categories.contains(&entry.category.as_str()) {
                categories.push(&entry.category);
            }
        }
        categories
    }
}

/// Assembles a registry in its canonical group order.
#[derive(Debug, Default)]
pub struct CatalogRegistryBuilder {
    static_entries: Vec<CatalogEntry>,
    advanced_modules: Vec<AdvancedModule>,
    general_entries: Vec<CatalogEntry>,
}

impl CatalogRegistryBuilder {
    /// Entries listed first, grouped by functional area.
    #[must_use]
    pub fn static_entries(mut self, entries: Vec<CatalogEntry>) -> Self {
        self.static_entries.extend(entries);
        self
    }

    /// Advanced modules, each expanded to one entry per tool.
    #[must_use]
    pub fn advanced_modules(mut self, modules: Vec<AdvancedModule>) -> Self {
        self.advanced_modules.extend(modules);
        self
    }

    /// General and utility entries, listed last.
    #[must_use]
    pub fn general_entries(mut self, entries: Vec<CatalogEntry>) -> Self {
        self.general_entries.extend(entries);
        self
    }

    /// Expand and validate.
    ///
    /// # Errors
    /// Returns error if any registry invariant is violated.
    pub fn build(self) -> Result<CatalogRegistry> {
        let mut entries = self.static_entries;

        for module in &self.advanced_modules {
            let tools = module.catalog_entries()?;
            debug!(module = %module.id, tools = tools.len(), "expanded advanced module");
            entries.extend(tools);
        }

        entries.extend(self.general_entries);
        CatalogRegistry::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advanced::AdvancedTool;
    use crate::entry::ToolType;

    fn entry(id: &str, category: &str, module_id: &str) -> CatalogEntry {
        CatalogEntry::new(id, format!("Label {id}"), category, format!("/{id}"), module_id, "icon")
            .expect("valid entry")
    }

    #[test]
    fn test_registry_get_and_contains() {
        let registry = CatalogRegistry::from_entries(vec![entry("notebook", "Hugin", "hugin-notebook")])
            .expect("build registry");

        assert!(registry.contains("notebook"));
        assert_eq!(registry.get("notebook").expect("get").label, "Label notebook");
        assert!(matches!(
            registry.get("missing"),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = CatalogRegistry::from_entries(vec![
            entry("home", "General", "any"),
            entry("home", "General", "any"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId { .. })));
    }

    #[test]
    fn test_shared_module_rejected_except_any() {
        let shared = CatalogRegistry::from_entries(vec![
            entry("a", "X", "munin"),
            entry("b", "X", "munin"),
        ]);
        assert!(matches!(shared, Err(CatalogError::DuplicateModule { .. })));

        let public = CatalogRegistry::from_entries(vec![
            entry("home", "General", "any"),
            entry("help", "General", "any"),
        ])
        .expect("public pages may share the sentinel");
        assert_eq!(public.by_module("any").len(), 2);
    }

    #[test]
    fn test_builder_group_order() {
        let registry = CatalogRegistry::builder()
            .general_entries(vec![entry("home", "General", "any")])
            .advanced_modules(vec![AdvancedModule {
                id: "chemistry".to_string(),
                name: "Chemistry".to_string(),
                icon: "flask".to_string(),
                tools: vec![AdvancedTool {
                    id: "molarity".to_string(),
                    name: "Molarity".to_string(),
                    tool_type: ToolType::Calculator,
                    description: String::new(),
                }],
            }])
            .static_entries(vec![entry("notebook", "Hugin", "hugin-notebook")])
            .build()
            .expect("build registry");

        let ids: Vec<&str> = registry.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["notebook", "adv-chemistry-molarity", "home"]);
        assert_eq!(registry.position("home"), Some(2));
    }

    #[test]
    fn test_categories_first_seen_order() {
        let registry = CatalogRegistry::from_entries(vec![
            entry("a", "Hugin", "m-a"),
            entry("b", "Munin", "m-b"),
            entry("c", "Hugin", "m-c"),
        ])
        .expect("build registry");

        assert_eq!(registry.categories(), vec!["Hugin", "Munin"]);
        assert_eq!(registry.by_category("Hugin").len(), 2);
    }
}
