//! Per-discipline browsing state: search, filters and comparison selection.

use crate::{
    compare::{compare, resolve_entities, CompareOutcome, MIN_COMPARE},
    dataset::{DisciplineData, Entity},
    render::render_text,
    routes::{parse_entities_param, Route},
};
use odin_core::{DisciplineId, EntityId};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default maximum number of entities selected for comparison.
pub const DEFAULT_COMPARE_CAP: usize = 4;

/// A `key = value` property filter.
///
/// Matches when the entity's rendered property value equals `value`,
/// ignoring case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    /// Property key
    pub key: String,
    /// Expected rendered value
    pub value: String,
}

impl PropertyFilter {
    /// Create a filter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether the entity passes this filter.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        let rendered = render_text(crate::compare::value_of(entity, &self.key));
        rendered.trim().to_lowercase() == self.value.trim().to_lowercase()
    }
}

impl FromStr for PropertyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty property key in '{s}'"));
        }
        Ok(Self::new(key, value.trim()))
    }
}

impl fmt::Display for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Where the user lands after removing an entity from a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterRemoval {
    /// At least two entities remain
    StayOnComparison(Route),
    /// Fewer than two remain; back to the unfiltered discipline view
    ExitToDiscipline(Route),
}

/// Browsing state of one loaded discipline.
#[derive(Debug, Clone)]
pub struct SelectionController {
    discipline: DisciplineId,
    data: Arc<DisciplineData>,
    search: String,
    category: Option<String>,
    property_filters: Vec<PropertyFilter>,
    selected: Vec<String>,
    cap: usize,
}

impl SelectionController {
    /// Create a controller with no search, filters or selection.
    ///
    /// The cap is raised to the comparison minimum if lower.
    #[must_use]
    pub fn new(discipline: DisciplineId, data: Arc<DisciplineData>, cap: usize) -> Self {
        Self {
            discipline,
            data,
            search: String::new(),
            category: None,
            property_filters: Vec::new(),
            selected: Vec::new(),
            cap: cap.max(MIN_COMPARE),
        }
    }

    /// Rebuild the state of a route.
    ///
    /// A comparison route restores its selection, dropping ids that no
    /// longer resolve and ids beyond the cap.
    #[must_use]
    pub fn from_route(route: &Route, data: Arc<DisciplineData>, cap: usize) -> Self {
        let mut controller = Self::new(route.discipline().clone(), data, cap);
        if let Route::Compare { entities, .. } = route {
            controller.restore_selection(entities);
        }
        controller
    }

    /// Discipline being browsed.
    #[must_use]
    pub fn discipline(&self) -> &DisciplineId {
        &self.discipline
    }

    /// The loaded dataset.
    #[must_use]
    pub fn data(&self) -> &DisciplineData {
        &self.data
    }

    /// Selection cap.
    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Set the search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Restrict to one category, or clear with `None`.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    /// Add a property filter, replacing any existing filter on the same key.
    pub fn add_property_filter(&mut self, filter: PropertyFilter) {
        self.property_filters.retain(|f| f.key != filter.key);
        self.property_filters.push(filter);
    }

    /// Remove the filter on a key.
    pub fn remove_property_filter(&mut self, key: &str) {
        self.property_filters.retain(|f| f.key != key);
    }

    /// Active property filters.
    #[must_use]
    pub fn property_filters(&self) -> &[PropertyFilter] {
        &self.property_filters
    }

    /// Drop search text, category and property filters. The selection is kept.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.category = None;
        self.property_filters.clear();
    }

    /// Entities passing search, category and property filters, in dataset
    /// order.
    #[must_use]
    pub fn visible_entities(&self) -> Vec<&Entity> {
        let needle = self.search.trim().to_lowercase();
        let visible: Vec<&Entity> = self
            .data
            .entities
            .iter()
            .filter(|entity| {
                needle.is_empty()
                    || entity.name.to_lowercase().contains(&needle)
                    || entity.category.to_lowercase().contains(&needle)
                    || entity.overview.to_lowercase().contains(&needle)
            })
            .filter(|entity| {
                self.category
                    .as_deref()
                    .map_or(true, |category| entity.category == category)
            })
            .filter(|entity| self.property_filters.iter().all(|f| f.matches(entity)))
            .collect();
        trace!(search = %self.search, visible = visible.len(), "filtered entities");
        visible
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Whether an entity is selected.
    #[must_use]
    pub fn is_selected(&self, entity_id: &str) -> bool {
        self.selected.iter().any(|id| id == entity_id)
    }

    /// Add an entity to the selection.
    ///
    /// Returns `false` when the id is unknown, already selected, cannot be
    /// carried in a route, or the cap is reached.
    pub fn select(&mut self, entity_id: &str) -> bool {
        if self.is_selected(entity_id) || self.data.entity(entity_id).is_none() {
            return false;
        }
        if EntityId::new(entity_id).is_err() {
            debug!(entity_id, "entity id cannot appear in a route");
            return false;
        }
        if self.selected.len() >= self.cap {
            debug!(entity_id, cap = self.cap, "selection cap reached");
            return false;
        }
        self.selected.push(entity_id.to_string());
        true
    }

    /// Remove an entity from the selection. Returns whether it was selected.
    pub fn deselect(&mut self, entity_id: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| id != entity_id);
        self.selected.len() != before
    }

    /// Select if unselected, deselect otherwise. Returns whether the entity
    /// is selected afterwards.
    pub fn toggle(&mut self, entity_id: &str) -> bool {
        if self.deselect(entity_id) {
            false
        } else {
            self.select(entity_id)
        }
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Replace the selection with ids from a URL, keeping those that resolve.
    pub fn restore_selection(&mut self, ids: &[EntityId]) {
        let resolved = resolve_entities(&self.data, ids);
        self.selected = resolved
            .into_iter()
            .take(self.cap)
            .map(|entity| entity.id.clone())
            .collect();
        debug!(
            requested = ids.len(),
            restored = self.selected.len(),
            "restored comparison selection"
        );
    }

    /// Restore the selection from a raw `entities=` value.
    pub fn restore_from_param(&mut self, value: &str) {
        self.restore_selection(&parse_entities_param(value));
    }

    fn route_entities(&self) -> Vec<EntityId> {
        self.selected
            .iter()
            .filter_map(|id| EntityId::new(id.as_str()).ok())
            .collect()
    }

    /// Whether enough entities are selected to compare.
    #[must_use]
    pub fn can_compare(&self) -> bool {
        self.route_entities().len() >= MIN_COMPARE
    }

    /// Comparison route for the selection, when it can be compared.
    #[must_use]
    pub fn compare_route(&self) -> Option<Route> {
        let entities = self.route_entities();
        if entities.len() < MIN_COMPARE {
            return None;
        }
        Some(Route::Compare {
            discipline: self.discipline.clone(),
            entities,
        })
    }

    /// Route to the unfiltered discipline view.
    #[must_use]
    pub fn discipline_route(&self) -> Route {
        Route::Discipline {
            discipline: self.discipline.clone(),
        }
    }

    /// Remove an entity while comparing.
    ///
    /// Dropping below two entities leaves the comparison: the selection is
    /// cleared and the discipline view is returned.
    pub fn remove_from_comparison(&mut self, entity_id: &str) -> AfterRemoval {
        self.deselect(entity_id);
        match self.compare_route() {
            Some(route) => AfterRemoval::StayOnComparison(route),
            None => {
                self.selected.clear();
                debug!(discipline = %self.discipline, "comparison exited");
                AfterRemoval::ExitToDiscipline(self.discipline_route())
            }
        }
    }

    /// Comparison of the current selection.
    #[must_use]
    pub fn comparison(&self) -> CompareOutcome {
        compare(&self.data, &self.selected)
    }
}
