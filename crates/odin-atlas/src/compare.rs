//! Entity comparison.
//!
//! Entities of one discipline do not share a schema, so a comparison first
//! takes the union of their property keys and additional-info sections, in
//! first-seen order, then classifies every resulting row as identical or
//! differing across the selection. Equality is structural: values are
//! canonicalized (object keys sorted, numbers as `f64`, recursively) before
//! comparing.

use crate::dataset::{DisciplineData, Entity, PropertyDefinition};
use crate::render::{render, RenderedCell};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Fewest entities a comparison renders with.
pub const MIN_COMPARE: usize = 2;

/// Union of property keys, first-seen order across entities.
#[must_use]
pub fn union_keys<'a>(entities: &[&'a Entity]) -> Vec<&'a str> {
    first_seen(
        entities
            .iter()
            .copied()
            .flat_map(|entity| entity.properties.keys()),
    )
}

/// Union of additional-info section names, first-seen order across entities.
#[must_use]
pub fn union_sections<'a>(entities: &[&'a Entity]) -> Vec<&'a str> {
    first_seen(
        entities
            .iter()
            .copied()
            .flat_map(|entity| entity.additional_info.keys().map(String::as_str)),
    )
}

fn first_seen<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    keys.filter(|key| seen.insert(*key)).collect()
}

/// Compared value of a property: structured properties unwrap to their
/// `value`, `null` and missing keys are absent.
#[must_use]
pub fn value_of<'a>(entity: &'a Entity, key: &str) -> Option<&'a Value> {
    entity
        .property(key)
        .map(crate::dataset::PropertyValue::value)
        .filter(|value| !value.is_null())
}

/// Value of an additional-info section, absent when missing or `null`.
#[must_use]
pub fn section_of<'a>(entity: &'a Entity, section: &str) -> Option<&'a Value> {
    entity.section(section).filter(|value| !value.is_null())
}

fn overview_of(entity: &Entity) -> Option<Value> {
    let overview = entity.overview.trim();
    (!overview.is_empty()).then(|| Value::String(overview.to_string()))
}

/// Copy of `value` with every object's keys sorted and every number as an
/// `f64`, recursively, so `37` and `37.0` compare equal.
///
/// Array order is kept.
#[must_use]
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Number(number) => number
            .as_f64()
            .and_then(Number::from_f64)
            .map_or_else(|| value.clone(), Value::Number),
        other => other.clone(),
    }
}

/// Canonical text of a possibly absent value; equal texts mean equal values.
#[must_use]
pub fn canonical_key(value: Option<&Value>) -> Option<String> {
    value.map(|v| canonicalize(v).to_string())
}

fn all_equal<'a>(values: impl IntoIterator<Item = Option<&'a Value>>) -> bool {
    let mut keys = values.into_iter().map(canonical_key);
    match keys.next() {
        Some(first) => keys.all(|key| key == first),
        None => true,
    }
}

/// Whether every entity holds the same value for `key`.
///
/// Missing on all counts as identical. Vacuously true for fewer than two
/// entities.
#[must_use]
pub fn is_identical(entities: &[&Entity], key: &str) -> bool {
    all_equal(entities.iter().map(|entity| value_of(entity, key)))
}

/// Whether every entity holds the same additional-info section.
#[must_use]
pub fn is_section_identical(entities: &[&Entity], section: &str) -> bool {
    all_equal(entities.iter().map(|entity| section_of(entity, section)))
}

/// Row filter shared by every row family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Every row
    #[default]
    All,
    /// Only rows whose values differ
    DiffOnly,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "diff" | "diff-only" | "diffonly" | "differences" => Ok(Self::DiffOnly),
            other => Err(format!("unknown filter mode '{other}', expected 'all' or 'diff-only'")),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::DiffOnly => write!(f, "diff-only"),
        }
    }
}

/// Family a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    /// The overview pseudo-row
    Overview,
    /// One property key
    Property,
    /// One additional-info section
    Section,
}

/// One key-aligned row of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    /// Row family
    pub kind: RowKind,
    /// Property key or section name
    pub key: String,
    /// Display label
    pub label: String,
    /// One value per entity, in selection order
    pub values: Vec<Option<Value>>,
    /// Whether all values are structurally equal
    pub identical: bool,
}

impl ComparisonRow {
    fn new(kind: RowKind, key: &str, label: &str, values: Vec<Option<Value>>) -> Self {
        let identical = all_equal(values.iter().map(Option::as_ref));
        Self {
            kind,
            key: key.to_string(),
            label: label.to_string(),
            values,
            identical,
        }
    }

    /// Rendered cells in selection order.
    #[must_use]
    pub fn cells(&self) -> Vec<RenderedCell> {
        self.values.iter().map(|value| render(value.as_ref())).collect()
    }
}

/// Keep the rows `mode` lets through, in order.
pub fn filter_rows<'a>(
    mode: FilterMode,
    rows: impl IntoIterator<Item = &'a ComparisonRow>,
) -> Vec<&'a ComparisonRow> {
    rows.into_iter()
        .filter(|row| match mode {
            FilterMode::All => true,
            FilterMode::DiffOnly => !row.identical,
        })
        .collect()
}

/// Column header of one compared entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    /// Entity id
    pub id: String,
    /// Entity name
    pub name: String,
    /// Entity category
    pub category: String,
}

/// Row counts of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    /// All rows, header excluded
    pub rows: usize,
    /// Rows whose values agree
    pub identical: usize,
    /// Rows whose values differ
    pub differing: usize,
}

/// A complete comparison of a selection.
///
/// The header is always present; the overview, property and section rows
/// go through [`filter_rows`] with the same mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    /// One header cell per entity, in selection order
    pub header: Vec<HeaderCell>,
    /// Overview pseudo-row
    pub overview: ComparisonRow,
    /// One row per key of [`union_keys`]
    pub properties: Vec<ComparisonRow>,
    /// One row per section of [`union_sections`]
    pub sections: Vec<ComparisonRow>,
}

impl ComparisonView {
    /// Build the view for entities in selection order.
    ///
    /// Property rows are labelled with the matching definition's name, or
    /// the raw key when none matches.
    #[must_use]
    pub fn build(entities: &[&Entity], definitions: &[PropertyDefinition]) -> Self {
        let header = entities
            .iter()
            .map(|entity| HeaderCell {
                id: entity.id.clone(),
                name: entity.name.clone(),
                category: entity.category.clone(),
            })
            .collect();

        let overview = ComparisonRow::new(
            RowKind::Overview,
            "overview",
            "Overview",
            entities.iter().map(|entity| overview_of(entity)).collect(),
        );

        let properties = union_keys(entities)
            .into_iter()
            .map(|key| {
                let label = definitions
                    .iter()
                    .find(|def| def.id == key)
                    .map_or(key, |def| def.name.as_str());
                ComparisonRow::new(
                    RowKind::Property,
                    key,
                    label,
                    entities
                        .iter()
                        .map(|entity| value_of(entity, key).cloned())
                        .collect(),
                )
            })
            .collect();

        let sections = union_sections(entities)
            .into_iter()
            .map(|section| {
                ComparisonRow::new(
                    RowKind::Section,
                    section,
                    section,
                    entities
                        .iter()
                        .map(|entity| section_of(entity, section).cloned())
                        .collect(),
                )
            })
            .collect();

        let view = Self {
            header,
            overview,
            properties,
            sections,
        };
        debug!(
            entities = view.header.len(),
            properties = view.properties.len(),
            sections = view.sections.len(),
            "built comparison"
        );
        view
    }

    /// All rows in display order: overview, properties, sections.
    pub fn rows(&self) -> impl Iterator<Item = &ComparisonRow> {
        std::iter::once(&self.overview)
            .chain(self.properties.iter())
            .chain(self.sections.iter())
    }

    /// Rows shown under `mode`.
    #[must_use]
    pub fn visible_rows(&self, mode: FilterMode) -> Vec<&ComparisonRow> {
        filter_rows(mode, self.rows())
    }

    /// Visible rows of one family.
    #[must_use]
    pub fn visible_rows_of(&self, kind: RowKind, mode: FilterMode) -> Vec<&ComparisonRow> {
        filter_rows(mode, self.rows().filter(|row| row.kind == kind))
    }

    /// Compared entity ids in selection order.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<&str> {
        self.header.iter().map(|cell| cell.id.as_str()).collect()
    }

    /// Identical and differing row counts.
    #[must_use]
    pub fn summary(&self) -> ComparisonSummary {
        let rows = self.rows().count();
        let identical = self.rows().filter(|row| row.identical).count();
        ComparisonSummary {
            rows,
            identical,
            differing: rows - identical,
        }
    }
}

/// Result of asking for a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CompareOutcome {
    /// Fewer than two ids resolved; same as no comparison requested
    #[serde(rename_all = "camelCase")]
    Unavailable {
        /// Ids that did resolve
        resolved: Vec<String>,
    },
    /// Comparison of the resolved entities
    Ready(ComparisonView),
}

impl CompareOutcome {
    /// The comparison, when one is available.
    #[must_use]
    pub fn view(&self) -> Option<&ComparisonView> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Resolve ids against a dataset, keeping order and dropping repeats and
/// ids with no entity.
#[must_use]
pub fn resolve_entities<'a, S: AsRef<str>>(data: &'a DisciplineData, ids: &[S]) -> Vec<&'a Entity> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(AsRef::<str>::as_ref)
        .filter(|id| seen.insert(*id))
        .filter_map(|id| {
            let entity = data.entity(id);
            if entity.is_none() {
                debug!(entity_id = id, "dropping unresolved comparison id");
            }
            entity
        })
        .collect()
}

/// Compare entities by id.
///
/// Unresolved ids are dropped silently; fewer than two resolved entities
/// yields [`CompareOutcome::Unavailable`].
#[must_use]
pub fn compare<S: AsRef<str>>(data: &DisciplineData, ids: &[S]) -> CompareOutcome {
    let entities = resolve_entities(data, ids);
    if entities.len() < MIN_COMPARE {
        return CompareOutcome::Unavailable {
            resolved: entities.iter().map(|entity| entity.id.clone()).collect(),
        };
    }
    CompareOutcome::Ready(ComparisonView::build(&entities, &data.properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(id: &str, properties: Value) -> Entity {
        serde_json::from_value(json!({"id": id, "name": id, "properties": properties}))
            .expect("parse entity")
    }

    fn bacteriology() -> DisciplineData {
        serde_json::from_value(json!({
            "displayName": "Bacteriology",
            "entities": [
                {"id": "E1", "name": "E1", "overview": "Coccus", "properties": {"GRAM": "+"}},
                {"id": "E2", "name": "E2", "overview": "Rod", "properties": {"GRAM": "-"}},
                {"id": "E3", "name": "E3", "overview": "Coccus", "properties": {"GRAM": "+"}}
            ],
            "properties": [{"id": "GRAM", "name": "Gram stain"}]
        }))
        .expect("parse dataset")
    }

    #[test]
    fn test_union_keys_first_seen_order() {
        let a = entity("a", json!({"x": 1, "y": 2}));
        let b = entity("b", json!({"z": 3, "x": 4}));
        let c = entity("c", json!({"w": 5, "y": 6}));

        assert_eq!(union_keys(&[&a, &b, &c]), vec!["x", "y", "z", "w"]);
        assert_eq!(union_keys(&[&b, &a]), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_union_sections() {
        let mut a = entity("a", json!({}));
        a.additional_info.insert("Habitat".to_string(), json!("soil"));
        let mut b = entity("b", json!({}));
        b.additional_info.insert("Uses".to_string(), json!(["food"]));
        b.additional_info.insert("Habitat".to_string(), json!("gut"));

        assert_eq!(union_sections(&[&a, &b]), vec!["Habitat", "Uses"]);
    }

    #[test]
    fn test_value_of_unwraps_structured() {
        let e = entity(
            "a",
            json!({"Shape": {"value": "rod", "description": "elongated"}, "GRAM": "-", "Gone": null}),
        );
        assert_eq!(value_of(&e, "Shape"), Some(&json!("rod")));
        assert_eq!(value_of(&e, "GRAM"), Some(&json!("-")));
        assert_eq!(value_of(&e, "Gone"), None);
        assert_eq!(value_of(&e, "Missing"), None);
    }

    #[test]
    fn test_is_identical_structural_and_order_independent() {
        let a = entity("a", json!({"m": {"a": 1, "b": 2}}));
        let b = entity("b", json!({"m": {"b": 2, "a": 1}}));
        assert!(is_identical(&[&a, &b], "m"));

        let c = entity("c", json!({"m": {"a": 1, "b": 3}}));
        assert!(!is_identical(&[&a, &c], "m"));
    }

    #[test]
    fn test_is_identical_unwrapped_against_plain() {
        let a = entity("a", json!({"GRAM": {"value": "+", "link": "https://example.org"}}));
        let b = entity("b", json!({"GRAM": "+"}));
        assert!(is_identical(&[&a, &b], "GRAM"));
    }

    #[test]
    fn test_is_identical_absent_vs_present() {
        let a = entity("a", json!({"GRAM": "+"}));
        let b = entity("b", json!({}));
        assert!(!is_identical(&[&a, &b], "GRAM"));
        assert!(is_identical(&[&a, &b], "Nobody"));
    }

    #[test]
    fn test_is_identical_degenerate_selections() {
        let a = entity("a", json!({"GRAM": "+"}));
        assert!(is_identical(&[], "GRAM"));
        assert!(is_identical(&[&a], "GRAM"));
        assert!(is_identical(&[&a, &a], "GRAM"));
    }

    #[test]
    fn test_list_order_matters() {
        let a = entity("a", json!({"l": ["x", "y"]}));
        let b = entity("b", json!({"l": ["y", "x"]}));
        assert!(!is_identical(&[&a, &b], "l"));
    }

    #[test]
    fn test_canonicalize_sorts_nested_keys() {
        let value = json!({"b": {"d": 1, "c": 2}, "a": [{"f": 1, "e": 2}]});
        assert_eq!(
            canonicalize(&value).to_string(),
            r#"{"a":[{"e":2.0,"f":1.0}],"b":{"c":2.0,"d":1.0}}"#
        );
    }

    #[test]
    fn test_integer_and_float_spellings_are_identical() {
        let a = entity("a", json!({"t": 37, "nested": {"mic": [1, 2]}}));
        let b = entity("b", json!({"t": 37.0, "nested": {"mic": [1.0, 2.0]}}));
        assert!(is_identical(&[&a, &b], "t"));
        assert!(is_identical(&[&a, &b], "nested"));

        let c = entity("c", json!({"t": 37.5}));
        assert!(!is_identical(&[&a, &c], "t"));
    }

    #[test]
    fn test_structured_property_with_extra_fields_unwraps() {
        let a = entity("a", json!({"Shape": {"value": "rod", "unit": "um"}}));
        let b = entity("b", json!({"Shape": "rod"}));
        assert_eq!(value_of(&a, "Shape"), Some(&json!("rod")));
        assert!(is_identical(&[&a, &b], "Shape"));
    }

    #[test]
    fn test_diff_only_shows_differing_gram() {
        let data = bacteriology();
        let outcome = compare(&data, &["E1", "E2"]);
        let view = outcome.view().expect("comparison available");

        let rows = view.visible_rows_of(RowKind::Property, FilterMode::DiffOnly);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "GRAM");
        assert_eq!(rows[0].label, "Gram stain");
        assert!(!rows[0].identical);
    }

    #[test]
    fn test_diff_only_hides_identical_but_keeps_header() {
        let data = bacteriology();
        let outcome = compare(&data, &["E1", "E3"]);
        let view = outcome.view().expect("comparison available");

        assert!(view
            .visible_rows_of(RowKind::Property, FilterMode::DiffOnly)
            .is_empty());
        assert!(view.visible_rows(FilterMode::DiffOnly).is_empty());
        assert_eq!(view.entity_ids(), vec!["E1", "E3"]);
        assert_eq!(view.visible_rows(FilterMode::All).len(), 2);
    }

    #[test]
    fn test_filter_applies_to_overview_and_sections() {
        let data = bacteriology();
        let view = ComparisonView::build(
            &[
                data.entity("E1").expect("E1"),
                data.entity("E2").expect("E2"),
            ],
            &data.properties,
        );

        let diff = view.visible_rows(FilterMode::DiffOnly);
        assert_eq!(diff[0].kind, RowKind::Overview);

        let summary = view.summary();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.differing, 2);
        assert_eq!(summary.identical, 0);
    }

    #[test]
    fn test_stale_id_leaves_comparison_unavailable() {
        let data = bacteriology();
        let outcome = compare(&data, &["E1", "E9"]);
        assert_eq!(
            outcome,
            CompareOutcome::Unavailable {
                resolved: vec!["E1".to_string()]
            }
        );
    }

    #[test]
    fn test_repeated_ids_collapse() {
        let data = bacteriology();
        assert!(matches!(
            compare(&data, &["E1", "E1"]),
            CompareOutcome::Unavailable { .. }
        ));
    }

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!("diff".parse::<FilterMode>(), Ok(FilterMode::DiffOnly));
        assert_eq!("ALL".parse::<FilterMode>(), Ok(FilterMode::All));
        assert!("some".parse::<FilterMode>().is_err());
        assert_eq!(FilterMode::DiffOnly.to_string(), "diff-only");
    }

    #[test]
    fn test_cells_render_placeholder() {
        let a = entity("a", json!({"GRAM": "+"}));
        let b = entity("b", json!({}));
        let view = ComparisonView::build(&[&a, &b], &[]);
        let cells = view.properties[0].cells();
        assert_eq!(cells[0], RenderedCell::Literal("+".to_string()));
        assert!(cells[1].is_placeholder());
    }
}
