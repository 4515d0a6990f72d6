//! Entity and property detail views.

use crate::{
    compare::{canonical_key, value_of},
    dataset::{CrossReference, DisciplineData, Entity, PropertyDefinition},
    error::{AtlasError, Result},
    render::render_text,
    routes::Route,
};
use odin_core::{DisciplineId, EntityId};
use serde::Serialize;
use serde_json::Value;

/// An entity with its cross references resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    /// The entity
    pub entity: Entity,
    /// Cross references in stored order
    pub related: Vec<RelatedEntity>,
}

/// One resolved cross reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    /// The stored reference
    pub reference: CrossReference,
    /// Target name, when the target was found
    pub name: Option<String>,
    /// Whether the target exists in the same discipline
    pub resolved: bool,
    /// Where the reference leads, when the ids are routable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// Look up an entity and resolve its cross references.
///
/// References into the same discipline are checked against the dataset;
/// unresolved ones are kept and flagged. References into another
/// discipline are routed but not checked.
pub fn entity_detail(
    discipline: &DisciplineId,
    data: &DisciplineData,
    entity_id: &str,
) -> Result<EntityDetail> {
    let entity = data.entity(entity_id).ok_or_else(|| AtlasError::EntityNotFound {
        discipline: discipline.to_string(),
        entity_id: entity_id.to_string(),
    })?;

    let related = entity
        .related_entities
        .iter()
        .map(|reference| {
            let target_discipline = reference
                .discipline
                .as_deref()
                .filter(|d| *d != discipline.as_str());

            let (name, resolved) = match target_discipline {
                None => match data.entity(&reference.entity_id) {
                    Some(target) => (Some(target.name.clone()), true),
                    None => (None, false),
                },
                Some(_) => (None, false),
            };

            let route = match target_discipline {
                None => Some(discipline.clone()),
                Some(other) => DisciplineId::new(other).ok(),
            }
            .zip(EntityId::new(reference.entity_id.as_str()).ok())
            .map(|(discipline, entity)| Route::Entity { discipline, entity }.to_string());

            RelatedEntity {
                reference: reference.clone(),
                name,
                resolved,
                route,
            }
        })
        .collect();

    Ok(EntityDetail {
        entity: entity.clone(),
        related,
    })
}

/// Entities sharing one value of a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueGroup {
    /// The shared value
    pub value: Value,
    /// Rendered form of the value
    pub rendered: String,
    /// Entity ids in dataset order
    pub entity_ids: Vec<String>,
}

/// One property across a whole discipline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    /// Property key
    pub key: String,
    /// Display label
    pub label: String,
    /// Definition, when the discipline declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<PropertyDefinition>,
    /// Distinct values in first-seen order
    pub groups: Vec<ValueGroup>,
    /// Entities without the property
    pub missing: Vec<String>,
}

/// Group a discipline's entities by their value of one property.
///
/// Values are grouped by structural equality.
pub fn property_detail(
    discipline: &DisciplineId,
    data: &DisciplineData,
    key: &str,
) -> Result<PropertyDetail> {
    let definition = data.property_definition(key).cloned();
    let mut groups: Vec<(String, ValueGroup)> = Vec::new();
    let mut missing = Vec::new();

    for entity in &data.entities {
        let value = value_of(entity, key);
        let Some(canonical) = canonical_key(value) else {
            missing.push(entity.id.clone());
            continue;
        };

        if let Some((_, group)) = groups.iter_mut().find(|(k, _)| *k == canonical) {
            group.entity_ids.push(entity.id.clone());
        } else {
            groups.push((
                canonical,
                ValueGroup {
                    value: value.cloned().unwrap_or(Value::Null),
                    rendered: render_text(value),
                    entity_ids: vec![entity.id.clone()],
                },
            ));
        }
    }

    if groups.is_empty() && definition.is_none() {
        return Err(AtlasError::PropertyNotFound {
            discipline: discipline.to_string(),
            property_id: key.to_string(),
        });
    }

    Ok(PropertyDetail {
        key: key.to_string(),
        label: data.property_label(key).to_string(),
        definition,
        groups: groups.into_iter().map(|(_, group)| group).collect(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn discipline() -> DisciplineId {
        DisciplineId::new("bacteriology").expect("valid discipline")
    }

    fn data() -> DisciplineData {
        serde_json::from_value(json!({
            "displayName": "Bacteriology",
            "entities": [
                {
                    "id": "E1", "name": "Staphylococcus",
                    "properties": {"GRAM": "+", "Media": {"b": 1, "a": 2}},
                    "relatedEntities": [
                        "E2",
                        {"entityId": "E7"},
                        {"discipline": "virology", "entityId": "phage-k", "relation": "infected by"}
                    ]
                },
                {"id": "E2", "name": "Escherichia", "properties": {"GRAM": {"value": "-"}, "Media": {"a": 2, "b": 1}}},
                {"id": "E3", "name": "Streptococcus", "properties": {"GRAM": "+"}}
            ],
            "properties": [{"id": "GRAM", "name": "Gram stain"}, {"id": "Toxin", "name": "Toxin"}]
        }))
        .expect("parse dataset")
    }

    #[test]
    fn test_entity_detail_resolves_related() {
        let detail = entity_detail(&discipline(), &data(), "E1").expect("detail");
        assert_eq!(detail.entity.name, "Staphylococcus");
        assert_eq!(detail.related.len(), 3);

        assert!(detail.related[0].resolved);
        assert_eq!(detail.related[0].name.as_deref(), Some("Escherichia"));
        assert_eq!(detail.related[0].route.as_deref(), Some("/munin/bacteriology/E2"));

        assert!(!detail.related[1].resolved);
        assert_eq!(detail.related[1].name, None);

        assert!(!detail.related[2].resolved);
        assert_eq!(detail.related[2].route.as_deref(), Some("/munin/virology/phage-k"));
    }

    #[test]
    fn test_entity_detail_not_found() {
        let err = entity_detail(&discipline(), &data(), "E9").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_property_detail_groups_values() {
        let detail = property_detail(&discipline(), &data(), "GRAM").expect("detail");
        assert_eq!(detail.label, "Gram stain");
        assert_eq!(detail.groups.len(), 2);
        assert_eq!(detail.groups[0].rendered, "+");
        assert_eq!(detail.groups[0].entity_ids, vec!["E1", "E3"]);
        assert_eq!(detail.groups[1].entity_ids, vec!["E2"]);
        assert!(detail.missing.is_empty());
    }

    #[test]
    fn test_property_detail_structural_grouping() {
        let detail = property_detail(&discipline(), &data(), "Media").expect("detail");
        assert_eq!(detail.groups.len(), 1);
        assert_eq!(detail.groups[0].entity_ids, vec!["E1", "E2"]);
        assert_eq!(detail.missing, vec!["E3"]);
    }

    #[test]
    fn test_property_detail_declared_but_unused() {
        let detail = property_detail(&discipline(), &data(), "Toxin").expect("detail");
        assert!(detail.groups.is_empty());
        assert_eq!(detail.missing.len(), 3);
    }

    #[test]
    fn test_property_detail_unknown() {
        let err = property_detail(&discipline(), &data(), "Nope").unwrap_err();
        assert!(matches!(err, AtlasError::PropertyNotFound { .. }));
    }
}
