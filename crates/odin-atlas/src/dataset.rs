//! Discipline dataset model.
//!
//! Entities carry schema-less property bags: the set of keys varies from one
//! entity to the next, so values are kept as [`serde_json::Value`] and bags
//! keep their authoring order.

use odin_core::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loaded discipline: its entities and the properties they may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineData {
    /// Name shown in headers
    pub display_name: String,

    /// Short description of the discipline
    #[serde(default)]
    pub description: String,

    /// Entities in authoring order
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Known property definitions
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl DisciplineData {
    /// Look up an entity by id.
    #[must_use]
    pub fn entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == entity_id)
    }

    /// Look up a property definition by id.
    #[must_use]
    pub fn property_definition(&self, property_id: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|def| def.id == property_id)
    }

    /// Display label for a property key.
    #[must_use]
    pub fn property_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.property_definition(key).map_or(key, |def| def.name.as_str())
    }

    /// Whether the dataset has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First entity whose id is not a valid [`EntityId`].
    #[must_use]
    pub fn unroutable_entity(&self) -> Option<&str> {
        self.entities
            .iter()
            .map(|entity| entity.id.as_str())
            .find(|id| EntityId::new(*id).is_err())
    }

    /// Distinct entity categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for entity in &self.entities {
            if !entity.category.is_empty() && !categories.contains(&entity.category.as_str()) {
                categories.push(&entity.category);
            }
        }
        categories
    }
}

/// One entity of a discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique within the discipline
    pub id: String,

    /// Display name
    pub name: String,

    /// Grouping used by the category filter
    #[serde(default)]
    pub category: String,

    /// Free-text description
    #[serde(default)]
    pub overview: String,

    /// Schema-less property bag
    #[serde(default)]
    pub properties: PropertyBag,

    /// Links to other entities
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_entities: Vec<CrossReference>,

    /// Extra sections: strings, lists or one level of nested maps
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub additional_info: Map<String, Value>,
}

impl Entity {
    /// Raw stored property, before unwrapping.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Additional-info section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.additional_info.get(name)
    }
}

/// A structured property: any object carrying a `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// The compared value
    pub value: Value,

    /// Reference URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Explanation shown next to the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Other annotations such as `unit`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored property: either structured or a plain value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// `{ value, link?, description? }`
    Structured(Property),
    /// Anything else, usually a string
    Plain(Value),
}

impl PropertyValue {
    /// The value compared and rendered, unwrapping structured properties.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Structured(property) => &property.value,
            Self::Plain(value) => value,
        }
    }

    /// Reference URL, for structured properties.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Structured(property) => property.link.as_deref(),
            Self::Plain(_) => None,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(Self::Plain(value))
    }
}

/// Property bag that keeps authoring order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PropertyBag(Vec<(String, PropertyValue)>);

impl PropertyBag {
    /// Look up a property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys in authoring order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Properties in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for PropertyBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<PropertyBag> for Map<String, Value> {
    fn from(bag: PropertyBag) -> Self {
        bag.0
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    PropertyValue::Plain(value) => value,
                    PropertyValue::Structured(property) => {
                        serde_json::to_value(property).unwrap_or(Value::Null)
                    }
                };
                (k, value)
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
    /// A repeated key replaces the earlier value in place.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::default();
        for (key, value) in iter {
            let key: String = key.into();
            let value: Value = value.into();
            let value = PropertyValue::from(value);
            match bag.0.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => bag.0.push((key, value)),
            }
        }
        bag
    }
}

/// Link from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCrossReference")]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    /// Target discipline; the entity's own discipline when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,

    /// Target entity id
    pub entity_id: String,

    /// Nature of the link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCrossReference {
    Id(String),
    #[serde(rename_all = "camelCase")]
    Full {
        #[serde(default)]
        discipline: Option<String>,
        #[serde(alias = "id")]
        entity_id: String,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl From<RawCrossReference> for CrossReference {
    fn from(raw: RawCrossReference) -> Self {
        match raw {
            RawCrossReference::Id(entity_id) => Self {
                discipline: None,
                entity_id,
                relation: None,
            },
            RawCrossReference::Full {
                discipline,
                entity_id,
                relation,
            } => Self {
                discipline,
                entity_id,
                relation,
            },
        }
    }
}

/// Known property of a discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Key used in entity property bags
    pub id: String,

    /// Display name
    pub name: String,

    /// Explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit of measure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}
