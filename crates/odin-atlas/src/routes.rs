//! Munin Atlas navigation routes.

use odin_core::{DisciplineId, EntityId};
use std::fmt;

const ROOT: &str = "/munin";

/// A navigable atlas location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/munin/:disciplineId`
    Discipline {
        /// Discipline shown
        discipline: DisciplineId,
    },
    /// `/munin/:disciplineId/:entityId`
    Entity {
        /// Owning discipline
        discipline: DisciplineId,
        /// Entity shown
        entity: EntityId,
    },
    /// `/munin/:disciplineId/compare?entities=id1,id2,...`
    Compare {
        /// Owning discipline
        discipline: DisciplineId,
        /// Entities in selection order
        entities: Vec<EntityId>,
    },
    /// `/munin/:disciplineId/property/:propertyId`
    Property {
        /// Owning discipline
        discipline: DisciplineId,
        /// Property key
        property: String,
    },
}

impl Route {
    /// Parse a path with optional query string.
    ///
    /// Returns `None` for paths outside the atlas or with invalid ids.
    /// Malformed ids inside `entities=` are skipped rather than rejected.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let rest = path.strip_prefix(ROOT)?.strip_prefix('/')?;
        let segments: Vec<&str> = rest.trim_end_matches('/').split('/').collect();

        let discipline = DisciplineId::new(*segments.first()?).ok()?;

        match segments.as_slice() {
            [_] => Some(Self::Discipline { discipline }),
            [_, "compare"] => Some(Self::Compare {
                discipline,
                entities: parse_entities_param(query_param(query, "entities").unwrap_or("")),
            }),
            [_, "property", property] if !property.is_empty() => Some(Self::Property {
                discipline,
                property: (*property).to_string(),
            }),
            [_, entity] => Some(Self::Entity {
                discipline,
                entity: EntityId::new(*entity).ok()?,
            }),
            _ => None,
        }
    }

    /// The discipline this route belongs to.
    #[must_use]
    pub fn discipline(&self) -> &DisciplineId {
        match self {
            Self::Discipline { discipline }
            | Self::Entity { discipline, .. }
            | Self::Compare { discipline, .. }
            | Self::Property { discipline, .. } => discipline,
        }
    }

    /// Route back to the unfiltered discipline view.
    #[must_use]
    pub fn discipline_route(&self) -> Self {
        Self::Discipline {
            discipline: self.discipline().clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discipline { discipline } => write!(f, "{ROOT}/{discipline}"),
            Self::Entity { discipline, entity } => write!(f, "{ROOT}/{discipline}/{entity}"),
            Self::Compare {
                discipline,
                entities,
            } => {
                let ids: Vec<&str> = entities.iter().map(EntityId::as_str).collect();
                write!(f, "{ROOT}/{discipline}/compare?entities={}", ids.join(","))
            }
            Self::Property {
                discipline,
                property,
            } => write!(f, "{ROOT}/{discipline}/property/{property}"),
        }
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Split an `entities=` value into ids, keeping order and dropping blanks,
/// repeats and malformed ids.
#[must_use]
pub fn parse_entities_param(value: &str) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = Vec::new();
    for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Ok(id) = EntityId::new(raw) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
