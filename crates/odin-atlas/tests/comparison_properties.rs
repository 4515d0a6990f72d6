//! Property tests for key unions and structural equality.

use odin_atlas::{canonicalize, is_identical, union_keys, Entity, PropertyBag};
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashSet;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z+-]{0,4}".prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::vec(("[a-d]", inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

fn entity(id: usize) -> impl Strategy<Value = Entity> {
    prop::collection::vec(("[A-F]", value()), 0..5).prop_map(move |pairs| Entity {
        id: format!("E{id}"),
        name: format!("Entity {id}"),
        category: String::new(),
        overview: String::new(),
        properties: pairs.into_iter().collect::<PropertyBag>(),
        related_entities: Vec::new(),
        additional_info: Map::new(),
    })
}

fn reversed_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(String, Value)> =
                map.iter().map(|(k, v)| (k.clone(), reversed_keys(v))).collect();
            pairs.reverse();
            Value::Object(pairs.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(reversed_keys).collect()),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn union_keys_covers_every_key_once(
        entities in prop::collection::vec(entity(0), 1..5),
    ) {
        let refs: Vec<&Entity> = entities.iter().collect();
        let keys = union_keys(&refs);

        let distinct: HashSet<&str> = keys.iter().copied().collect();
        prop_assert_eq!(distinct.len(), keys.len());

        let longest = entities.iter().map(|e| e.properties.keys().collect::<HashSet<_>>().len()).max().unwrap_or(0);
        prop_assert!(keys.len() >= longest);

        for entity in &entities {
            for key in entity.properties.keys() {
                prop_assert!(distinct.contains(key));
            }
        }
    }

    #[test]
    fn is_identical_is_reflexive(entity in entity(1)) {
        let keys: Vec<String> = entity.properties.keys().map(str::to_string).collect();
        for key in keys {
            prop_assert!(is_identical(&[&entity, &entity], &key));
        }
    }

    #[test]
    fn canonical_form_ignores_key_order(value in value()) {
        prop_assert_eq!(canonicalize(&value), canonicalize(&reversed_keys(&value)));
    }

    #[test]
    fn identical_ignores_key_order(value in value()) {
        let mut a = Map::new();
        a.insert("K".to_string(), value.clone());
        let mut b = Map::new();
        b.insert("K".to_string(), reversed_keys(&value));

        let left = Entity {
            id: "L".to_string(),
            name: "L".to_string(),
            category: String::new(),
            overview: String::new(),
            properties: PropertyBag::from(a),
            related_entities: Vec::new(),
            additional_info: Map::new(),
        };
        let right = Entity { id: "R".to_string(), properties: PropertyBag::from(b), ..left.clone() };

        prop_assert!(is_identical(&[&left, &right], "K"));
    }
}
