use super::visited::Registry;
use crate::map::{EntryMap, ObjectMap, ValueSet};
use crate::shared::Shared;
use crate::Value;
use tracing::trace;

/// Produces an independent copy of `value`.
///
/// Primitives are returned as they are. Dates and patterns are copied.
/// Arrays, objects, maps and sets become new nodes whose members are deep
/// copies, so the result shares no composite node with the input. A node
/// reachable along several paths, including through a cycle, is copied
/// once and the copy is reused everywhere the original appeared.
///
/// # Examples
///
/// ```rust
/// use deep_value::{clone_deep, value, Value};
///
/// let original = value!({ "a": 1, "nested": { "b": 2 } });
/// let copy = clone_deep(&original);
///
/// copy.get("nested").unwrap().set_field("b", Value::from(99));
/// assert_eq!(original.get("nested").unwrap().get("b"), Some(Value::from(2)));
/// ```
///
/// Cycles are reproduced rather than followed:
///
/// ```rust
/// use deep_value::{clone_deep, value};
///
/// let a = value!({ "a": 1 });
/// a.set_field("self", a.clone());
///
/// let copy = clone_deep(&a);
/// assert_eq!(copy.get("self").unwrap().node_id(), copy.node_id());
/// assert_ne!(copy.node_id(), a.node_id());
/// ```
#[must_use]
pub fn clone_deep(value: &Value) -> Value {
    let mut registry = Registry::new();
    clone_node(value, &mut registry)
}

fn clone_node(value: &Value, registry: &mut Registry<Value>) -> Value {
    if let Some(id) = value.node_id() {
        if let Some(copy) = registry.get(id) {
            trace!(node = %id, "clone_deep: node already copied");
            return copy.clone();
        }
    }

    match value {
        Value::Array(src) => {
            let items = src.borrow();
            let out = Shared::new(Vec::with_capacity(items.len()));
            registry.register(src.id(), Value::Array(out.clone()));
            for item in items.iter() {
                let copy = clone_node(item, registry);
                out.borrow_mut().push(copy);
            }
            Value::Array(out)
        }
        Value::Object(src) => {
            let fields = src.borrow();
            let out = Shared::new(ObjectMap::with_capacity(fields.len()));
            registry.register(src.id(), Value::Object(out.clone()));
            for (key, item) in fields.iter() {
                let copy = clone_node(item, registry);
                out.borrow_mut().insert(key.clone(), copy);
            }
            Value::Object(out)
        }
        Value::Map(src) => {
            let entries = src.borrow();
            let out = Shared::new(EntryMap::with_capacity(entries.len()));
            registry.register(src.id(), Value::Map(out.clone()));
            for (key, item) in entries.iter() {
                let key = clone_node(key, registry);
                let copy = clone_node(item, registry);
                out.borrow_mut().insert(key, copy);
            }
            Value::Map(out)
        }
        Value::Set(src) => {
            let members = src.borrow();
            let out = Shared::new(ValueSet::with_capacity(members.len()));
            registry.register(src.id(), Value::Set(out.clone()));
            for member in members.iter() {
                let copy = clone_node(member, registry);
                out.borrow_mut().insert(copy);
            }
            Value::Set(out)
        }
        Value::Date(dt) => Value::Date(*dt),
        Value::Pattern(p) => Value::Pattern(p.clone()),
        primitive => primitive.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Pattern};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_primitives_are_returned_as_is() {
        assert_eq!(clone_deep(&Value::from(42)), Value::from(42));
        assert!(clone_deep(&Value::from(f64::NAN)).is_nan());
        assert!(clone_deep(&Value::Null).is_null());
        assert!(clone_deep(&Value::Undefined).is_undefined());
        assert_eq!(clone_deep(&Value::from("")), Value::from(""));
    }

    #[test]
    fn test_nested_nodes_are_new() {
        let original = value!({ "a": 1, "nested": { "b": 2, "deep": { "c": 3 } } });
        let copy = clone_deep(&original);

        assert_eq!(copy, original);
        let nested = |v: &Value| v.get("nested").unwrap();
        assert_ne!(nested(&copy).node_id(), nested(&original).node_id());
        assert_ne!(
            nested(&copy).get("deep").unwrap().node_id(),
            nested(&original).get("deep").unwrap().node_id()
        );
    }

    #[test]
    fn test_date_and_pattern_are_copied() {
        let date = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let copy = clone_deep(&Value::Date(date));
        assert_eq!(copy.as_date(), Some(&date));

        let copy = clone_deep(&Value::pattern("test", "gi"));
        assert_eq!(copy.as_pattern(), Some(&Pattern::new("test", "gi")));
    }

    #[test]
    fn test_shared_node_copied_once() {
        let shared = value!({ "x": 1 });
        let original = Value::array(vec![shared.clone(), shared]);
        let copy = clone_deep(&original);

        assert_eq!(copy.at(0).unwrap().node_id(), copy.at(1).unwrap().node_id());
        assert_ne!(copy.at(0).unwrap().node_id(), original.at(0).unwrap().node_id());
    }

    #[test]
    fn test_cyclic_array() {
        let original = value!([1, 2]);
        original.push(original.clone());

        let copy = clone_deep(&original);
        assert_eq!(copy.at(0), Some(Value::from(1)));
        assert_eq!(copy.at(2).unwrap().node_id(), copy.node_id());
        assert_ne!(copy.node_id(), original.node_id());
    }

    #[test]
    fn test_cyclic_map_and_set() {
        let map = Value::map(EntryMap::new());
        if let Value::Map(m) = &map {
            m.borrow_mut().insert(Value::from("self"), map.clone());
        }
        let copy = clone_deep(&map);
        let inner = copy.as_map().unwrap().borrow().get(&Value::from("self")).cloned();
        assert_eq!(inner.unwrap().node_id(), copy.node_id());

        let set = Value::set(ValueSet::new());
        if let Value::Set(s) = &set {
            s.borrow_mut().insert(set.clone());
        }
        let copy = clone_deep(&set);
        let members: Vec<_> = copy.as_set().unwrap().borrow().iter().cloned().collect();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].node_id(), copy.node_id());
    }

    #[test]
    fn test_map_keys_are_cloned() {
        let key = value!({ "id": 1 });
        let mut entries = EntryMap::new();
        entries.insert(key.clone(), Value::from("value"));
        let copy = clone_deep(&Value::map(entries));

        let keys: Vec<_> = copy.as_map().unwrap().borrow().keys().cloned().collect();
        assert_eq!(keys[0], key);
        assert_ne!(keys[0].node_id(), key.node_id());
    }
}
