//! Container types stored behind composite handles.
//!
//! - [`ObjectMap`]: a plain record, string keys in insertion order
//! - [`EntryMap`]: a keyed-pair container whose keys are arbitrary values
//! - [`ValueSet`]: a unique-value container
//!
//! All three wrap `indexmap` tables so that iteration, display and the
//! serde bridges see entries in the order they were inserted, while
//! lookups stay constant time.
//!
//! ## Examples
//!
//! ```rust
//! use deep_value::{ObjectMap, Value};
//!
//! let mut map = ObjectMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::{Equivalent, IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An ordered map of string keys to values.
///
/// # Examples
///
/// ```rust
/// use deep_value::{ObjectMap, Value};
///
/// let mut map = ObjectMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ObjectMap(IndexMap<String, Value>);

impl ObjectMap {
    /// Creates an empty `ObjectMap`.
    #[must_use]
    pub fn new() -> Self {
        ObjectMap(IndexMap::new())
    }

    /// Creates an empty `ObjectMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ObjectMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// Re-inserting an existing key keeps its original position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining fields.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Returns a new map holding only the listed keys that are present.
    ///
    /// Fields appear in the order of `keys`. Values are shared, not copied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deep_value::value;
    ///
    /// let user = value!({ "id": 1, "name": "Alice", "email": "alice@example.com" });
    /// let picked = user.as_object().unwrap().borrow().pick(&["name", "missing"]);
    /// assert_eq!(picked.len(), 1);
    /// assert!(picked.contains_key("name"));
    /// ```
    #[must_use]
    pub fn pick(&self, keys: &[&str]) -> ObjectMap {
        keys.iter()
            .filter_map(|key| self.0.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect()
    }

    /// Returns a new map without the listed keys.
    #[must_use]
    pub fn omit(&self, keys: &[&str]) -> ObjectMap {
        self.0
            .iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .map(|(key, v)| (key.clone(), v.clone()))
            .collect()
    }

    /// Returns a new map with the same keys and every value passed through `f`.
    pub fn map_values<F>(&self, mut f: F) -> ObjectMap
    where
        F: FnMut(&Value, &str) -> Value,
    {
        self.0
            .iter()
            .map(|(key, v)| (key.clone(), f(v, key)))
            .collect()
    }

    /// Shallow difference between two records.
    ///
    /// The result holds every key of `self` that is missing from `other` or
    /// whose value differs under [`Value::same_value`] (with `self`'s value),
    /// followed by every key only present in `other` (with `other`'s value).
    /// Composite values are compared by identity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deep_value::{value, Value};
    ///
    /// let a = value!({ "a": 1, "b": 2 });
    /// let b = value!({ "a": 1, "b": 3, "c": 4 });
    /// let diff = a.as_object().unwrap().borrow().diff(&b.as_object().unwrap().borrow());
    ///
    /// assert_eq!(diff.get("b"), Some(&Value::from(2)));
    /// assert_eq!(diff.get("c"), Some(&Value::from(4)));
    /// assert!(!diff.contains_key("a"));
    /// ```
    #[must_use]
    pub fn diff(&self, other: &ObjectMap) -> ObjectMap {
        let mut result = ObjectMap::new();
        for (key, value) in self.iter() {
            match other.get(key) {
                Some(theirs) if value.same_value(theirs) => {}
                _ => {
                    result.insert(key.clone(), value.clone());
                }
            }
        }
        for (key, value) in other.iter() {
            if !self.contains_key(key) {
                result.insert(key.clone(), value.clone());
            }
        }
        result
    }
}

impl From<HashMap<String, Value>> for ObjectMap {
    fn from(map: HashMap<String, Value>) -> Self {
        ObjectMap(map.into_iter().collect())
    }
}

impl From<ObjectMap> for HashMap<String, Value> {
    fn from(map: ObjectMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for ObjectMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ObjectMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ObjectMap(IndexMap::from_iter(iter))
    }
}

/// Hash-table key comparing with [`Value::same_value_zero`].
///
/// Numbers hash through their `f64` value with `-0` folded into `+0` and a
/// single NaN, so `1` and `1.0` land in the same slot. Shared composites
/// hash by [`NodeId`](crate::NodeId).
#[derive(Clone)]
struct Key(Value);

/// Borrowed form of [`Key`] used for lookups.
struct KeyRef<'a>(&'a Value);

fn hash_same_value_zero<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Undefined => state.write_u8(0),
        Value::Null => state.write_u8(1),
        Value::Bool(b) => {
            state.write_u8(2);
            b.hash(state);
        }
        Value::Number(n) => {
            state.write_u8(3);
            let f = n.as_f64();
            let bits = if f.is_nan() {
                f64::NAN.to_bits()
            } else if f == 0.0 {
                0
            } else {
                f.to_bits()
            };
            state.write_u64(bits);
        }
        Value::BigInt(bi) => {
            state.write_u8(4);
            bi.hash(state);
        }
        Value::String(s) => {
            state.write_u8(5);
            s.hash(state);
        }
        Value::Date(dt) => {
            state.write_u8(6);
            dt.hash(state);
        }
        Value::Pattern(p) => {
            state.write_u8(7);
            p.hash(state);
        }
        Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Set(_) => {
            state.write_u8(8);
            value.node_id().hash(state);
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_value_zero(&other.0)
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_same_value_zero(&self.0, state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_same_value_zero(self.0, state);
    }
}

impl Equivalent<Key> for KeyRef<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        self.0.same_value_zero(&key.0)
    }
}

/// A keyed-pair container whose keys may be any value.
///
/// Keys are matched with [`Value::same_value_zero`]: primitives by value,
/// composites by identity. Entries keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct EntryMap(IndexMap<Key, Value>);

impl EntryMap {
    #[must_use]
    pub fn new() -> Self {
        EntryMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        EntryMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts an entry, returning the previous value if the key was present.
    ///
    /// An existing key keeps its original position and its original handle.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.0.insert(Key(key), value)
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(&KeyRef(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(&KeyRef(key))
    }

    /// Removes an entry, preserving the order of the others.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.0.shift_remove(&KeyRef(key))
    }

    /// Position of `key` in insertion order.
    #[must_use]
    pub fn index_of(&self, key: &Value) -> Option<usize> {
        self.0.get_index_of(&KeyRef(key))
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&Value, &Value)> {
        self.0.get_index(index).map(|(k, v)| (&k.0, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.0.iter().map(|(k, v)| (&k.0, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + Clone + '_ {
        self.0.keys().map(|k| &k.0)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + Clone + '_ {
        self.0.values()
    }
}

/// Owning iterator over the entries of an [`EntryMap`].
pub struct EntryIntoIter(indexmap::map::IntoIter<Key, Value>);

impl Iterator for EntryIntoIter {
    type Item = (Value, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.0, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl IntoIterator for EntryMap {
    type Item = (Value, Value);
    type IntoIter = EntryIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        EntryIntoIter(self.0.into_iter())
    }
}

impl FromIterator<(Value, Value)> for EntryMap {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        EntryMap(iter.into_iter().map(|(k, v)| (Key(k), v)).collect())
    }
}

/// A unique-value container, deduplicated with [`Value::same_value_zero`].
#[derive(Clone, Debug, Default)]
pub struct ValueSet(IndexSet<Key>);

impl ValueSet {
    #[must_use]
    pub fn new() -> Self {
        ValueSet(IndexSet::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueSet(IndexSet::with_capacity(capacity))
    }

    /// Adds a member. Returns `false` if an identical member was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.0.insert(Key(value))
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(&KeyRef(value))
    }

    /// Removes a member, preserving the order of the others.
    pub fn remove(&mut self, value: &Value) -> bool {
        self.0.shift_remove(&KeyRef(value))
    }

    /// Position of `value` in insertion order.
    #[must_use]
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.0.get_index_of(&KeyRef(value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> + Clone + '_ {
        self.0.iter().map(|k| &k.0)
    }
}

/// Owning iterator over the members of a [`ValueSet`].
pub struct SetIntoIter(indexmap::set::IntoIter<Key>);

impl Iterator for SetIntoIter {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|k| k.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = SetIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        SetIntoIter(self.0.into_iter())
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        ValueSet(iter.into_iter().map(Key).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Number};

    #[test]
    fn test_object_map_keeps_insertion_order() {
        let mut map = ObjectMap::new();
        map.insert("z".to_string(), Value::from(1));
        map.insert("a".to_string(), Value::from(2));
        map.insert("z".to_string(), Value::from(3));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(map.get("z"), Some(&Value::from(3)));
    }

    #[test]
    fn test_pick_and_omit() {
        let user = value!({ "id": 1, "name": "Alice", "password": "secret" });
        let obj = user.as_object().unwrap().borrow();

        let omitted = obj.omit(&["password"]);
        assert_eq!(omitted.keys().cloned().collect::<Vec<_>>(), vec!["id", "name"]);

        let picked = obj.pick(&["name", "id"]);
        assert_eq!(picked.keys().cloned().collect::<Vec<_>>(), vec!["name", "id"]);
    }

    #[test]
    fn test_map_values() {
        let obj = value!({ "a": 1, "b": 2 });
        let doubled = obj.as_object().unwrap().borrow().map_values(|v, _| {
            Value::from(v.as_i64().unwrap_or_default() * 2)
        });
        assert_eq!(doubled.get("a"), Some(&Value::from(2)));
        assert_eq!(doubled.get("b"), Some(&Value::from(4)));
    }

    #[test]
    fn test_diff_uses_same_value() {
        let a = value!({ "nan": (f64::NAN), "zero": 0 });
        let b = value!({ "nan": (f64::NAN), "zero": (-0.0) });
        let diff = a
            .as_object()
            .unwrap()
            .borrow()
            .diff(&b.as_object().unwrap().borrow());

        assert!(!diff.contains_key("nan"));
        assert_eq!(
            diff.get("zero"),
            Some(&Value::Number(Number::Integer(0)))
        );
    }

    #[test]
    fn test_entry_map_matches_keys_by_same_value_zero() {
        let mut map = EntryMap::new();
        map.insert(Value::from(f64::NAN), Value::from("nan"));
        map.insert(Value::from(-0.0), Value::from("zero"));

        assert_eq!(map.get(&Value::from(f64::NAN)), Some(&Value::from("nan")));
        assert_eq!(map.get(&Value::from(0)), Some(&Value::from("zero")));
        assert_eq!(map.insert(Value::from(0), Value::from("again")), Some(Value::from("zero")));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_entry_map_composite_keys_use_identity() {
        let key = value!({ "id": 1 });
        let twin = value!({ "id": 1 });

        let mut map = EntryMap::new();
        map.insert(key.clone(), Value::from(1));

        assert!(map.contains_key(&key));
        assert!(!map.contains_key(&twin));
    }

    #[test]
    fn test_value_set_deduplicates() {
        let mut set = ValueSet::new();
        assert!(set.insert(Value::from(1)));
        assert!(!set.insert(Value::from(1.0)));
        assert!(set.insert(Value::from("1")));
        assert_eq!(set.len(), 2);
        assert!(set.remove(&Value::from(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_integral_floats_share_a_slot_with_integers() {
        let mut map = EntryMap::new();
        map.insert(Value::from(3), Value::from("int"));
        assert_eq!(map.get(&Value::from(3.0)), Some(&Value::from("int")));
        assert_eq!(map.index_of(&Value::Number(Number::Float(3.0))), Some(0));
        assert!(map.get(&Value::from(3.5)).is_none());

        let mut set = ValueSet::new();
        assert!(set.insert(Value::Number(Number::Infinity)));
        assert!(!set.insert(Value::from(f64::INFINITY)));
        assert!(set.insert(Value::Number(Number::NaN)));
        assert!(!set.insert(Value::from(f64::NAN)));
    }

    #[test]
    fn test_remove_keeps_insertion_order() {
        let mut map: EntryMap = (0..4).map(|i| (Value::from(i), Value::from(i * 10))).collect();
        assert_eq!(map.remove(&Value::from(1)), Some(Value::from(10)));
        let keys: Vec<_> = map.keys().filter_map(Value::as_i64).collect();
        assert_eq!(keys, vec![0, 2, 3]);
        assert_eq!(map.get_index(1), Some((&Value::from(2), &Value::from(20))));

        let mut set: ValueSet = (0..4).map(Value::from).collect();
        assert!(set.remove(&Value::from(0)));
        let members: Vec<_> = set.into_iter().filter_map(|v| v.as_i64()).collect();
        assert_eq!(members, vec![1, 2, 3]);
    }

    #[test]
    fn test_many_keys() {
        let map: EntryMap = (0..20_000)
            .map(|i| (Value::from(i), Value::from(i)))
            .collect();
        assert_eq!(map.len(), 20_000);
        assert!((0..20_000).all(|i| map.contains_key(&Value::from(i))));

        let set: ValueSet = (0..20_000).map(|i| Value::from(format!("k{i}"))).collect();
        assert_eq!(set.index_of(&Value::from("k19999")), Some(19_999));
    }
}
