//! Cycle-safe rebuilding transforms.
//!
//! Each function here returns a new graph derived from its input. They share
//! the copying discipline of [`clone_deep`](crate::clone_deep): every input
//! node is mapped to its output node before its members are processed, so a
//! cyclic input yields an output with the same cycles and a shared node is
//! rebuilt once.
//!
//! - [`clean`]: drop empty members (undefined, null, NaN, `""`)
//! - [`remove_undefined`]: drop undefined members only
//! - [`map_key`]: rewrite every field with a given name
//! - [`replace_strings`]: swap out strings containing a marker

use crate::deep::visited::Registry;
use crate::map::{EntryMap, ObjectMap, ValueSet};
use crate::options::CleanOptions;
use crate::shared::Shared;
use crate::Value;

/// Per-transform behaviour plugged into [`rebuild`].
trait Rewriter {
    /// Output for a value that is not a shared container.
    fn leaf(&mut self, value: &Value) -> Value {
        value.clone()
    }

    /// Whether a rebuilt member stays in its container.
    fn keep(&self, _value: &Value) -> bool {
        true
    }

    /// Replacement for a record field, bypassing recursion when `Some`.
    fn field(&mut self, _key: &str, _value: &Value) -> Option<Value> {
        None
    }
}

fn rebuild<R: Rewriter>(value: &Value, rw: &mut R, registry: &mut Registry<Value>) -> Value {
    if let Some(id) = value.node_id() {
        if let Some(done) = registry.get(id) {
            return done.clone();
        }
    }

    match value {
        Value::Array(src) => {
            let items = src.borrow();
            let out = Shared::new(Vec::with_capacity(items.len()));
            registry.register(src.id(), Value::Array(out.clone()));
            for item in items.iter() {
                let v = rebuild(item, rw, registry);
                if rw.keep(&v) {
                    out.borrow_mut().push(v);
                }
            }
            Value::Array(out)
        }
        Value::Object(src) => {
            let fields = src.borrow();
            let out = Shared::new(ObjectMap::with_capacity(fields.len()));
            registry.register(src.id(), Value::Object(out.clone()));
            for (key, item) in fields.iter() {
                let v = match rw.field(key, item) {
                    Some(v) => v,
                    None => rebuild(item, rw, registry),
                };
                if rw.keep(&v) {
                    out.borrow_mut().insert(key.clone(), v);
                }
            }
            Value::Object(out)
        }
        Value::Map(src) => {
            let entries = src.borrow();
            let out = Shared::new(EntryMap::with_capacity(entries.len()));
            registry.register(src.id(), Value::Map(out.clone()));
            for (key, item) in entries.iter() {
                // Primitive keys are kept verbatim; only container keys are rebuilt.
                let key = if key.node_id().is_some() {
                    rebuild(key, rw, registry)
                } else {
                    key.clone()
                };
                let v = rebuild(item, rw, registry);
                if rw.keep(&v) {
                    out.borrow_mut().insert(key, v);
                }
            }
            Value::Map(out)
        }
        Value::Set(src) => {
            let members = src.borrow();
            let out = Shared::new(ValueSet::with_capacity(members.len()));
            registry.register(src.id(), Value::Set(out.clone()));
            for member in members.iter() {
                let v = rebuild(member, rw, registry);
                if rw.keep(&v) {
                    out.borrow_mut().insert(v);
                }
            }
            Value::Set(out)
        }
        other => rw.leaf(other),
    }
}

struct Cleaner<'a> {
    options: &'a CleanOptions,
}

impl Rewriter for Cleaner<'_> {
    fn keep(&self, value: &Value) -> bool {
        !self.options.strips(value)
    }
}

/// Recursively removes members that `options` considers empty.
///
/// Record fields, array elements, map entries (by value) and set members are
/// dropped when [`CleanOptions::strips`] matches them. Containers are never
/// dropped, even when cleaning leaves them empty. With options that strip
/// nothing, the result is a shallow copy of `value`.
///
/// # Examples
///
/// ```rust
/// use deep_value::{clean, value, CleanOptions};
///
/// let data = value!({ "a": 1, "b": null, "nested": { "c": "", "d": [1, null, 2] } });
/// let cleaned = clean(&data, &CleanOptions::default());
/// assert_eq!(cleaned, value!({ "a": 1, "nested": { "d": [1, 2] } }));
/// ```
#[must_use]
pub fn clean(value: &Value, options: &CleanOptions) -> Value {
    if options.is_empty() {
        return value.shallow_copy();
    }
    let mut cleaner = Cleaner { options };
    rebuild(value, &mut cleaner, &mut Registry::new())
}

/// Recursively removes undefined members, keeping null, NaN and `""`.
///
/// # Examples
///
/// ```rust
/// use deep_value::{remove_undefined, value};
///
/// let data = value!({ "a": 1, "b": undefined, "c": null });
/// assert_eq!(remove_undefined(&data), value!({ "a": 1, "c": null }));
/// ```
#[must_use]
pub fn remove_undefined(value: &Value) -> Value {
    clean(value, &CleanOptions::none().with_undefined(true))
}

struct KeyMapper<'k, F> {
    key: &'k str,
    f: F,
}

impl<F> Rewriter for KeyMapper<'_, F>
where
    F: FnMut(&Value) -> Value,
{
    fn field(&mut self, key: &str, value: &Value) -> Option<Value> {
        (key == self.key).then(|| (self.f)(value))
    }
}

/// Replaces the value of every record field named `key`, at any depth.
///
/// Matching fields are passed to `f` and not searched further; all other
/// members are rebuilt recursively.
///
/// # Examples
///
/// ```rust
/// use deep_value::{map_key, value, Value};
///
/// let obj = value!({ "name": "hello", "nested": { "name": "world" } });
/// let upper = map_key(&obj, "name", |v| {
///     v.as_str().map(|s| Value::from(s.to_uppercase())).unwrap_or_else(|| v.clone())
/// });
/// assert_eq!(upper, value!({ "name": "HELLO", "nested": { "name": "WORLD" } }));
/// ```
#[must_use]
pub fn map_key<F>(value: &Value, key: &str, f: F) -> Value
where
    F: FnMut(&Value) -> Value,
{
    let mut mapper = KeyMapper { key, f };
    rebuild(value, &mut mapper, &mut Registry::new())
}

struct StringReplacer<'a> {
    replacements: &'a [(&'a str, &'a str)],
    marker: &'a str,
}

impl Rewriter for StringReplacer<'_> {
    fn leaf(&mut self, value: &Value) -> Value {
        match value {
            Value::String(s) if s.contains(self.marker) => self
                .replacements
                .iter()
                .find(|(needle, _)| s.contains(needle))
                .map(|(_, replacement)| Value::from(*replacement))
                .unwrap_or_else(|| value.clone()),
            other => other.clone(),
        }
    }
}

/// Replaces string leaves that contain `marker`.
///
/// A matching string is swapped, as a whole, for the replacement of the
/// first `(needle, replacement)` pair whose needle it contains. Strings
/// without the marker, or with no matching needle, are kept.
///
/// # Examples
///
/// ```rust
/// use deep_value::{replace_strings, value};
///
/// let config = value!({ "db": "${DB_HOST}", "name": "app", "list": ["${PORT}"] });
/// let replaced = replace_strings(
///     &config,
///     &[("DB_HOST", "localhost"), ("PORT", "5432")],
///     "${",
/// );
/// assert_eq!(replaced, value!({ "db": "localhost", "name": "app", "list": ["5432"] }));
/// ```
#[must_use]
pub fn replace_strings(value: &Value, replacements: &[(&str, &str)], marker: &str) -> Value {
    let mut replacer = StringReplacer {
        replacements,
        marker,
    };
    rebuild(value, &mut replacer, &mut Registry::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_clean_arrays_filter_elements() {
        let data = value!([1, null, "", 2, undefined]);
        assert_eq!(clean(&data, &CleanOptions::default()), value!([1, 2]));
    }

    #[test]
    fn test_clean_strips_nan() {
        let data = value!({ "a": (f64::NAN), "b": 1 });
        assert_eq!(clean(&data, &CleanOptions::default()), value!({ "b": 1 }));
        let kept = clean(&data, &CleanOptions::default().with_nan(false));
        assert!(kept.get("a").unwrap().is_nan());
    }

    #[test]
    fn test_clean_keeps_emptied_containers() {
        let data = value!({ "a": { "b": null } });
        assert_eq!(clean(&data, &CleanOptions::default()), value!({ "a": {} }));
    }

    #[test]
    fn test_clean_without_defaults_is_shallow_copy() {
        let data = value!({ "a": null, "nested": { "b": 1 } });
        let copy = clean(&data, &CleanOptions::none());
        assert_ne!(copy.node_id(), data.node_id());
        assert_eq!(
            copy.get("nested").unwrap().node_id(),
            data.get("nested").unwrap().node_id()
        );
        assert!(copy.get("a").unwrap().is_null());
    }

    #[test]
    fn test_clean_does_not_mutate_input() {
        let data = value!({ "a": null, "b": 1 });
        let _ = clean(&data, &CleanOptions::default());
        assert_eq!(data, value!({ "a": null, "b": 1 }));
    }

    #[test]
    fn test_clean_reproduces_cycles() {
        let data = value!({ "a": null, "b": 1 });
        data.set_field("self", data.clone());

        let cleaned = clean(&data, &CleanOptions::default());
        assert!(cleaned.get("a").is_none());
        assert_eq!(cleaned.get("self").unwrap().node_id(), cleaned.node_id());
    }

    #[test]
    fn test_clean_sets_and_maps() {
        let set: ValueSet = vec![Value::from(1), Value::Null].into_iter().collect();
        let cleaned = clean(&Value::set(set), &CleanOptions::default());
        assert_eq!(cleaned.as_set().unwrap().borrow().len(), 1);

        let mut entries = EntryMap::new();
        entries.insert(Value::from("keep"), Value::from(1));
        entries.insert(Value::from("drop"), Value::from(""));
        let cleaned = clean(&Value::map(entries), &CleanOptions::default());
        let cleaned = cleaned.as_map().unwrap().borrow();
        assert!(cleaned.contains_key(&Value::from("keep")));
        assert!(!cleaned.contains_key(&Value::from("drop")));
    }

    #[test]
    fn test_remove_undefined_keeps_other_empties() {
        let data = value!({ "a": undefined, "b": null, "c": "", "d": [undefined, 1] });
        assert_eq!(
            remove_undefined(&data),
            value!({ "b": null, "c": "", "d": [1] })
        );
    }

    #[test]
    fn test_map_key_does_not_recurse_into_matches() {
        let data = value!({ "meta": { "meta": 1 }, "other": [{ "meta": 2 }] });
        let mapped = map_key(&data, "meta", |_| Value::from("x"));
        assert_eq!(mapped, value!({ "meta": "x", "other": [{ "meta": "x" }] }));
    }

    #[test]
    fn test_map_key_cycles() {
        let data = value!({ "name": "a" });
        data.set_field("self", data.clone());
        let mapped = map_key(&data, "name", |_| Value::from("b"));
        assert_eq!(mapped.get("name"), Some(Value::from("b")));
        assert_eq!(mapped.get("self").unwrap().node_id(), mapped.node_id());
    }

    #[test]
    fn test_replace_strings_first_match_wins() {
        let data = value!({ "v": "#a-b" });
        let replaced = replace_strings(&data, &[("b", "B"), ("a", "A")], "#");
        assert_eq!(replaced, value!({ "v": "B" }));
    }

    #[test]
    fn test_replace_strings_requires_marker() {
        let data = value!({ "v": "a", "w": "#z" });
        let replaced = replace_strings(&data, &[("a", "A")], "#");
        assert_eq!(replaced, value!({ "v": "a", "w": "#z" }));
    }
}
