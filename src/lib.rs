//! # deep_value
//!
//! Cycle-safe deep operations over dynamic value graphs.
//!
//! ## What is a value graph?
//!
//! A [`Value`] is a dynamically typed tree of primitives (undefined, null,
//! booleans, numbers, big integers, strings), inline composites (dates,
//! patterns) and shared containers (arrays, records, maps, sets). Shared
//! containers are reference-counted handles, so one node can appear under
//! several parents and a node can contain itself. Every container has a
//! [`NodeId`] that identifies it for as long as it is alive.
//!
//! ## Key Features
//!
//! - **Deep clone**: [`clone_deep`] copies a graph, reproducing shared nodes
//!   and cycles in the copy
//! - **Deep equality**: [`deep_equal`] compares graphs structurally with
//!   SameValue leaves (`NaN == NaN`, `0 != -0`)
//! - **Nullish detection**: [`has_nullish`] finds null, undefined or NaN
//!   anywhere in a graph
//! - **Transforms**: [`clean`], [`remove_undefined`], [`map_key`] and
//!   [`replace_strings`] rebuild graphs with the same cycle handling
//! - **Serde Compatible**: [`to_value`] and [`from_value`] bridge to typed
//!   Rust data, and `Value` implements `Serialize`/`Deserialize`
//!
//! None of the traversals can loop forever on cyclic input, and none of
//! them can fail.
//!
//! ## Quick Start
//!
//! ```rust
//! use deep_value::{clone_deep, deep_equal, has_nullish, value, Value};
//!
//! let original = value!({ "a": 1, "nested": { "b": 2 } });
//! original.set_field("self", original.clone());
//!
//! let copy = clone_deep(&original);
//! assert!(deep_equal(&original, &copy));
//! assert_eq!(copy.get("self").unwrap().node_id(), copy.node_id());
//! assert!(!has_nullish(&copy));
//!
//! copy.get("nested").unwrap().set_field("b", Value::Null);
//! assert!(has_nullish(&copy));
//! assert!(!has_nullish(&original));
//! ```
//!
//! ### Working with typed data
//!
//! ```rust
//! use deep_value::{from_value, to_value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//! let value = to_value(&user).unwrap();
//! assert_eq!(value.get("name").unwrap().as_str(), Some("Alice"));
//!
//! let back: User = from_value(&value).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ## Logging
//!
//! Cycle handling emits `trace`-level events through the `tracing` facade.
//! The crate never installs a subscriber.
//!
//! ## Threading
//!
//! Values are built on `Rc`/`RefCell` and are neither `Send` nor `Sync`.
//! Every operation is synchronous and keeps its visited registry for the
//! duration of one call.

pub mod de;
pub mod deep;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod shared;
pub mod transform;
pub mod value;

pub use de::{from_value, ValueDeserializer};
pub use deep::{clone_deep, deep_equal, find_cycle, has_nullish, is_cyclic};
pub use error::{Error, Result};
pub use map::{EntryMap, ObjectMap, ValueSet};
pub use options::CleanOptions;
pub use ser::{to_value, ValueSerializer};
pub use shared::{NodeId, Shared};
pub use transform::{clean, map_key, remove_undefined, replace_strings};
pub use value::{ArrayRef, MapRef, Number, ObjectRef, Pattern, SetRef, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_typed_round_trip() {
        let point = Point { x: 1, y: 2 };
        let value = to_value(&point).unwrap();
        assert_eq!(value, value!({ "x": 1, "y": 2 }));
        let back: Point = from_value(&value).unwrap();
        assert_eq!(point, back);
    }

    #[test]
    fn test_nested_mutation_does_not_leak() {
        let original = value!({ "a": 1, "nested": { "b": 2, "deep": { "c": 3 } } });
        let copy = clone_deep(&original);
        copy.get("nested")
            .unwrap()
            .get("deep")
            .unwrap()
            .set_field("c", Value::from(99));

        let deep_c = |v: &Value| v.get("nested").unwrap().get("deep").unwrap().get("c");
        assert_eq!(deep_c(&original), Some(Value::from(3)));
        assert_eq!(deep_c(&copy), Some(Value::from(99)));
        assert!(!deep_equal(&original, &copy));
    }

    #[test]
    fn test_method_forms_agree() {
        let v = value!({ "a": [1, null] });
        assert_eq!(v.deep_clone(), v);
        assert!(v.deep_eq(&clone_deep(&v)));
        assert!(v.has_nullish());
        assert!(!v.is_cyclic());
    }

    #[test]
    fn test_equality_over_cycles_is_reflexive() {
        let v = value!({ "a": 1 });
        v.set_field("self", v.clone());
        assert!(deep_equal(&v, &v));
        assert!(deep_equal(&v, &clone_deep(&v)));
    }
}
