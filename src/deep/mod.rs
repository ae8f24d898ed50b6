//! Cycle-safe deep traversals.
//!
//! Every traversal here walks a value graph recursively and keeps a visited
//! registry keyed by [`NodeId`]. A composite node is registered *before* its
//! children are visited, so a reference cycle always meets an entry that is
//! already present and the walk terminates:
//!
//! - [`clone_deep`] maps each input node to its copy and returns the
//!   existing copy on re-entry, so cycles in the input become the same
//!   cycles in the output.
//! - [`deep_equal`] records left-hand nodes and treats re-entry as equal.
//! - [`has_nullish`] records entered nodes and treats re-entry as clean.
//!
//! The registry lives for one top-level call and is dropped on return.
//! Recursion depth grows with the nesting depth of acyclic input.

mod clone;
mod equal;
mod nullish;
pub(crate) mod visited;

pub use clone::clone_deep;
pub use equal::deep_equal;
pub use nullish::has_nullish;

use crate::shared::NodeId;
use crate::Value;
use tracing::trace;
use visited::VisitedSet;

/// Calls `f` on every member of a composite until it returns `true`.
///
/// Members are record values, array elements, map keys and values, and set
/// members. Returns whether `f` short-circuited.
pub(crate) fn any_member<F>(value: &Value, mut f: F) -> bool
where
    F: FnMut(&Value) -> bool,
{
    match value {
        Value::Array(a) => a.borrow().iter().any(&mut f),
        Value::Object(o) => o.borrow().values().any(&mut f),
        Value::Map(m) => m.borrow().iter().any(|(k, v)| f(k) || f(v)),
        Value::Set(s) => s.borrow().iter().any(&mut f),
        _ => false,
    }
}

/// Returns the first node found that can reach itself, if any.
///
/// Only back edges count: a node shared by two siblings is not a cycle.
///
/// # Examples
///
/// ```rust
/// use deep_value::{find_cycle, value, Value};
///
/// let shared = value!({ "v": 1 });
/// let tree = Value::array(vec![shared.clone(), shared.clone()]);
/// assert!(find_cycle(&tree).is_none());
///
/// shared.set_field("back", tree.clone());
/// assert!(find_cycle(&tree).is_some());
/// ```
#[must_use]
pub fn find_cycle(value: &Value) -> Option<NodeId> {
    let mut on_path = VisitedSet::new();
    let mut finished = VisitedSet::new();
    back_edge(value, &mut on_path, &mut finished)
}

/// Returns `true` if some node of `value` can reach itself.
#[must_use]
pub fn is_cyclic(value: &Value) -> bool {
    find_cycle(value).is_some()
}

fn back_edge(value: &Value, on_path: &mut VisitedSet, finished: &mut VisitedSet) -> Option<NodeId> {
    let id = value.node_id()?;
    if finished.contains(id) {
        return None;
    }
    if !on_path.enter(id) {
        trace!(node = %id, "back edge");
        return Some(id);
    }

    let mut found = None;
    any_member(value, |member| {
        found = back_edge(member, on_path, finished);
        found.is_some()
    });

    on_path.leave(id);
    finished.enter(id);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_any_member_visits_map_keys() {
        let mut entries = crate::EntryMap::new();
        entries.insert(Value::Null, Value::from(1));
        let map = Value::map(entries);
        assert!(any_member(&map, |v| v.is_null()));
        assert!(!any_member(&Value::from(1), |_| true));
    }

    #[test]
    fn test_find_cycle_self_reference() {
        let node = value!({ "a": 1 });
        assert!(!is_cyclic(&node));
        node.set_field("self", node.clone());
        assert_eq!(find_cycle(&node), node.node_id());
    }

    #[test]
    fn test_find_cycle_through_set() {
        let set = Value::set(crate::ValueSet::new());
        let holder = Value::array(vec![set.clone()]);
        if let Value::Set(s) = &set {
            s.borrow_mut().insert(holder.clone());
        }
        assert!(is_cyclic(&holder));
    }

    #[test]
    fn test_diamond_is_not_cyclic() {
        let leaf = value!([1]);
        let left = Value::array(vec![leaf.clone()]);
        let right = Value::array(vec![leaf]);
        let root = Value::array(vec![left, right]);
        assert!(!is_cyclic(&root));
    }
}
