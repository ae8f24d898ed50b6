use super::any_member;
use super::visited::VisitedSet;
use crate::Value;
use tracing::trace;

/// Returns `true` if `value` is, or reaches, null, undefined or NaN.
///
/// Members of records, arrays, maps (keys and values) and sets are searched
/// recursively and the search stops at the first hit. A node entered a
/// second time contributes nothing new, so cyclic input terminates.
///
/// # Examples
///
/// ```rust
/// use deep_value::{has_nullish, value, Value};
///
/// assert!(has_nullish(&Value::Null));
/// assert!(!has_nullish(&Value::from(42)));
/// assert!(has_nullish(&value!({ "a": { "b": { "c": undefined } } })));
/// assert!(!has_nullish(&value!({ "a": 1, "b": "x" })));
/// ```
#[must_use]
pub fn has_nullish(value: &Value) -> bool {
    let mut visited = VisitedSet::new();
    scan(value, &mut visited)
}

fn scan(value: &Value, visited: &mut VisitedSet) -> bool {
    if value.is_nullish() || value.is_nan() {
        return true;
    }
    if let Some(id) = value.node_id() {
        if !visited.enter(id) {
            trace!(node = %id, "has_nullish: node re-entered");
            return false;
        }
    }
    any_member(value, |member| scan(member, visited))
}
