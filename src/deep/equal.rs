use super::visited::VisitedSet;
use crate::Value;
use std::mem;
use tracing::trace;

/// Structural equality over value graphs.
///
/// - The same node compared with itself is equal.
/// - At the top level, two null/undefined values are equal and a
///   null/undefined value never equals anything else.
/// - Containers of the same kind are equal when their keys match as sets
///   (order is ignored for records, maps and sets) and every pair of
///   corresponding members is equal. Arrays compare index by index.
/// - Dates compare by instant, patterns by text and flags.
/// - Primitive leaves compare with [`Value::same_value`]: `NaN` equals `NaN`
///   and `0` differs from `-0`.
///
/// A left-hand node is marked while its members are being compared and
/// unmarked afterwards, so only a cycle can reach a marked node. Such a
/// re-entry counts as equal without looking at the right-hand side again.
/// This guarantees termination on cyclic input but is an approximation:
/// two graphs whose cycles line up differently can compare equal. Shared
/// acyclic nodes are compared in full every time they are reached.
///
/// # Examples
///
/// ```rust
/// use deep_value::{deep_equal, value};
///
/// assert!(deep_equal(&value!({ "x": { "y": { "z": 1 } } }), &value!({ "x": { "y": { "z": 1 } } })));
/// assert!(!deep_equal(&value!({ "x": { "y": { "z": 1 } } }), &value!({ "x": { "y": { "z": 2 } } })));
/// ```
#[must_use]
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    if a.is_nullish() || b.is_nullish() {
        return a.is_nullish() && b.is_nullish();
    }
    let mut visited = VisitedSet::new();
    equal_node(a, b, &mut visited)
}

fn equal_node(a: &Value, b: &Value, visited: &mut VisitedSet) -> bool {
    let Some(id) = a.node_id() else {
        return a.same_value(b);
    };
    if a.same_value(b) {
        return true;
    }
    if mem::discriminant(a) != mem::discriminant(b) {
        return false;
    }
    if !visited.enter(id) {
        trace!(node = %id, kind = a.kind_name(), "deep_equal: node re-entered");
        return true;
    }
    let equal = equal_members(a, b, visited);
    visited.leave(id);
    equal
}

/// Compares the members of two containers of the same kind.
fn equal_members(a: &Value, b: &Value, visited: &mut VisitedSet) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            let (xs, ys) = (x.borrow(), y.borrow());
            let equal = xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(l, r)| equal_node(l, r, visited));
            equal
        }
        (Value::Object(x), Value::Object(y)) => {
            let (xs, ys) = (x.borrow(), y.borrow());
            let equal = xs.len() == ys.len()
                && xs.iter().all(|(key, l)| match ys.get(key) {
                    Some(r) => equal_node(l, r, visited),
                    None => false,
                });
            equal
        }
        (Value::Map(x), Value::Map(y)) => {
            let (xs, ys) = (x.borrow(), y.borrow());
            if xs.len() != ys.len() {
                return false;
            }
            let mut used = vec![false; ys.len()];
            let equal = xs.iter().all(|(key, l)| {
                let exact = ys.index_of(key);
                match claim(ys.keys(), exact, key, &mut used, visited) {
                    Some(i) => match ys.get_index(i) {
                        Some((_, r)) => equal_node(l, r, visited),
                        None => false,
                    },
                    None => false,
                }
            });
            equal
        }
        (Value::Set(x), Value::Set(y)) => {
            let (xs, ys) = (x.borrow(), y.borrow());
            if xs.len() != ys.len() {
                return false;
            }
            let mut used = vec![false; ys.len()];
            let equal = xs.iter().all(|member| {
                let exact = ys.index_of(member);
                claim(ys.iter(), exact, member, &mut used, visited).is_some()
            });
            equal
        }
        _ => false,
    }
}

/// Claims the right-hand key or member matching `wanted`.
///
/// Each right-hand position can be claimed once, so two structurally equal
/// left members need two matching right members. The exact (SameValueZero)
/// match found by hashing wins. A composite otherwise claims the first
/// unclaimed structurally equal candidate, so matching is greedy in
/// right-hand insertion order.
fn claim<'a, I>(
    candidates: I,
    exact: Option<usize>,
    wanted: &Value,
    used: &mut [bool],
    visited: &mut VisitedSet,
) -> Option<usize>
where
    I: Iterator<Item = &'a Value>,
{
    let index = match exact {
        Some(i) if !used[i] => Some(i),
        _ if wanted.node_id().is_some() => candidates
            .enumerate()
            .position(|(i, c)| !used[i] && equal_node(wanted, c, visited)),
        _ => None,
    }?;
    used[index] = true;
    Some(index)
}
