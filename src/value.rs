//! Dynamic value representation.
//!
//! This module provides the [`Value`] enum, the node type of a value graph.
//! Primitives are stored inline; containers live behind shared handles so
//! that the same node can be reachable from several places, including from
//! itself.
//!
//! ## Core Types
//!
//! - [`Value`]: undefined, null, bool, number, bigint, string, date, pattern,
//!   array, object, map, set
//! - [`Number`]: integers, floats and the special values (Infinity, -Infinity, NaN)
//! - [`Pattern`]: pattern text plus flags
//!
//! ## Creating Values
//!
//! ```rust
//! use deep_value::{value, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = value!({
//!     "name": "Alice",
//!     "tags": ["a", "b"]
//! });
//! assert!(obj.is_object());
//! ```
//!
//! ## Sharing and Cycles
//!
//! Cloning a composite `Value` copies the handle, not the contents. Use
//! [`Value::deep_clone`] for an independent copy:
//!
//! ```rust
//! use deep_value::{value, Value};
//!
//! let original = value!({ "nested": { "b": 2 } });
//! let alias = original.clone();
//! let copy = original.deep_clone();
//!
//! assert_eq!(alias.node_id(), original.node_id());
//! assert_ne!(copy.node_id(), original.node_id());
//! assert_eq!(copy, original);
//! ```

use crate::deep;
use crate::map::{EntryMap, ObjectMap, ValueSet};
use crate::shared::{NodeId, Shared};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Handle to a sequence node.
pub type ArrayRef = Shared<Vec<Value>>;
/// Handle to a plain record node.
pub type ObjectRef = Shared<ObjectMap>;
/// Handle to a keyed-pair container node.
pub type MapRef = Shared<EntryMap>;
/// Handle to a unique-value container node.
pub type SetRef = Shared<ValueSet>;

/// A node of a value graph.
///
/// # Examples
///
/// ```rust
/// use deep_value::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    BigInt(BigInt),
    String(String),
    Date(DateTime<Utc>),
    Pattern(Pattern),
    Array(ArrayRef),
    Object(ObjectRef),
    Map(MapRef),
    Set(SetRef),
}

/// A numeric value: integer, float, or one of the special values.
///
/// Equality follows SameValue semantics: `NaN` equals `NaN`, and positive
/// zero differs from negative zero.
///
/// # Examples
///
/// ```rust
/// use deep_value::Number;
///
/// assert_eq!(Number::NaN, Number::Float(f64::NAN));
/// assert_ne!(Number::Integer(0), Number::Float(-0.0));
/// assert!(Number::Integer(0).same_value_zero(&Number::Float(-0.0)));
/// ```
#[derive(Clone, Debug)]
pub enum Number {
    Integer(i64),
    Float(f64),
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` for Infinity, -Infinity and NaN variants.
    #[inline]
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(
            self,
            Number::Infinity | Number::NegativeInfinity | Number::NaN
        )
    }

    /// Returns `true` for the `NaN` variant and for floats holding NaN.
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        match self {
            Number::NaN => true,
            Number::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Converts this number to an `i64` if it is whole and in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deep_value::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Infinity.as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::Infinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
            Number::NaN => f64::NAN,
        }
    }

    /// SameValue comparison: NaN equals NaN, +0 and -0 differ.
    #[must_use]
    pub fn same_value(&self, other: &Number) -> bool {
        self.compare(other, true)
    }

    /// SameValueZero comparison: NaN equals NaN, +0 and -0 are equal.
    #[must_use]
    pub fn same_value_zero(&self, other: &Number) -> bool {
        self.compare(other, false)
    }

    fn compare(&self, other: &Number, signed_zero: bool) -> bool {
        if let (Number::Integer(a), Number::Integer(b)) = (self, other) {
            return a == b;
        }
        let (a, b) = (self.as_f64(), other.as_f64());
        if a.is_nan() || b.is_nan() {
            return a.is_nan() && b.is_nan();
        }
        a == b && (!signed_zero || a.is_sign_negative() == b.is_sign_negative())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) if fl.is_nan() => write!(f, "NaN"),
            Number::Float(fl) if *fl == 0.0 && fl.is_sign_negative() => write!(f, "-0"),
            Number::Float(fl) => write!(f, "{}", fl),
            Number::Infinity => write!(f, "Infinity"),
            Number::NegativeInfinity => write!(f, "-Infinity"),
            Number::NaN => write!(f, "NaN"),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A pattern-like value: pattern text plus a flag string.
///
/// The text is stored verbatim and never compiled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    flags: String,
}

impl Pattern {
    #[must_use]
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Pattern {
            source: source.into(),
            flags: flags.into(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

impl Value {
    /// Allocates a new array node.
    #[must_use]
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Shared::new(elements))
    }

    /// Allocates a new object node.
    #[must_use]
    pub fn object(fields: ObjectMap) -> Self {
        Value::Object(Shared::new(fields))
    }

    /// Allocates a new map node.
    #[must_use]
    pub fn map(entries: EntryMap) -> Self {
        Value::Map(Shared::new(entries))
    }

    /// Allocates a new set node.
    #[must_use]
    pub fn set(members: ValueSet) -> Self {
        Value::Set(Shared::new(members))
    }

    #[must_use]
    pub fn pattern(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::Pattern(Pattern::new(source, flags))
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null and undefined.
    #[inline]
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Returns `true` for a NaN number.
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bigint(&self) -> bool {
        matches!(self, Value::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Value::Pattern(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Value::Set(_))
    }

    /// Returns `true` for every non-primitive value, inline or shared.
    #[inline]
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            Value::Date(_)
                | Value::Pattern(_)
                | Value::Array(_)
                | Value::Object(_)
                | Value::Map(_)
                | Value::Set(_)
        )
    }

    /// Identity of the node behind a shared composite, `None` otherwise.
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Value::Array(a) => Some(a.id()),
            Value::Object(o) => Some(o.id()),
            Value::Map(m) => Some(m.id()),
            Value::Set(s) => Some(s.id()),
            _ => None,
        }
    }

    /// A short name for the kind of value, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Pattern(_) => "pattern",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is an integer or a whole-number float, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(bi) => Some(bi),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_set(&self) -> Option<&SetRef> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a field of an object value.
    ///
    /// Returns a handle-level clone of the field so that callers can keep
    /// walking the graph without holding a borrow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deep_value::{value, Value};
    ///
    /// let v = value!({ "a": { "b": 2 } });
    /// let b = v.get("a").and_then(|a| a.get("b"));
    /// assert_eq!(b, Some(Value::from(2)));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|o| o.borrow().get(key).cloned())
    }

    /// Returns the element at `index` of an array value.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<Value> {
        self.as_array().and_then(|a| a.borrow().get(index).cloned())
    }

    /// Sets a field on an object value. Returns `false` if `self` is not an object.
    pub fn set_field(&self, key: impl Into<String>, value: Value) -> bool {
        match self {
            Value::Object(o) => {
                o.borrow_mut().insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Appends to an array value. Returns `false` if `self` is not an array.
    pub fn push(&self, value: Value) -> bool {
        match self {
            Value::Array(a) => {
                a.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }

    /// Copies the top-level container into a new node; children are shared.
    #[must_use]
    pub fn shallow_copy(&self) -> Value {
        match self {
            Value::Array(a) => Value::array(a.borrow().clone()),
            Value::Object(o) => Value::object(o.borrow().clone()),
            Value::Map(m) => Value::map(m.borrow().clone()),
            Value::Set(s) => Value::set(s.borrow().clone()),
            other => other.clone(),
        }
    }

    /// SameValue comparison: primitives by value (NaN equals NaN, +0 and -0
    /// differ), shared composites by identity, dates and patterns by content.
    #[must_use]
    pub fn same_value(&self, other: &Value) -> bool {
        self.identical(other, true)
    }

    /// Like [`Value::same_value`] but +0 and -0 are equal.
    #[must_use]
    pub fn same_value_zero(&self, other: &Value) -> bool {
        self.identical(other, false)
    }

    fn identical(&self, other: &Value, signed_zero: bool) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.compare(b, signed_zero),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Deep, cycle-safe copy. See [`crate::clone_deep`].
    #[must_use]
    pub fn deep_clone(&self) -> Value {
        deep::clone_deep(self)
    }

    /// Deep, cycle-safe structural comparison. See [`crate::deep_equal`].
    #[must_use]
    pub fn deep_eq(&self, other: &Value) -> bool {
        deep::deep_equal(self, other)
    }

    /// Whether null, undefined or NaN is reachable. See [`crate::has_nullish`].
    #[must_use]
    pub fn has_nullish(&self) -> bool {
        deep::has_nullish(self)
    }

    /// Whether some node can reach itself. See [`crate::is_cyclic`].
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        deep::is_cyclic(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep::deep_equal(self, other)
    }
}

/// Writes a value, printing `[Circular]` for any node already on the path.
fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, path: &mut Vec<NodeId>) -> fmt::Result {
    if let Some(id) = value.node_id() {
        if path.contains(&id) {
            return f.write_str("[Circular]");
        }
        path.push(id);
    }

    let result = match value {
        Value::Undefined => f.write_str("undefined"),
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", n),
        Value::BigInt(bi) => write!(f, "{}n", bi),
        Value::String(s) => write!(f, "{:?}", s),
        Value::Date(dt) => f.write_str(&dt.to_rfc3339()),
        Value::Pattern(p) => write!(f, "{}", p),
        Value::Array(a) => {
            let items = a.borrow();
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, path)?;
            }
            f.write_str("]")
        }
        Value::Object(o) => {
            let fields = o.borrow();
            if fields.is_empty() {
                f.write_str("{}")
            } else {
                f.write_str("{ ")?;
                for (i, (key, item)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: ", key)?;
                    write_value(f, item, path)?;
                }
                f.write_str(" }")
            }
        }
        Value::Map(m) => {
            let entries = m.borrow();
            write!(f, "Map({}) {{", entries.len())?;
            for (i, (key, item)) in entries.iter().enumerate() {
                f.write_str(if i > 0 { ", " } else { " " })?;
                write_value(f, key, path)?;
                f.write_str(" => ")?;
                write_value(f, item, path)?;
            }
            f.write_str(if entries.is_empty() { "}" } else { " }" })
        }
        Value::Set(s) => {
            let members = s.borrow();
            write!(f, "Set({}) {{", members.len())?;
            for (i, item) in members.iter().enumerate() {
                f.write_str(if i > 0 { ", " } else { " " })?;
                write_value(f, item, path)?;
            }
            f.write_str(if members.is_empty() { "}" } else { " }" })
        }
    };

    if value.node_id().is_some() {
        path.pop();
    }
    result
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Number(Number::Integer(i))),
                    Err(_) => Ok(Value::BigInt(BigInt::from(value))),
                }
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Number(Number::Integer(i))),
                    Err(_) => Ok(Value::BigInt(BigInt::from(value))),
                }
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Number(Number::Integer(i))),
                    Err(_) => Ok(Value::BigInt(BigInt::from(value))),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<Value, Value>()? {
                    entries.push(entry);
                }
                // String keys give a record; anything else needs a keyed map.
                if entries.iter().all(|(k, _)| k.is_string()) {
                    let fields = entries
                        .into_iter()
                        .filter_map(|(k, v)| match k {
                            Value::String(s) => Some((s, v)),
                            _ => None,
                        })
                        .collect();
                    Ok(Value::object(fields))
                } else {
                    Ok(Value::map(entries.into_iter().collect()))
                }
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match &value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| crate::Error::custom(format!("cannot convert {} to i64", n))),
            Value::BigInt(bi) => i64::try_from(bi)
                .map_err(|_| crate::Error::custom(format!("bigint {} out of i64 range", bi))),
            _ => Err(crate::Error::type_mismatch("integer", value.kind_name())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::type_mismatch("number", value.kind_name())),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::type_mismatch("boolean", value.kind_name())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::type_mismatch("string", value.kind_name())),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Pattern> for Value {
    fn from(value: Pattern) -> Self {
        Value::Pattern(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::array(value)
    }
}

impl From<ObjectMap> for Value {
    fn from(value: ObjectMap) -> Self {
        Value::object(value)
    }
}

impl From<EntryMap> for Value {
    fn from(value: EntryMap) -> Self {
        Value::map(value)
    }
}

impl From<ValueSet> for Value {
    fn from(value: ValueSet) -> Self {
        Value::set(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;
    use chrono::TimeZone;

    #[test]
    fn test_tryfrom_i64() {
        let result: i64 = TryFrom::try_from(Value::from(42)).unwrap();
        assert_eq!(result, 42);

        let result: i64 = TryFrom::try_from(Value::from(42.0)).unwrap();
        assert_eq!(result, 42);

        let result: i64 = TryFrom::try_from(Value::BigInt(BigInt::from(7))).unwrap();
        assert_eq!(result, 7);

        assert!(i64::try_from(Value::from("test")).is_err());
        assert!(i64::try_from(Value::from(1.5)).is_err());
    }

    #[test]
    fn test_tryfrom_reports_kind() {
        let err = bool::try_from(Value::Null).unwrap_err();
        assert!(err.to_string().contains("expected boolean, found null"));

        let err = String::try_from(value!([1])).unwrap_err();
        assert!(err.to_string().contains("found array"));
    }

    #[test]
    fn test_number_same_value() {
        assert!(Number::NaN.same_value(&Number::Float(f64::NAN)));
        assert!(!Number::Integer(0).same_value(&Number::Float(-0.0)));
        assert!(Number::Float(-0.0).same_value(&Number::Float(-0.0)));
        assert!(Number::Integer(3).same_value(&Number::Float(3.0)));
        assert!(Number::Infinity.same_value(&Number::Float(f64::INFINITY)));
        assert!(!Number::Infinity.same_value(&Number::NegativeInfinity));
    }

    #[test]
    fn test_value_same_value_uses_identity_for_composites() {
        let a = value!({ "x": 1 });
        let b = value!({ "x": 1 });
        assert!(a.same_value(&a.clone()));
        assert!(!a.same_value(&b));
        assert!(Value::Null.same_value(&Value::Null));
        assert!(!Value::Null.same_value(&Value::Undefined));
    }

    #[test]
    fn test_node_id_only_for_shared() {
        assert!(value!([]).node_id().is_some());
        assert!(Value::from(1).node_id().is_none());
        assert!(Value::pattern("a", "g").node_id().is_none());
        assert!(Value::pattern("a", "g").is_composite());
    }

    #[test]
    fn test_display_marks_cycles() {
        let obj = value!({ "a": 1 });
        obj.set_field("self", obj.clone());
        assert_eq!(obj.to_string(), "{ a: 1, self: [Circular] }");

        let arr = value!([1, 2]);
        arr.push(arr.clone());
        assert_eq!(format!("{:?}", arr), "[1, 2, [Circular]]");
    }

    #[test]
    fn test_display_shared_siblings_are_not_cycles() {
        let shared = value!({ "v": 1 });
        let outer = Value::array(vec![shared.clone(), shared]);
        assert_eq!(outer.to_string(), "[{ v: 1 }, { v: 1 }]");
    }

    #[test]
    fn test_display_containers() {
        let mut entries = EntryMap::new();
        entries.insert(Value::from("k"), Value::from(1));
        assert_eq!(Value::map(entries).to_string(), "Map(1) { \"k\" => 1 }");
        assert_eq!(Value::set(ValueSet::new()).to_string(), "Set(0) {}");
        assert_eq!(Value::pattern("ab+c", "gi").to_string(), "/ab+c/gi");

        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_shallow_copy_shares_children() {
        let original = value!({ "nested": { "b": 2 } });
        let copy = original.shallow_copy();
        assert_ne!(copy.node_id(), original.node_id());
        assert_eq!(
            copy.get("nested").and_then(|v| v.node_id()),
            original.get("nested").and_then(|v| v.node_id())
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
