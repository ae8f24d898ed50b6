//! Deserialization from value graphs into Rust data.
//!
//! [`from_value`] drives any `T: DeserializeOwned` from a [`Value`]. Records
//! and maps are presented as serde maps, arrays and sets as sequences, and
//! dates, patterns and out-of-range big integers as strings. Undefined
//! record fields are skipped, so `#[serde(default)]` and `Option` fields
//! behave as if the field were absent.
//!
//! ```rust
//! use deep_value::{from_value, value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct User {
//!     name: String,
//!     nickname: Option<String>,
//!     roles: Vec<String>,
//! }
//!
//! let v = value!({ "name": "Alice", "nickname": undefined, "roles": ["admin"] });
//! let user: User = from_value(&v).unwrap();
//! assert_eq!(user.nickname, None);
//! assert_eq!(user.roles, vec!["admin".to_string()]);
//! ```

use crate::deep::find_cycle;
use crate::{Error, Number, Result, Value};
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;
use tracing::trace;

/// Deserializes an instance of `T` from a value graph.
///
/// # Errors
///
/// Returns [`Error::Circular`] if `value` contains a reference cycle, and a
/// custom error if the graph does not have the shape `T` expects.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: &Value) -> Result<T>
where
    T: DeserializeOwned,
{
    if let Some(node) = find_cycle(value) {
        trace!(node = %node, "from_value: input is cyclic");
        return Err(Error::circular(node));
    }
    T::deserialize(ValueDeserializer::new(value.clone()))
}

/// Deserializer over an owned [`Value`].
///
/// Composite members are cloned out of their shared nodes one level at a
/// time, so the input graph must be acyclic. [`from_value`] checks this.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::Number(Number::Infinity) => visitor.visit_f64(f64::INFINITY),
            Value::Number(Number::NegativeInfinity) => visitor.visit_f64(f64::NEG_INFINITY),
            Value::Number(Number::NaN) => visitor.visit_f64(f64::NAN),
            Value::BigInt(bi) => {
                if let Ok(i) = i64::try_from(&bi) {
                    visitor.visit_i64(i)
                } else if let Ok(u) = u64::try_from(&bi) {
                    visitor.visit_u64(u)
                } else if let Ok(i) = i128::try_from(&bi) {
                    visitor.visit_i128(i)
                } else {
                    visitor.visit_string(bi.to_string())
                }
            }
            Value::String(s) => visitor.visit_string(s),
            Value::Date(dt) => visitor.visit_string(dt.to_rfc3339()),
            Value::Pattern(p) => visitor.visit_string(p.to_string()),
            Value::Array(a) => {
                let items = a.borrow().clone();
                visitor.visit_seq(SeqDeserializer::new(items))
            }
            Value::Set(s) => {
                let members: Vec<Value> = s.borrow().iter().cloned().collect();
                visitor.visit_seq(SeqDeserializer::new(members))
            }
            Value::Object(o) => {
                let entries: Vec<(Value, Value)> = o
                    .borrow()
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (Value::String(k.clone()), v.clone()))
                    .collect();
                visitor.visit_map(MapDeserializer::new(entries))
            }
            Value::Map(m) => {
                let entries: Vec<(Value, Value)> = m
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                visitor.visit_map(MapDeserializer::new(entries))
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.value.is_nullish() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Object(o) => {
                let tagged = {
                    let fields = o.borrow();
                    match fields.len() {
                        1 => fields.iter().next().map(|(k, v)| (k.clone(), v.clone())),
                        _ => None,
                    }
                };
                match tagged {
                    Some((variant, inner)) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, Some(inner)))
                    }
                    None => Err(Error::custom(
                        "expected an object with a single key naming the variant",
                    )),
                }
            }
            other => Err(Error::type_mismatch("enum", other.kind_name())),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: std::vec::IntoIter<(Value, Value)>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(entries: Vec<(Value, Value)>) -> Self {
        MapDeserializer {
            iter: entries.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(v) if v.is_nullish() => Ok(()),
            Some(other) => Err(Error::type_mismatch("unit variant", other.kind_name())),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(value @ Value::Array(_)) => de::Deserializer::deserialize_any(
                ValueDeserializer::new(value),
                visitor,
            ),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(value @ Value::Object(_)) => de::Deserializer::deserialize_any(
                ValueDeserializer::new(value),
                visitor,
            ),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_value, value, EntryMap};
    use serde::{Deserialize, Serialize};
    use std::collections::{BTreeSet, HashMap};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    enum Shape {
        Unit,
        Circle(f64),
        Rect { w: i32, h: i32 },
        Pair(i32, i32),
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Config {
        host: String,
        #[serde(default)]
        port: u16,
    }

    #[test]
    fn test_primitives() {
        assert_eq!(from_value::<i32>(&Value::from(42)).unwrap(), 42);
        assert_eq!(from_value::<f64>(&Value::from(1.5)).unwrap(), 1.5);
        assert!(from_value::<bool>(&Value::from(true)).unwrap());
        assert_eq!(from_value::<String>(&Value::from("hi")).unwrap(), "hi");
        assert!(from_value::<()>(&Value::Undefined).is_ok());
    }

    #[test]
    fn test_enums() {
        for shape in [
            Shape::Unit,
            Shape::Circle(2.0),
            Shape::Rect { w: 1, h: 2 },
            Shape::Pair(3, 4),
        ] {
            let v = to_value(&shape).unwrap();
            assert_eq!(from_value::<Shape>(&v).unwrap(), shape);
        }
        assert!(from_value::<Shape>(&value!({ "Circle": 1, "Unit": null })).is_err());
        assert!(from_value::<Shape>(&value!(7)).is_err());
    }

    #[test]
    fn test_undefined_fields_are_absent() {
        let v = value!({ "host": "localhost", "port": undefined });
        let config: Config = from_value(&v).unwrap();
        assert_eq!(
            config,
            Config {
                host: "localhost".to_string(),
                port: 0
            }
        );
    }

    #[test]
    fn test_options() {
        assert_eq!(from_value::<Option<i32>>(&Value::Null).unwrap(), None);
        assert_eq!(from_value::<Option<i32>>(&Value::Undefined).unwrap(), None);
        assert_eq!(from_value::<Option<i32>>(&Value::from(3)).unwrap(), Some(3));
    }

    #[test]
    fn test_sets_and_maps() {
        let set = Value::set(vec![Value::from(2), Value::from(1)].into_iter().collect());
        let members: BTreeSet<i64> = from_value(&set).unwrap();
        assert_eq!(members.into_iter().collect::<Vec<_>>(), vec![1, 2]);

        let mut entries = EntryMap::new();
        entries.insert(Value::from("a"), Value::from(1));
        let map: HashMap<String, i64> = from_value(&Value::map(entries)).unwrap();
        assert_eq!(map.get("a"), Some(&1));
    }

    #[test]
    fn test_bigint_fits_u64() {
        let big = to_value(&u64::MAX).unwrap();
        assert_eq!(from_value::<u64>(&big).unwrap(), u64::MAX);
    }

    #[test]
    fn test_shared_nodes_are_fine() {
        let shared = value!([1, 2]);
        let v = Value::array(vec![shared.clone(), shared]);
        let out: Vec<Vec<i32>> = from_value(&v).unwrap();
        assert_eq!(out, vec![vec![1, 2], vec![1, 2]]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let v = value!([1]);
        v.push(v.clone());
        let result: Result<Vec<Value>> = from_value(&v);
        assert!(matches!(result, Err(Error::Circular { .. })));
    }
}
