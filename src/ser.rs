//! Serde serialization bridges.
//!
//! - [`ValueSerializer`] turns any `T: Serialize` into a [`Value`] tree
//!   (see [`to_value`](crate::to_value)).
//! - `Serialize for Value` writes a value graph through any serde format.
//!   Serde formats are trees, so a reference cycle on the current path is
//!   an error; a node merely shared by two parents is written twice.
//!
//! ## Representation
//!
//! | Value | serde |
//! |-------|-------|
//! | undefined, null | unit (undefined record fields are skipped) |
//! | date | RFC 3339 string |
//! | pattern | `/text/flags` string |
//! | bigint | decimal string |
//! | map | map with value keys |
//! | set | sequence |
//!
//! ```rust
//! use deep_value::value;
//!
//! let v = value!({ "name": "Alice", "gone": undefined, "tags": [1, 2] });
//! let json = serde_json::to_string(&v).unwrap();
//! assert_eq!(json, r#"{"name":"Alice","tags":[1,2]}"#);
//! ```

use crate::shared::NodeId;
use crate::{Error, Number, ObjectMap, Result, Value};
use num_bigint::BigInt;
use serde::ser::{SerializeMap as _, SerializeSeq as _};
use serde::{ser, Serialize, Serializer};
use std::cell::RefCell;
use tracing::trace;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let path = RefCell::new(Vec::new());
        Guarded { value: self, path: &path }.serialize(serializer)
    }
}

/// A value together with the nodes currently being written above it.
struct Guarded<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<NodeId>>,
}

impl<'a> Guarded<'a> {
    fn child(&self, value: &'a Value) -> Guarded<'a> {
        Guarded {
            value,
            path: self.path,
        }
    }
}

impl Serialize for Guarded<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let id = self.value.node_id();
        if let Some(id) = id {
            if self.path.borrow().contains(&id) {
                trace!(node = %id, "refusing to serialize a cycle");
                return Err(ser::Error::custom(Error::circular(id)));
            }
            self.path.borrow_mut().push(id);
        }

        let result = self.serialize_node(serializer);

        if id.is_some() {
            self.path.borrow_mut().pop();
        }
        result
    }
}

impl Guarded<'_> {
    fn serialize_node<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::Number(Number::Infinity) => serializer.serialize_f64(f64::INFINITY),
            Value::Number(Number::NegativeInfinity) => serializer.serialize_f64(f64::NEG_INFINITY),
            Value::Number(Number::NaN) => serializer.serialize_f64(f64::NAN),
            Value::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Pattern(p) => serializer.serialize_str(&p.to_string()),
            Value::Array(a) => {
                let items = a.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Object(o) => {
                let fields = o.borrow();
                let present = fields.values().filter(|v| !v.is_undefined()).count();
                let mut map = serializer.serialize_map(Some(present))?;
                for (key, item) in fields.iter().filter(|(_, v)| !v.is_undefined()) {
                    map.serialize_entry(key, &self.child(item))?;
                }
                map.end()
            }
            Value::Map(m) => {
                let entries = m.borrow();
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries.iter() {
                    map.serialize_entry(&self.child(key), &self.child(item))?;
                }
                map.end()
            }
            Value::Set(s) => {
                let members = s.borrow();
                let mut seq = serializer.serialize_seq(Some(members.len()))?;
                for member in members.iter() {
                    seq.serialize_element(&self.child(member))?;
                }
                seq.end()
            }
        }
    }
}

/// Serializer producing a [`Value`] tree from Rust data.
///
/// Structs and string-keyed maps become objects, sequences and tuples become
/// arrays, `None` and `()` become null, and enum variants with data are
/// externally tagged (`{ "Variant": data }`).
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: ObjectMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn tagged(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut object = ObjectMap::with_capacity(1);
            object.insert(name.to_string(), value);
            Value::object(object)
        }
        None => value,
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(Number::Float(v as f64)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let vec = v
            .iter()
            .map(|&b| Value::Number(Number::Integer(b as i64)))
            .collect();
        Ok(Value::array(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(Some(variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        tagged(self.variant, Value::array(self.vec))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: ObjectMap::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        tagged(self.variant, Value::object(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::BigInt(bi) => bi.to_string(),
            other => {
                return Err(Error::unsupported_type(&format!(
                    "{} as a record key",
                    other.kind_name()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Converts any `T: Serialize` into a [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use deep_value::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// assert_eq!(value.get("x"), Some(Value::from(1)));
/// ```
///
/// # Errors
///
/// Returns an error if a map key cannot be represented as a string or if a
/// `Serialize` impl reports a custom error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, EntryMap, ValueSet};
    use serde::Serialize;

    #[derive(Serialize)]
    enum Shape {
        Unit,
        Circle(f64),
        Rect { w: i32, h: i32 },
        Pair(i32, i32),
    }

    #[test]
    fn test_enum_variants_are_externally_tagged() {
        assert_eq!(to_value(&Shape::Unit).unwrap(), Value::from("Unit"));
        assert_eq!(
            to_value(&Shape::Circle(1.5)).unwrap(),
            value!({ "Circle": 1.5 })
        );
        assert_eq!(
            to_value(&Shape::Rect { w: 2, h: 3 }).unwrap(),
            value!({ "Rect": { "w": 2, "h": 3 } })
        );
        assert_eq!(
            to_value(&Shape::Pair(1, 2)).unwrap(),
            value!({ "Pair": [1, 2] })
        );
    }

    #[test]
    fn test_large_integers_become_bigint() {
        assert!(to_value(&u64::MAX).unwrap().is_bigint());
        assert_eq!(to_value(&7u64).unwrap(), Value::from(7));
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1], 1);
        let err = to_value(&map).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        assert!(err.to_string().contains("record key"));

        let mut map = std::collections::BTreeMap::new();
        map.insert(1, "one");
        assert_eq!(to_value(&map).unwrap(), value!({ "1": "one" }));
    }

    #[test]
    fn test_serialize_skips_undefined_fields() {
        let v = value!({ "a": undefined, "b": [undefined] });
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"b":[null]}"#);
    }

    #[test]
    fn test_serialize_rejects_cycles() {
        let v = value!({ "a": 1 });
        v.set_field("self", v.clone());
        let err = serde_json::to_string(&v).unwrap_err();
        assert!(err.to_string().contains("circular"));
    }

    #[test]
    fn test_serialize_allows_shared_nodes() {
        let shared = value!([1]);
        let v = Value::array(vec![shared.clone(), shared]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[[1],[1]]");
    }

    #[test]
    fn test_serialize_special_kinds() {
        let mut entries = EntryMap::new();
        entries.insert(Value::from("k"), Value::from(1));
        let set: ValueSet = vec![Value::from(1), Value::from(2)].into_iter().collect();
        let v = value!({});
        v.set_field("map", Value::map(entries));
        v.set_field("set", Value::set(set));
        v.set_field("re", Value::pattern("a+", "g"));

        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"map":{"k":1},"set":[1,2],"re":"/a+/g"}"#
        );
    }
}
