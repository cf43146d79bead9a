//! Deserialization from a [`Value`] tree into Rust types.
//!
//! Text never goes straight into a `Deserialize` impl: it is parsed and decoded
//! into a [`Value`] first (see [`from_str`](crate::from_str)), and that tree is
//! handed to a [`ValueDeserializer`].
//!
//! ## Binary Data
//!
//! - [`Value::Bytes`] is offered to visitors as a byte buffer, and as a
//!   sequence of `u8` when the target asks for a sequence (`Vec<u8>`).
//! - A [`Value::Binary`] that was never decoded is decoded on the spot. If the
//!   payload is malformed the visitor sees the raw payload as a string.
//!
//! ```rust
//! use serde_bxson::{from_value, parse};
//!
//! let tree = parse("b64{aGVsbG8}").unwrap();
//! let bytes: Vec<u8> = from_value(tree).unwrap();
//! assert_eq!(bytes, b"hello");
//! ```
//!
//! ## Enums
//!
//! Unit variants are read from strings; variants carrying data are read from
//! single-entry objects keyed by the variant name.

use crate::value::Number;
use crate::{BxsonMap, Error, Result, Value};
use num_bigint::BigInt;
use serde::de::{self, Deserializer as _, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Deserializes a `T` out of a [`Value`] tree.
///
/// # Errors
///
/// Returns [`Error::Custom`] when the tree does not have the shape `T` expects.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{bxson, from_value};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_value(bxson!({"x": 1, "y": 2})).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// A `serde` deserializer that owns a [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
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

fn visit_big_int<'de, V>(bi: BigInt, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    if let Ok(u) = u64::try_from(&bi) {
        return visitor.visit_u64(u);
    }
    if let Ok(i) = i128::try_from(&bi) {
        return visitor.visit_i128(i);
    }
    if let Ok(u) = u128::try_from(&bi) {
        return visitor.visit_u128(u);
    }
    visitor.visit_string(bi.to_string())
}

fn byte_seq(bytes: Vec<u8>) -> SeqDeserializer {
    SeqDeserializer::new(
        bytes
            .into_iter()
            .map(|b| Value::Number(Number::Integer(i64::from(b))))
            .collect(),
    )
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::BigInt(bi)) => visit_big_int(bi, visitor),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Binary(lit) => match lit.decode() {
                Ok(bytes) => visitor.visit_byte_buf(bytes),
                Err(_) => visitor.visit_string(lit.payload),
            },
            Value::Bytes(bytes) => visitor.visit_byte_buf(bytes),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bytes(bytes) => visitor.visit_seq(byte_seq(bytes)),
            Value::Binary(lit) => match lit.decode() {
                Ok(bytes) => visitor.visit_seq(byte_seq(bytes)),
                Err(_) => visitor.visit_string(lit.payload),
            },
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
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
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) => {
                let mut entries = obj.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, value))
                    }
                    _ => Err(Error::custom("Expected enum variant")),
                }
            }
            _ => Err(Error::custom("Expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple_struct map struct identifier
        ignored_any
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
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: BxsonMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
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
                seed.deserialize(KeyDeserializer { key }).map(Some)
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

/// Object keys are always strings; numeric map keys are parsed back out of them.
struct KeyDeserializer {
    key: String,
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.key.parse::<$ty>() {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => visitor.visit_string(self.key),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    deserialize_parsed_key! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
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
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        i128 u128 f32 f64 char str string bytes byte_buf option unit
        unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
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
        let variant = seed.deserialize(KeyDeserializer { key: self.variant })?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::parse;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Record {
        id: u32,
        name: String,
        tags: Vec<String>,
        score: Option<f64>,
    }

    #[test]
    fn test_struct_from_tree() {
        let tree = parse(r#"{"id": 7, "name": "a", "tags": ["x"], "score": null}"#).unwrap();
        let record: Record = from_value(tree).unwrap();
        assert_eq!(
            record,
            Record {
                id: 7,
                name: "a".to_string(),
                tags: vec!["x".to_string()],
                score: None,
            }
        );
    }

    #[test]
    fn test_integer_into_float_field() {
        let score: f64 = from_value(Value::from(3)).unwrap();
        assert_eq!(score, 3.0);
    }

    #[test]
    fn test_big_integers() {
        let tree = parse("[18446744073709551615, -9223372036854775809]").unwrap();
        let (a, b): (u64, i128) = from_value(tree).unwrap();
        assert_eq!(a, u64::MAX);
        assert_eq!(b, i64::MIN as i128 - 1);
    }

    #[test]
    fn test_bytes_as_vec() {
        let bytes: Vec<u8> = from_value(Value::bytes(vec![1u8, 2, 3])).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);

        let bytes: Vec<u8> = from_value(Value::binary(Encoding::Base58, "3yZe7d")).unwrap();
        assert_eq!(bytes, b"test");
    }

    #[test]
    fn test_malformed_binary_reads_as_string() {
        let text: String = from_value(Value::binary(Encoding::Base58, "0OIl")).unwrap();
        assert_eq!(text, "0OIl");
    }

    #[test]
    fn test_enum_shapes() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Shape {
            Unit,
            Circle(f64),
            Pair(i32, i32),
            Rect { w: u32, h: u32 },
        }

        let shapes: Vec<Shape> = from_value(
            parse(r#"["Unit", {"Circle": 1.5}, {"Pair": [1, 2]}, {"Rect": {"w": 2, "h": 3}}]"#)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(
            shapes,
            vec![
                Shape::Unit,
                Shape::Circle(1.5),
                Shape::Pair(1, 2),
                Shape::Rect { w: 2, h: 3 },
            ]
        );

        let err = from_value::<Shape>(parse(r#"{"Circle": 1, "Unit": null}"#).unwrap());
        assert!(err.is_err());
    }

    #[test]
    fn test_numeric_map_keys() {
        let map: BTreeMap<u32, bool> = from_value(parse(r#"{"1": true, "20": false}"#).unwrap())
            .unwrap();
        assert_eq!(map.get(&20), Some(&false));
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let result = from_value::<Record>(Value::from("not an object"));
        assert!(matches!(result, Err(Error::Custom(_))));
    }
}
