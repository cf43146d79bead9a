//! Dynamic value representation for BXSON data.
//!
//! This module provides the [`Value`] enum, the in-memory tree a document
//! parses into and the serializer renders from.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, number, string, array, object, plus the two binary forms
//! - [`Number`]: integers (machine-sized or arbitrary precision) and floats
//! - [`BinaryLiteral`]: an undecoded `b32{…}` / `b58{…}` / `b64{…}` block
//!
//! ## Binary Data
//!
//! Binary data has two shapes in a tree. Parsing yields [`Value::Binary`],
//! which still holds the payload text exactly as written. [`decode`](crate::decode)
//! turns each of those into [`Value::Bytes`]; [`encode`](crate::encode) goes the
//! other way, and rendering encodes any remaining bytes on the fly.
//!
//! ```rust
//! use serde_bxson::{decode, parse, Value};
//!
//! let tree = parse(r#"{"key": b64{aGVsbG8}}"#).unwrap();
//! assert!(tree.as_object().unwrap().get("key").unwrap().is_binary());
//!
//! let resolved = decode(&tree);
//! assert_eq!(
//!     resolved.as_object().unwrap().get("key").and_then(Value::as_bytes),
//!     Some(&b"hello"[..])
//! );
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use serde_bxson::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::encoding::Encoding;
use crate::error::PayloadError;
use crate::BxsonMap;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed representation of any BXSON value.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{Encoding, Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let blob = Value::binary(Encoding::Base64, "aGVsbG8");
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(blob.is_binary());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(BxsonMap),
    /// A binary block as written, not yet decoded.
    Binary(BinaryLiteral),
    /// Raw bytes, produced by decoding or supplied by the application.
    Bytes(Vec<u8>),
}

/// A numeric value. Integer vs float is fixed by how the literal was written.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::Number;
///
/// assert!(Number::Integer(42).is_integer());
/// assert!(Number::Float(1.0).is_float());
/// assert_eq!(Number::Float(3.5).as_f64(), Some(3.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    /// An integer literal too large for `i64`.
    BigInt(BigInt),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns the value as `i64` if it is an integer that fits.
    ///
    /// Floats are never converted, even when they have no fractional part.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::BigInt(bi) => i64::try_from(bi).ok(),
            Number::Float(_) => None,
        }
    }

    /// Returns the value as `f64`. Big integers that do not fit yield `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(i) => Some(*i as f64),
            Number::BigInt(bi) => bi.to_string().parse().ok(),
            Number::Float(f) => Some(*f),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::BigInt(bi) => write!(f, "{}", bi),
            Number::Float(fl) => f.write_str(&crate::ser::format_float(*fl)),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(value),
        }
    }
}

/// An undecoded binary block: its encoding and its whitespace-trimmed payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryLiteral {
    pub encoding: Encoding,
    pub payload: String,
}

impl BinaryLiteral {
    pub fn new(encoding: Encoding, payload: impl Into<String>) -> Self {
        BinaryLiteral {
            encoding,
            payload: payload.into(),
        }
    }

    /// Encodes `bytes` into a literal of the given encoding.
    pub fn from_bytes(encoding: Encoding, bytes: &[u8]) -> Self {
        BinaryLiteral {
            encoding,
            payload: encoding.encode(bytes),
        }
    }

    /// Whether the payload renders back to the same literal: no `}` and no
    /// surrounding whitespace.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        !self.payload.contains('}') && self.payload.trim() == self.payload
    }

    /// Decodes the payload.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] if the payload is not valid in its alphabet.
    pub fn decode(&self) -> std::result::Result<Vec<u8>, PayloadError> {
        self.encoding.decode(&self.payload)
    }
}

impl fmt::Display for BinaryLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}}}", self.encoding.opener(), self.payload)
    }
}

impl Value {
    /// Wraps raw bytes.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    /// Builds an undecoded binary literal.
    ///
    /// The payload is stored as given. It must not contain `}` or carry
    /// surrounding whitespace, or the rendered block will not parse back to the
    /// same literal.
    pub fn binary(encoding: Encoding, payload: impl Into<String>) -> Self {
        Value::Binary(BinaryLiteral::new(encoding, payload))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
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
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
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

    /// Returns `true` for an undecoded binary literal.
    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    /// Returns `true` for resolved bytes.
    #[inline]
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
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

    /// If the value is an integer that fits in `i64`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bxson::{Value, Number};
    ///
    /// assert_eq!(Value::Number(Number::Integer(42)).as_i64(), Some(42));
    /// assert_eq!(Value::Number(Number::Float(42.0)).as_i64(), None);
    /// ```
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
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&BxsonMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_binary(&self) -> Option<&BinaryLiteral> {
        match self {
            Value::Binary(lit) => Some(lit),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Renders the value as compact BXSON, encoding raw bytes as Base64.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ser::render(self, None))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::BigInt(bi)) => match i128::try_from(bi) {
                Ok(i) => serializer.serialize_i128(i),
                Err(_) => match u128::try_from(bi) {
                    Ok(u) => serializer.serialize_u128(u),
                    Err(_) => serializer.serialize_str(&bi.to_string()),
                },
            },
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Binary(lit) => match lit.decode() {
                Ok(bytes) => serializer.serialize_bytes(&bytes),
                Err(_) => serializer.serialize_str(&lit.payload),
            },
            Value::Bytes(bytes) => serializer.serialize_bytes(bytes),
        }
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
                formatter.write_str("any valid BXSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(BigInt::from(value))))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(BigInt::from(value))))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(BigInt::from(value))))
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

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Value::Bytes(value))
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
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = BxsonMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::custom(format!("expected integer, found {:?}", value)))
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| crate::Error::custom(format!("expected number, found {:?}", value)))
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

/// Accepts resolved bytes, or a binary literal whose payload decodes.
impl TryFrom<Value> for Vec<u8> {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bytes(bytes) => Ok(bytes),
            Value::Binary(lit) => lit.decode().map_err(crate::Error::custom),
            _ => Err(crate::Error::custom(format!(
                "expected binary data, found {:?}",
                value
            ))),
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

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Number(Number::from(value))
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

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<BxsonMap> for Value {
    fn from(value: BxsonMap) -> Self {
        Value::Object(value)
    }
}

impl From<BinaryLiteral> for Value {
    fn from(value: BinaryLiteral) -> Self {
        Value::Binary(value)
    }
}
