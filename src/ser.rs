//! BXSON serialization.
//!
//! Two halves live here:
//!
//! - the **renderer** ([`render`], [`render_with_options`], [`render_to_writer`])
//!   which writes a [`Value`] tree as canonical BXSON text, and
//! - the **value serializer** ([`ValueSerializer`]) which turns any
//!   `T: Serialize` into a [`Value`] tree, see [`to_value`](crate::to_value).
//!
//! ## Output Shape
//!
//! - **Compact** (`indent: None`): no whitespace between tokens.
//! - **Indented** (`indent: Some(n)`): one entry per line, `n` spaces per level,
//!   one space after each colon.
//! - Empty containers are always `{}` and `[]`.
//! - Object members come out in the map's insertion order.
//! - Raw bytes are encoded on the way out with the options' encoding (Base64 by
//!   default), so the text never needs a separate [`encode`](crate::encode) pass.
//! - A binary block whose payload is longer than 60 characters gets its payload
//!   on a line of its own in indented mode.
//! - That payload line is indented one level past the line holding the block,
//!   and the closing `}` goes back to that line's indent. Inside an object this
//!   is the member's line, not the container's opening brace.
//! - Payloads are written verbatim. A literal whose payload holds `}` or
//!   surrounding whitespace is logged at `warn` level, since the text will not
//!   parse back to it.
//!
//! ```rust
//! use serde_bxson::{parse, render};
//!
//! let value = parse(r#"{"name": "x", "blob": b64{aGVsbG8}, "tags": []}"#).unwrap();
//! assert_eq!(render(&value, None), r#"{"name":"x","blob":b64{aGVsbG8},"tags":[]}"#);
//! assert_eq!(
//!     render(&value, Some(2)),
//!     "{\n  \"name\": \"x\",\n  \"blob\": b64{aGVsbG8},\n  \"tags\": []\n}"
//! );
//! ```

use crate::encoding::Encoding;
use crate::value::{BinaryLiteral, Number};
use crate::{BxsonMap, BxsonOptions, Error, Result, Value};
use serde::{ser, Serialize};
use std::io;

/// Payloads up to this many characters stay on the line of their block.
pub const INLINE_BINARY_LIMIT: usize = 60;

/// Renders a tree as BXSON text.
///
/// `indent` of `None` gives compact output, `Some(n)` indents by `n` spaces
/// per level. Raw bytes are written as Base64 blocks.
#[must_use]
pub fn render(value: &Value, indent: Option<usize>) -> String {
    let options = BxsonOptions {
        indent,
        ..BxsonOptions::default()
    };
    render_with_options(value, &options)
}

/// Renders a tree as BXSON text with full control over the output options.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{render_with_options, BxsonOptions, Encoding, Value};
///
/// let options = BxsonOptions::new().with_encoding(Encoding::Base32);
/// let text = render_with_options(&Value::bytes(b"test".to_vec()), &options);
/// assert_eq!(text, "b32{ORSXG5A}");
/// ```
#[must_use]
pub fn render_with_options(value: &Value, options: &BxsonOptions) -> String {
    let mut renderer = Renderer::new(options);
    renderer.write_value(value, 0);
    renderer.into_inner()
}

/// Renders a tree and writes the text to `writer`.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn render_to_writer<W>(mut writer: W, value: &Value, indent: Option<usize>) -> Result<()>
where
    W: io::Write,
{
    writer
        .write_all(render(value, indent).as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Formats a float so that it reads back as a float.
///
/// Uses the shortest round-trip representation, which always carries a `.` or
/// an exponent. Non-finite values have no literal and become `null`.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() {
        format!("{:?}", f)
    } else {
        "null".to_string()
    }
}

struct Renderer<'o> {
    output: String,
    options: &'o BxsonOptions,
}

impl<'o> Renderer<'o> {
    fn new(options: &'o BxsonOptions) -> Self {
        Renderer {
            output: String::with_capacity(256),
            options,
        }
    }

    fn into_inner(self) -> String {
        self.output
    }

    fn write_newline(&mut self, level: usize) {
        if let Some(width) = self.options.indent {
            self.output.push('\n');
            self.output
                .extend(std::iter::repeat(' ').take(width * level));
        }
    }

    fn write_value(&mut self, value: &Value, level: usize) {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.write_number(n),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => self.write_array(items, level),
            Value::Object(map) => self.write_object(map, level),
            Value::Binary(lit) => {
                if !lit.is_renderable() {
                    log::warn!("binary payload {:?} will not parse back as written", lit.payload);
                }
                self.write_binary(lit.encoding, &lit.payload, level);
            }
            Value::Bytes(bytes) => {
                let lit = BinaryLiteral::from_bytes(self.options.encoding, bytes);
                self.write_binary(lit.encoding, &lit.payload, level);
            }
        }
    }

    fn write_number(&mut self, n: &Number) {
        match n {
            Number::Integer(i) => self.output.push_str(&i.to_string()),
            Number::BigInt(bi) => self.output.push_str(&bi.to_string()),
            Number::Float(f) => self.output.push_str(&format_float(*f)),
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{0008}' => self.output.push_str("\\b"),
                '\u{000C}' => self.output.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    self.output.push_str(&format!("\\u{:04x}", c as u32));
                }
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }

    fn write_array(&mut self, items: &[Value], level: usize) {
        if items.is_empty() {
            self.output.push_str("[]");
            return;
        }

        self.output.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline(level + 1);
            self.write_value(item, level + 1);
        }
        self.write_newline(level);
        self.output.push(']');
    }

    fn write_object(&mut self, map: &BxsonMap, level: usize) {
        if map.is_empty() {
            self.output.push_str("{}");
            return;
        }

        self.output.push('{');
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline(level + 1);
            self.write_string(key);
            self.output.push(':');
            if self.options.indent.is_some() {
                self.output.push(' ');
            }
            self.write_value(value, level + 1);
        }
        self.write_newline(level);
        self.output.push('}');
    }

    fn write_binary(&mut self, encoding: Encoding, payload: &str, level: usize) {
        self.output.push_str(encoding.opener());
        if payload.len() > INLINE_BINARY_LIMIT && self.options.indent.is_some() {
            self.write_newline(level + 1);
            self.output.push_str(payload);
            self.write_newline(level);
        } else {
            self.output.push_str(payload);
        }
        self.output.push('}');
    }
}

/// Serializer producing a [`Value`] tree instead of text.
///
/// Byte buffers (`serialize_bytes`) become [`Value::Bytes`]; enum variants
/// carrying data become single-entry objects keyed by the variant name.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: BxsonMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn tagged(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut map = BxsonMap::with_capacity(1);
            map.insert(name.to_string(), value);
            Value::Object(map)
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
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::from(num_bigint::BigInt::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(num_bigint::BigInt::from(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::from(num_bigint::BigInt::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(v as f64)
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
        Ok(Value::Bytes(v.to_vec()))
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
        Ok(tagged(Some(variant), value.serialize(ValueSerializer)?))
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

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::Array(self.vec)))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: BxsonMap::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::Object(self.map)))
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
        self.finish()
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
        self.finish()
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
        self.finish()
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
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match key.serialize(ValueSerializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(Error::custom("Map keys must be strings")),
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
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_compact_rendering() {
        let value = parse(r#"[1, 2.5, true, null, "a\"b", {"k": []}]"#).unwrap();
        assert_eq!(render(&value, None), r#"[1,2.5,true,null,"a\"b",{"k":[]}]"#);
    }

    #[test]
    fn test_indented_rendering() {
        let value = parse(r#"{"a": [1, {"b": null}], "c": {}}"#).unwrap();
        let expected = "{\n    \"a\": [\n        1,\n        {\n            \"b\": null\n        }\n    ],\n    \"c\": {}\n}";
        assert_eq!(render(&value, Some(4)), expected);
    }

    #[test]
    fn test_zero_indent_still_breaks_lines() {
        let value = parse("[1,2]").unwrap();
        assert_eq!(render(&value, Some(0)), "[\n1,\n2\n]");
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(100.0), "100.0");
        assert_eq!(format_float(1e300), "1e300");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(f64::NAN), "null");
        assert_eq!(format_float(f64::INFINITY), "null");
    }

    #[test]
    fn test_control_characters_are_escaped() {
        let value = Value::from("tab\tbell\u{7}");
        assert_eq!(render(&value, None), r#""tab\tbell\u0007""#);
    }

    #[test]
    fn test_long_payload_breaks_in_indented_mode() {
        let payload = "A".repeat(INLINE_BINARY_LIMIT + 4);
        let mut map = BxsonMap::new();
        map.insert("blob".to_string(), Value::binary(Encoding::Base64, payload.clone()));
        let value = Value::Object(map);

        let indented = render(&value, Some(2));
        assert_eq!(
            indented,
            format!("{{\n  \"blob\": b64{{\n    {}\n  }}\n}}", payload)
        );

        let compact = render(&value, None);
        assert_eq!(compact, format!("{{\"blob\":b64{{{}}}}}", payload));
    }

    #[test]
    fn test_payload_at_limit_stays_inline() {
        let payload = "A".repeat(INLINE_BINARY_LIMIT);
        let value = Value::Array(vec![Value::binary(Encoding::Base58, payload.clone())]);
        assert_eq!(render(&value, Some(2)), format!("[\n  b58{{{}}}\n]", payload));
    }

    #[test]
    fn test_unrenderable_payload_is_written_verbatim() {
        let value = Value::binary(Encoding::Base64, "aG}k");
        assert_eq!(render(&value, None), "b64{aG}k}");
        assert!(parse(&render(&value, None)).is_err());
    }

    #[test]
    fn test_bytes_are_encoded_on_render() {
        let value = Value::Array(vec![Value::bytes(b"hello".to_vec()), Value::Bytes(Vec::new())]);
        assert_eq!(render(&value, None), "[b64{aGVsbG8},b64{}]");

        let options = BxsonOptions::new().with_encoding(Encoding::Base58);
        assert_eq!(render_with_options(&value, &options), "[b58{Cn8eVZg},b58{}]");
    }

    #[test]
    fn test_value_serializer_variants() {
        #[derive(Serialize)]
        enum Shape {
            Unit,
            Circle(f64),
            Rect { w: u32, h: u32 },
        }

        assert_eq!(Shape::Unit.serialize(ValueSerializer).unwrap(), Value::from("Unit"));
        assert_eq!(
            render(&Shape::Circle(1.5).serialize(ValueSerializer).unwrap(), None),
            r#"{"Circle":1.5}"#
        );
        assert_eq!(
            render(&Shape::Rect { w: 2, h: 3 }.serialize(ValueSerializer).unwrap(), None),
            r#"{"Rect":{"w":2,"h":3}}"#
        );
    }

    #[test]
    fn test_render_to_writer() {
        let mut buffer = Vec::new();
        render_to_writer(&mut buffer, &Value::from(vec![Value::Null]), None).unwrap();
        assert_eq!(buffer, b"[null]");
    }
}
