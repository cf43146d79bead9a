//! Tree-wide conversion between binary literals and raw bytes.
//!
//! - [`decode`] replaces every [`Value::Binary`] with [`Value::Bytes`]. A
//!   payload that does not decode is kept as a [`Value::String`] holding the
//!   raw payload and reported as a [`Diagnostic::MalformedBinary`]; the rest of
//!   the tree is unaffected.
//! - [`encode`] replaces every [`Value::Bytes`] with a [`Value::Binary`] in the
//!   chosen [`Encoding`].
//!
//! Both walk array elements and object values; keys are never touched. Both
//! borrow the input and build a new tree, so one parse result can feed either
//! direction.
//!
//! ```rust
//! use serde_bxson::{decode, encode, parse, Encoding, Value};
//!
//! let tree = parse("[b32{ORSXG5A}, b58{0OIl}]").unwrap();
//! let resolved = decode(&tree);
//! assert_eq!(resolved.as_array().unwrap()[0], Value::bytes(b"test".to_vec()));
//! assert_eq!(resolved.as_array().unwrap()[1], Value::from("0OIl"));
//!
//! let tagged = encode(&Value::bytes(b"test".to_vec()), Encoding::Base58);
//! assert_eq!(tagged, Value::binary(Encoding::Base58, "3yZe7d"));
//! ```

use crate::diagnostic::{Diagnosed, Diagnostic};
use crate::encoding::Encoding;
use crate::value::BinaryLiteral;
use crate::{Result, Value};

/// Resolves all binary literals into bytes, logging malformed payloads.
#[must_use]
pub fn decode(value: &Value) -> Value {
    decode_with_diagnostics(value).into_logged()
}

/// Resolves all binary literals into bytes and returns what could not be decoded.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{decode_with_diagnostics, parse, Diagnostic, Encoding};
///
/// let tree = parse(r#"{"ok": b64{aGk}, "bad": b58{0OIl}}"#).unwrap();
/// let decoded = decode_with_diagnostics(&tree);
/// assert_eq!(decoded.diagnostics.len(), 1);
/// assert!(matches!(
///     decoded.diagnostics[0],
///     Diagnostic::MalformedBinary { encoding: Encoding::Base58, .. }
/// ));
/// ```
#[must_use]
pub fn decode_with_diagnostics(value: &Value) -> Diagnosed<Value> {
    let mut diagnostics = Vec::new();
    let decoded = decode_value(value, &mut diagnostics);
    Diagnosed::new(decoded, diagnostics)
}

fn decode_value(value: &Value, diagnostics: &mut Vec<Diagnostic>) -> Value {
    match value {
        Value::Binary(lit) => match lit.decode() {
            Ok(bytes) => Value::Bytes(bytes),
            Err(err) => {
                diagnostics.push(Diagnostic::malformed_binary(
                    lit.encoding,
                    &lit.payload,
                    err.to_string(),
                ));
                Value::String(lit.payload.clone())
            }
        },
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| decode_value(item, diagnostics))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), decode_value(v, diagnostics)))
                .collect(),
        ),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Bytes(_) => value.clone(),
    }
}

/// Replaces all raw bytes with binary literals in `encoding`.
///
/// Existing binary literals keep their own encoding.
#[must_use]
pub fn encode(value: &Value, encoding: Encoding) -> Value {
    match value {
        Value::Bytes(bytes) => Value::Binary(BinaryLiteral::from_bytes(encoding, bytes)),
        Value::Array(items) => Value::Array(items.iter().map(|v| encode(v, encoding)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), encode(v, encoding)))
                .collect(),
        ),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Binary(_) => value.clone(),
    }
}

/// [`encode`] with the encoding given by name (`b32`, `base58`, ...).
///
/// # Errors
///
/// Returns [`Error::UnknownEncoding`](crate::Error::UnknownEncoding) if the
/// name matches no encoding.
pub fn encode_named(value: &Value, encoding: &str) -> Result<Value> {
    let encoding: Encoding = encoding.parse()?;
    Ok(encode(value, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Error};

    #[test]
    fn test_decode_object_value() {
        let tree = parse(r#"{"a": b64{aGVsbG8}}"#).unwrap();
        let decoded = decode_with_diagnostics(&tree);
        assert!(decoded.is_clean());
        assert_eq!(
            decoded.value.as_object().unwrap().get("a"),
            Some(&Value::bytes(b"hello".to_vec()))
        );
    }

    #[test]
    fn test_empty_blocks_decode_to_no_bytes() {
        for input in ["b32{}", "b58{}", "b64{}", "b64{   }"] {
            let decoded = decode(&parse(input).unwrap());
            assert_eq!(decoded, Value::Bytes(Vec::new()), "input {}", input);
        }
    }

    #[test]
    fn test_malformed_payload_falls_back_locally() {
        let tree = parse("[b58{0OIl}, b64{aGk}, b32{!}]").unwrap();
        let decoded = decode_with_diagnostics(&tree);
        assert_eq!(
            decoded.value,
            Value::Array(vec![
                Value::from("0OIl"),
                Value::bytes(b"hi".to_vec()),
                Value::from("!"),
            ])
        );
        assert_eq!(decoded.diagnostics.len(), 2);
    }

    #[test]
    fn test_decode_leaves_input_untouched() {
        let tree = parse("[b64{aGk}]").unwrap();
        let _ = decode(&tree);
        assert!(tree.as_array().unwrap()[0].is_binary());
    }

    #[test]
    fn test_encode_strips_padding() {
        let tree = Value::Array(vec![Value::bytes(b"hello".to_vec()), Value::from(1)]);
        assert_eq!(
            encode(&tree, Encoding::Base64),
            Value::Array(vec![Value::binary(Encoding::Base64, "aGVsbG8"), Value::from(1)])
        );
        assert_eq!(
            encode(&Value::bytes(b"test".to_vec()), Encoding::Base32),
            Value::binary(Encoding::Base32, "ORSXG5A")
        );
    }

    #[test]
    fn test_encode_keeps_existing_literals() {
        let lit = Value::binary(Encoding::Base32, "ORSXG5A");
        assert_eq!(encode(&lit, Encoding::Base64), lit);
    }

    #[test]
    fn test_roundtrip_each_encoding() {
        let bytes = Value::bytes(vec![0u8, 0, 1, 254, 255]);
        for encoding in Encoding::ALL {
            assert_eq!(decode(&encode(&bytes, encoding)), bytes);
        }
    }

    #[test]
    fn test_encode_named() {
        let bytes = Value::bytes(b"test".to_vec());
        assert_eq!(
            encode_named(&bytes, "base58").unwrap(),
            Value::binary(Encoding::Base58, "3yZe7d")
        );
        assert_eq!(
            encode_named(&bytes, "hex"),
            Err(Error::UnknownEncoding("hex".to_string()))
        );
    }
}
