//! # serde_bxson
//!
//! A parser, renderer and Serde bridge for BXSON, a JSON superset with tagged
//! binary blocks.
//!
//! ## What is BXSON?
//!
//! BXSON is JSON plus one extra value form: a binary block written as an
//! encoding tag, an opening brace, an encoded payload and a closing brace.
//!
//! ```text
//! {"name": "avatar", "data": b64{iVBORw0KGgo}, "key": b58{3yZe7d}, "raw": b32{ORSXG5A}}
//! ```
//!
//! - `b32{...}` holds RFC 4648 Base32 (upper-case alphabet, padding optional)
//! - `b58{...}` holds Base58 (Bitcoin alphabet)
//! - `b64{...}` holds RFC 4648 Base64 (padding optional)
//!
//! Every JSON document is a BXSON document.
//!
//! ## Pipeline
//!
//! - [`parse`] turns text into a [`Value`] tree, keeping binary blocks as
//!   undecoded [`BinaryLiteral`]s.
//! - [`decode`] resolves those literals into raw bytes ([`Value::Bytes`]).
//! - [`encode`] turns raw bytes back into literals in a chosen [`Encoding`].
//! - [`render`] writes a tree as text, compact or indented.
//!
//! Recoverable problems (stray characters in the input, payloads that fail to
//! decode) never abort the pipeline. They are collected as [`Diagnostic`]s and
//! reported through the [`log`] facade at `warn` level.
//!
//! ```rust
//! use serde_bxson::{decode, parse, render, Value};
//!
//! let tree = parse(r#"{"id": 1, "blob": b64{aGVsbG8=}}"#).unwrap();
//! let resolved = decode(&tree);
//! assert_eq!(
//!     resolved.as_object().unwrap().get("blob"),
//!     Some(&Value::bytes(b"hello".to_vec()))
//! );
//!
//! // Bytes are re-encoded on the way out, without padding.
//! assert_eq!(render(&resolved, None), r#"{"id":1,"blob":b64{aGVsbG8}}"#);
//! ```
//!
//! ## Serde
//!
//! Any `Serialize`/`Deserialize` type can travel through BXSON. Byte buffers
//! (`serde_bytes`-style `serialize_bytes`) come out as binary blocks.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_bxson::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, r#"{"id":123,"name":"Alice","active":true}"#);
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values with bxson! Macro
//!
//! ```rust
//! use serde_bxson::{bxson, render};
//!
//! let data = bxson!({
//!     "name": "Alice",
//!     "key": b58{"3yZe7d"},
//!     "tags": ["rust", "serde"]
//! });
//!
//! assert_eq!(render(&data, None), r#"{"name":"Alice","key":b58{3yZe7d},"tags":["rust","serde"]}"#);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Nesting deeper than [`parser::MAX_DEPTH`] is rejected instead of
//!   overflowing the stack
//! - No panics in the public API
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`inspect.rs`** - Parse a file, optionally decode it, and pretty-print it
//! - **`binary_blocks.rs`** - Round-trip bytes through each encoding
//!
//! Run one with: `cargo run --example <name>`

pub mod codec;
pub mod de;
pub mod diagnostic;
pub mod encoding;
pub mod error;
pub mod format;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod ser;
pub mod value;

pub use codec::{decode, decode_with_diagnostics, encode, encode_named};
pub use de::{from_value, ValueDeserializer};
pub use diagnostic::{Diagnosed, Diagnostic};
pub use encoding::Encoding;
pub use error::{Error, PayloadError, Result};
pub use map::BxsonMap;
pub use options::BxsonOptions;
pub use parser::{parse, parse_reader, parse_with_diagnostics};
pub use ser::{render, render_to_writer, render_with_options, ValueSerializer};
pub use value::{BinaryLiteral, Number, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to a compact BXSON string.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// assert_eq!(to_string(&point).unwrap(), r#"{"x":1,"y":2}"#);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized (e.g., non-string map keys).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &BxsonOptions::default())
}

/// Serialize any `T: Serialize` to an indented BXSON string (two spaces per level).
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &BxsonOptions::pretty())
}

/// Serialize any `T: Serialize` to a BXSON string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{to_string_with_options, BxsonOptions};
///
/// let options = BxsonOptions::new().with_indent(4);
/// let text = to_string_with_options(&vec![1, 2], &options).unwrap();
/// assert_eq!(text, "[\n    1,\n    2\n]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &BxsonOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    Ok(render_with_options(&value, options))
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// let value: Value = to_value(&point).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a writer as compact BXSON.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![true, false]).unwrap();
/// assert_eq!(buffer, b"[true,false]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &BxsonOptions::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &BxsonOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from BXSON text.
///
/// The text is parsed, its binary blocks are decoded, and the resulting tree is
/// handed to `T`'s `Deserialize` impl. Malformed payloads are logged and reach
/// `T` as strings.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Blob { name: String, data: Vec<u8> }
///
/// let blob: Blob = from_str(r#"{"name": "greeting", "data": b32{NBSWY3DP}}"#).unwrap();
/// assert_eq!(blob.data, b"hello");
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid BXSON or cannot be deserialized
/// to type `T`. Syntax errors carry the line they occurred on.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let tree = parse(s)?;
    from_value(decode(&tree))
}

/// Deserialize an instance of type `T` from an I/O stream of BXSON.
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid
/// BXSON, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let tree = parse_reader(reader)?;
    from_value(decode(&tree))
}

/// Deserialize an instance of type `T` from bytes of BXSON text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid BXSON, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
