//! Configuration options for BXSON output.
//!
//! [`BxsonOptions`] controls two things:
//!
//! - the indentation of rendered text (compact when `indent` is `None`), and
//! - the [`Encoding`] used for raw bytes that reach the renderer.
//!
//! ## Examples
//!
//! ```rust
//! use serde_bxson::{to_string_with_options, BxsonOptions, Encoding, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let options = BxsonOptions::pretty();
//! let text = to_string_with_options(&Data { x: 1, y: 2 }, &options).unwrap();
//! assert_eq!(text, "{\n  \"x\": 1,\n  \"y\": 2\n}");
//!
//! let options = BxsonOptions::new().with_encoding(Encoding::Base32);
//! let text = to_string_with_options(&Value::bytes(b"test".to_vec()), &options).unwrap();
//! assert_eq!(text, "b32{ORSXG5A}");
//! ```

use crate::encoding::Encoding;

/// Configuration options for BXSON rendering.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{BxsonOptions, Encoding};
///
/// // Compact, Base64
/// let options = BxsonOptions::new();
/// assert_eq!(options.indent, None);
///
/// // Two-space indentation
/// let options = BxsonOptions::pretty();
/// assert_eq!(options.indent, Some(2));
///
/// let options = BxsonOptions::new()
///     .with_indent(4)
///     .with_encoding(Encoding::Base58);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BxsonOptions {
    /// Spaces per nesting level, or `None` for single-line output.
    pub indent: Option<usize>,
    /// Encoding applied to raw bytes when they are rendered.
    pub encoding: Encoding,
}

impl BxsonOptions {
    /// Creates default options (compact output, Base64 for bytes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for indented output with two spaces per level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bxson::BxsonOptions;
    ///
    /// assert_eq!(BxsonOptions::pretty().indent, Some(2));
    /// ```
    #[must_use]
    pub fn pretty() -> Self {
        BxsonOptions {
            indent: Some(2),
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// A width of 0 still puts every entry on its own line.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Switches back to single-line output.
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.indent = None;
        self
    }

    /// Sets the encoding used for raw bytes.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}
