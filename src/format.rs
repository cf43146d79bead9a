//! BXSON Format Reference
//!
//! This module documents the BXSON text format as implemented by this library.
//! It contains no code.
//!
//! # Overview
//!
//! BXSON is JSON with one more kind of value: a **binary block**, an encoded
//! byte string wrapped in a tagged pair of braces. Any JSON document is also a
//! BXSON document.
//!
//! # Grammar
//!
//! ```text
//! document      := value
//! value         := object | array | string | number | "true" | "false" | "null" | binaryLiteral
//! object        := "{" "}" | "{" pair ("," pair)* "}"
//! pair          := string ":" value
//! array         := "[" "]" | "[" value ("," value)* "]"
//! binaryLiteral := ("b32{" | "b58{" | "b64{") [DATA] "}"
//! ```
//!
//! A document holds exactly one top-level value. Trailing commas are rejected.
//!
//! # Lexical Rules
//!
//! | Item | Rule |
//! |------|------|
//! | Whitespace | space, tab and newline are insignificant; a carriage return is an illegal character |
//! | Comments | `;;` to the end of the line |
//! | Strings | `"` ... `"` on one line; a backslash escapes any character but a newline |
//! | Integers | `-?\d+` |
//! | Floats | `-?\d+(\.\d+)?([eE][-+]?\d+)?` with a fraction or an exponent |
//! | Keywords | `true`, `false`, `null` |
//!
//! Characters that fit no rule are skipped and reported as
//! [`Diagnostic::IllegalCharacter`](crate::Diagnostic::IllegalCharacter).
//! Line numbers count from 1.
//!
//! # Binary Blocks
//!
//! | Tag | Encoding | Alphabet | Padding |
//! |-----|----------|----------|---------|
//! | `b32{` | RFC 4648 Base32 | `A-Z2-7` (lower case accepted on input) | optional on input, never written |
//! | `b58{` | Base58 | Bitcoin alphabet | none |
//! | `b64{` | RFC 4648 Base64 | `A-Za-z0-9+/` | optional on input, never written |
//!
//! Inside a block everything up to the next `}` is the payload: no escapes, no
//! nesting, no comments. Surrounding whitespace is trimmed and the payload may
//! span lines. An empty block decodes to zero bytes.
//!
//! ```text
//! {
//!   "icon": b64{iVBORw0KGgo},
//!   "id": b58{3yZe7d},
//!   "empty": b32{}
//! }
//! ```
//!
//! A payload that does not decode is kept as a string holding the raw payload,
//! and reported as
//! [`Diagnostic::MalformedBinary`](crate::Diagnostic::MalformedBinary). The rest
//! of the document still decodes.
//!
//! # Numbers
//!
//! - `1` is an integer, `1.0` and `1e2` are floats. The distinction is lexical
//!   and survives a round trip.
//! - Integers outside the `i64` range are kept exactly as big integers.
//! - Floats are written in their shortest round-trip form, which always has a
//!   `.` or an exponent. `NaN` and the infinities are written as `null`.
//!
//! # Strings
//!
//! Escapes follow JSON: `\" \\ \/ \b \f \n \r \t \uXXXX`, including surrogate
//! pairs. A string whose escapes are invalid is kept with its raw contents
//! instead of failing the parse.
//!
//! On output, `"`, `\` and control characters are escaped; everything else,
//! including non-ASCII text, is written verbatim.
//!
//! # Objects
//!
//! - Member order is preserved from input to output.
//! - A repeated key keeps the position of its first occurrence and the value of
//!   its last.
//!
//! ```text
//! {"a": 1, "b": 2, "a": 3}   =>   {"a":3,"b":2}
//! ```
//!
//! # Output Layout
//!
//! Compact output has no whitespace at all. Indented output puts every
//! container entry on its own line with a fixed number of spaces per level and
//! one space after each colon:
//!
//! ```text
//! {
//!   "name": "x",
//!   "tags": [
//!     "a",
//!     "b"
//!   ],
//!   "meta": {}
//! }
//! ```
//!
//! In indented output, a binary payload longer than 60 characters moves to a
//! line of its own:
//!
//! ```text
//! {
//!   "blob": b64{
//!     TG9yZW0gaXBzdW0gZG9sb3Igc2l0IGFtZXQsIGNvbnNlY3RldHVyIGFkaXBpc2NpbmcgZWxpdA
//!   }
//! }
//! ```
//!
//! # Limits
//!
//! - Nesting is limited to [`MAX_DEPTH`](crate::parser::MAX_DEPTH) containers.
//! - No dates, no `NaN`/`Infinity` literals, no unquoted keys.
//!
//! # Conformance
//!
//! Conformance is checked in `tests/format_rules.rs`, one test per rule above.
