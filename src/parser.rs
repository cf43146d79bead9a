//! BXSON grammar.
//!
//! A recursive-descent parser over the token stream produced by
//! [`lexer`](crate::lexer):
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
//! Parsing is all-or-nothing. The first token that does not fit yields
//! [`Error::Syntax`]; running out of tokens mid-value yields
//! [`Error::UnexpectedEof`]. Lexical diagnostics are passed through untouched.
//!
//! String literals (values and keys alike) are unescaped with JSON rules. A
//! literal whose escapes do not decode is kept as its raw text between the
//! quotes instead of failing the parse.

use crate::diagnostic::Diagnosed;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::value::{BinaryLiteral, Number};
use crate::{BxsonMap, Error, Result, Value};
use num_bigint::BigInt;
use std::io;

/// Containers nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 128;

/// Parses a BXSON document, logging any lexical diagnostics.
///
/// The returned tree still holds binary blocks as [`Value::Binary`]; pass it to
/// [`decode`](crate::decode) to resolve them into bytes.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{parse, Value};
///
/// let value = parse(";; a comment\n[1, 2.5, true, null]").unwrap();
/// assert_eq!(value.as_array().map(Vec::len), Some(4));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`], [`Error::UnexpectedEof`] or [`Error::DepthLimit`]
/// if the input is not a single well-formed value.
pub fn parse(input: &str) -> Result<Value> {
    parse_with_diagnostics(input).map(Diagnosed::into_logged)
}

/// Parses a BXSON document and returns the lexical diagnostics with the tree.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{parse_with_diagnostics, Diagnostic};
///
/// let parsed = parse_with_diagnostics("[1, 2] @").unwrap();
/// assert_eq!(
///     parsed.diagnostics,
///     vec![Diagnostic::IllegalCharacter { ch: '@', line: 1 }]
/// );
/// ```
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with_diagnostics(input: &str) -> Result<Diagnosed<Value>> {
    let Diagnosed { value: tokens, diagnostics } = tokenize(input);
    log::debug!(
        "tokenized {} bytes into {} tokens ({} diagnostics)",
        input.len(),
        tokens.len(),
        diagnostics.len()
    );
    let value = Parser::new(tokens).parse_document()?;
    Ok(Diagnosed::new(value, diagnostics))
}

/// Reads the whole stream, then parses it.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the content is not UTF-8, and
/// otherwise the same errors as [`parse`].
pub fn parse_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    parse(&string)
}

/// Parser over a fully tokenized document.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Parser {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parses exactly one value and requires the stream to end after it.
    pub fn parse_document(&mut self) -> Result<Value> {
        let value = self.parse_value()?;
        match self.tokens.get(self.position) {
            Some(token) => Err(unexpected(token)),
            None => Ok(value),
        }
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map_or(1, |t| t.line)
    }

    fn next_token(&mut self, expected: &str) -> Result<Token<'a>> {
        match self.tokens.get(self.position) {
            Some(token) => {
                self.position += 1;
                Ok(token.clone())
            }
            None => Err(Error::unexpected_eof(self.last_line(), expected)),
        }
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.position).map(|t| t.kind)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'a>> {
        let token = self.next_token(expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(&token))
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        let token = self.next_token("a value")?;
        match token.kind {
            TokenKind::LBrace => self.nested(&token, Self::parse_object),
            TokenKind::LBracket => self.nested(&token, Self::parse_array),
            TokenKind::String => Ok(Value::String(unescape_or_raw(token.text))),
            TokenKind::Integer => Ok(Value::Number(parse_integer(&token)?)),
            TokenKind::Float => Ok(Value::Number(parse_float(&token)?)),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::BlockOpen(encoding) => {
                let payload = if self.peek_kind() == Some(TokenKind::BlockData) {
                    self.next_token("block data")?.text
                } else {
                    ""
                };
                self.expect(TokenKind::BlockClose, "'}' closing the binary block")?;
                Ok(Value::Binary(BinaryLiteral::new(encoding, payload)))
            }
            _ => Err(unexpected(&token)),
        }
    }

    fn nested<F>(&mut self, open: &Token<'a>, parse: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(Error::DepthLimit { line: open.line });
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_object(&mut self) -> Result<Value> {
        let mut object = BxsonMap::new();
        if self.peek_kind() == Some(TokenKind::RBrace) {
            self.position += 1;
            return Ok(Value::Object(object));
        }

        loop {
            let key = self.expect(TokenKind::String, "an object key")?;
            self.expect(TokenKind::Colon, "':' after an object key")?;
            let value = self.parse_value()?;
            object.insert(unescape_or_raw(key.text), value);

            let token = self.next_token("',' or '}'")?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RBrace => return Ok(Value::Object(object)),
                _ => return Err(unexpected(&token)),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        let mut array = Vec::new();
        if self.peek_kind() == Some(TokenKind::RBracket) {
            self.position += 1;
            return Ok(Value::Array(array));
        }

        loop {
            array.push(self.parse_value()?);

            let token = self.next_token("',' or ']'")?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RBracket => return Ok(Value::Array(array)),
                _ => return Err(unexpected(&token)),
            }
        }
    }
}

fn unexpected(token: &Token<'_>) -> Error {
    Error::syntax(token.kind.name(), token.text, token.line)
}

fn parse_integer(token: &Token<'_>) -> Result<Number> {
    match token.text.parse::<i64>() {
        Ok(i) => Ok(Number::Integer(i)),
        Err(_) => token
            .text
            .parse::<BigInt>()
            .map(Number::BigInt)
            .map_err(|_| unexpected(token)),
    }
}

fn parse_float(token: &Token<'_>) -> Result<Number> {
    token
        .text
        .parse::<f64>()
        .map(Number::Float)
        .map_err(|_| unexpected(token))
}

/// Unescapes a quoted literal, or returns the text between the quotes as-is.
// TODO: offer a strict mode that reports malformed escapes instead of keeping the raw text.
fn unescape_or_raw(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    unescape(inner).unwrap_or_else(|| inner.to_string())
}

/// JSON string unescaping. `None` on any malformed escape or raw control character.
fn unescape(inner: &str) -> Option<String> {
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next()? {
                '"' => result.push('"'),
                '\\' => result.push('\\'),
                '/' => result.push('/'),
                'b' => result.push('\u{0008}'),
                'f' => result.push('\u{000C}'),
                'n' => result.push('\n'),
                'r' => result.push('\r'),
                't' => result.push('\t'),
                'u' => {
                    let high = read_hex4(&mut chars)?;
                    let code_point = if (0xD800..0xDC00).contains(&high) {
                        if chars.next()? != '\\' || chars.next()? != 'u' {
                            return None;
                        }
                        let low = read_hex4(&mut chars)?;
                        if !(0xDC00..0xE000).contains(&low) {
                            return None;
                        }
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    } else {
                        high
                    };
                    result.push(char::from_u32(code_point)?);
                }
                _ => return None,
            },
            c if (c as u32) < 0x20 => return None,
            other => result.push(other),
        }
    }

    Some(result)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut code = 0;
    for _ in 0..4 {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}
