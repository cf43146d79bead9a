//! BXSON tokenizer.
//!
//! The lexer runs in one of two kinds of state, tracked by [`LexMode`]:
//!
//! - **`Initial`**: the JSON-like surface. Structural characters, keywords,
//!   quoted strings, numbers, `;;` comments and the three block openers
//!   `b32{`, `b58{`, `b64{`.
//! - **`InBlock(encoding)`**: entered after a block opener. Everything up to the
//!   next `}` is a single opaque data token; the `}` closes the block and
//!   returns to `Initial`. No escapes, comments or nesting apply here.
//!
//! The states are exclusive: only the active state's rules are tried. A lexer
//! is built per input, so mode and line count never carry over between calls.
//!
//! Characters no rule accepts are reported as
//! [`Diagnostic::IllegalCharacter`] and skipped, one character at a time. The
//! token stream is still produced; the parser will normally reject it.
//!
//! ```rust
//! use serde_bxson::lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("[b64{ aGk }, 1.5] ;; trailing note").value;
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(kinds.len(), 7);
//! assert_eq!(tokens[2].text, "aGk");
//! assert_eq!(kinds[5], TokenKind::Float);
//! ```

use crate::diagnostic::{Diagnosed, Diagnostic};
use crate::encoding::Encoding;
use std::fmt;

/// The lexer's exclusive states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexMode {
    Initial,
    InBlock(Encoding),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    True,
    False,
    Null,
    /// A quoted string, quotes included, escapes not yet interpreted.
    String,
    /// A numeric literal without `.`, `e` or `E`.
    Integer,
    /// A numeric literal with a fraction or exponent.
    Float,
    BlockOpen(Encoding),
    /// Trimmed payload text of a binary block.
    BlockData,
    BlockClose,
}

impl TokenKind {
    /// Upper-case token name used in syntax errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::String => "STRING",
            TokenKind::Integer | TokenKind::Float => "NUMBER",
            TokenKind::BlockOpen(Encoding::Base32) => "BASE32_OPEN",
            TokenKind::BlockOpen(Encoding::Base58) => "BASE58_OPEN",
            TokenKind::BlockOpen(Encoding::Base64) => "BASE64_OPEN",
            TokenKind::BlockData => "BLOCK_DATA",
            TokenKind::BlockClose => "RBRACE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text of the token; for block data, the trimmed payload.
    pub text: &'a str,
    /// 1-based line the token starts on.
    pub line: usize,
}

/// Tokenizes a whole document.
///
/// Never fails; illegal characters come back as diagnostics.
pub fn tokenize(input: &str) -> Diagnosed<Vec<Token<'_>>> {
    Lexer::new(input).run()
}

/// Single-use tokenizer over one input buffer.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    mode: LexMode,
    tokens: Vec<Token<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            mode: LexMode::Initial,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn run(mut self) -> Diagnosed<Vec<Token<'a>>> {
        while !self.at_end() {
            match self.mode {
                LexMode::Initial => self.lex_initial(),
                LexMode::InBlock(encoding) => self.lex_block(encoding),
            }
        }
        if let LexMode::InBlock(encoding) = self.mode {
            log::trace!("input ended inside a {} block", encoding);
        }
        Diagnosed::new(self.tokens, self.diagnostics)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let text = &self.input[self.position..self.position + len];
        self.tokens.push(Token {
            kind,
            text,
            line: self.line,
        });
        self.position += len;
    }

    fn illegal(&mut self, ch: char) {
        self.diagnostics.push(Diagnostic::IllegalCharacter {
            ch,
            line: self.line,
        });
        self.position += ch.len_utf8();
    }

    fn lex_initial(&mut self) {
        let rest = self.rest();
        let ch = match self.peek_char() {
            Some(ch) => ch,
            None => return,
        };

        match ch {
            ' ' | '\t' => self.position += 1,
            '\n' => {
                self.line += 1;
                self.position += 1;
            }
            '{' => self.push(TokenKind::LBrace, 1),
            '}' => self.push(TokenKind::RBrace, 1),
            '[' => self.push(TokenKind::LBracket, 1),
            ']' => self.push(TokenKind::RBracket, 1),
            ':' => self.push(TokenKind::Colon, 1),
            ',' => self.push(TokenKind::Comma, 1),
            '"' => match scan_string(rest) {
                Some(len) => self.push(TokenKind::String, len),
                None => self.illegal(ch),
            },
            '-' | '0'..='9' => match scan_number(rest) {
                Some((len, kind)) => self.push(kind, len),
                None => self.illegal(ch),
            },
            ';' if rest.starts_with(";;") => {
                self.position += rest.find('\n').unwrap_or(rest.len());
            }
            'b' => match Encoding::ALL.iter().find(|e| rest.starts_with(e.opener())) {
                Some(&encoding) => {
                    self.push(TokenKind::BlockOpen(encoding), encoding.opener().len());
                    log::trace!("line {}: entering {} block", self.line, encoding);
                    self.mode = LexMode::InBlock(encoding);
                }
                None => self.illegal(ch),
            },
            't' if rest.starts_with("true") => self.push(TokenKind::True, 4),
            'f' if rest.starts_with("false") => self.push(TokenKind::False, 5),
            'n' if rest.starts_with("null") => self.push(TokenKind::Null, 4),
            _ => self.illegal(ch),
        }
    }

    fn lex_block(&mut self, encoding: Encoding) {
        let rest = self.rest();
        match rest.find('}') {
            Some(0) => {
                self.push(TokenKind::BlockClose, 1);
                log::trace!("line {}: leaving {} block", self.line, encoding);
                self.mode = LexMode::Initial;
            }
            found => {
                let raw = &rest[..found.unwrap_or(rest.len())];
                self.tokens.push(Token {
                    kind: TokenKind::BlockData,
                    text: raw.trim(),
                    line: self.line,
                });
                self.line += raw.matches('\n').count();
                self.position += raw.len();
            }
        }
    }
}

/// Length of a well-formed string literal at the start of `rest`.
///
/// A backslash escapes any following character except a newline; a raw
/// newline ends the attempt.
fn scan_string(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Some(i + 1),
            '\\' => match chars.next() {
                Some((_, '\n')) | None => return None,
                Some(_) => {}
            },
            '\n' => return None,
            _ => {}
        }
    }
    None
}

/// Matches `-?\d+(\.\d+)?([eE][-+]?\d+)?` at the start of `rest`.
fn scan_number(rest: &str) -> Option<(usize, TokenKind)> {
    let bytes = rest.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut len = usize::from(bytes.first() == Some(&b'-'));
    let int_digits = digits_from(len);
    if int_digits == 0 {
        return None;
    }
    len += int_digits;
    let mut kind = TokenKind::Integer;

    if bytes.get(len) == Some(&b'.') {
        let frac_digits = digits_from(len + 1);
        if frac_digits > 0 {
            len += 1 + frac_digits;
            kind = TokenKind::Float;
        }
    }

    if matches!(bytes.get(len), Some(b'e') | Some(b'E')) {
        let sign = usize::from(matches!(bytes.get(len + 1), Some(b'+') | Some(b'-')));
        let exp_digits = digits_from(len + 1 + sign);
        if exp_digits > 0 {
            len += 1 + sign + exp_digits;
            kind = TokenKind::Float;
        }
    }

    Some((len, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).value.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            kinds(r#"{"a": [true, false, null]}"#),
            vec![
                TokenKind::LBrace,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::LBracket,
                TokenKind::True,
                TokenKind::Comma,
                TokenKind::False,
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::RBracket,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_number_classification() {
        assert_eq!(kinds("1"), vec![TokenKind::Integer]);
        assert_eq!(kinds("-12"), vec![TokenKind::Integer]);
        assert_eq!(kinds("1.0"), vec![TokenKind::Float]);
        assert_eq!(kinds("1e2"), vec![TokenKind::Float]);
        assert_eq!(kinds("2.5E-3"), vec![TokenKind::Float]);
    }

    #[test]
    fn test_dangling_fraction_is_illegal() {
        let result = tokenize("1.");
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].kind, TokenKind::Integer);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::IllegalCharacter { ch: '.', line: 1 }]
        );
    }

    #[test]
    fn test_block_mode_is_opaque() {
        let result = tokenize("b64{ a;;b\"c{ }");
        let tokens = result.value;
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::BlockOpen(Encoding::Base64));
        assert_eq!(tokens[1].kind, TokenKind::BlockData);
        assert_eq!(tokens[1].text, "a;;b\"c{");
        assert_eq!(tokens[2].kind, TokenKind::BlockClose);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_block_has_no_data() {
        assert_eq!(
            kinds("b32{}"),
            vec![TokenKind::BlockOpen(Encoding::Base32), TokenKind::BlockClose]
        );
    }

    #[test]
    fn test_comments_and_lines() {
        let tokens = tokenize(";; header\n{\"x\":1}\n;; footer").value;
        assert_eq!(tokens.len(), 5);
        assert!(tokens.iter().all(|t| t.line == 2));
    }

    #[test]
    fn test_newlines_inside_block_are_counted() {
        let tokens = tokenize("b58{\n  abc\n}\nnull").value;
        assert_eq!(tokens[1].text, "abc");
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[2].line, 3);
        assert_eq!(tokens[3].line, 4);
    }

    #[test]
    fn test_illegal_characters_are_skipped() {
        let result = tokenize("[1, @2]\n#");
        assert_eq!(
            kinds("[1, @2]"),
            vec![
                TokenKind::LBracket,
                TokenKind::Integer,
                TokenKind::Comma,
                TokenKind::Integer,
                TokenKind::RBracket,
            ]
        );
        assert_eq!(
            result.diagnostics,
            vec![
                Diagnostic::IllegalCharacter { ch: '@', line: 1 },
                Diagnostic::IllegalCharacter { ch: '#', line: 2 },
            ]
        );
    }

    #[test]
    fn test_unterminated_string_drops_quote() {
        let result = tokenize("\"abc\n");
        assert_eq!(
            result.diagnostics[0],
            Diagnostic::IllegalCharacter { ch: '"', line: 1 }
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let tokens = tokenize(r#""a\"b""#).value;
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, r#""a\"b""#);
    }

    #[test]
    fn test_lone_b_is_illegal() {
        let result = tokenize("b16{}");
        assert_eq!(result.diagnostics[0], Diagnostic::IllegalCharacter { ch: 'b', line: 1 });
    }

    #[test]
    fn test_carriage_return_is_illegal() {
        let result = tokenize("[1,\r\n2]");
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::IllegalCharacter { ch: '\r', line: 1 }]
        );
        assert_eq!(result.value.len(), 5);
        assert_eq!(result.value[3].line, 2);
    }
}
