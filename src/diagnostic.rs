//! Recoverable anomalies reported alongside a usable result.
//!
//! A [`Diagnostic`] never aborts an operation. The lexer skips an illegal
//! character and keeps going; the decoder leaves a malformed binary block as
//! its raw text and moves on to the siblings. Callers that want to inspect
//! these use the `*_with_diagnostics` entry points, which wrap the result in a
//! [`Diagnosed`]; the plain entry points log them at `warn` level instead.

use crate::encoding::Encoding;
use std::fmt;

/// Payloads longer than this are cut in diagnostics.
const PAYLOAD_PREVIEW: usize = 32;

#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A character no lexer rule accepts. It was skipped.
    IllegalCharacter { ch: char, line: usize },

    /// A binary block whose payload is not valid in its alphabet.
    /// The node was left as a string holding the raw payload.
    MalformedBinary {
        encoding: Encoding,
        payload: String,
        reason: String,
    },
}

impl Diagnostic {
    pub(crate) fn malformed_binary(encoding: Encoding, payload: &str, reason: String) -> Self {
        let payload = if payload.chars().count() > PAYLOAD_PREVIEW {
            let mut cut: String = payload.chars().take(PAYLOAD_PREVIEW).collect();
            cut.push_str("...");
            cut
        } else {
            payload.to_string()
        };
        Diagnostic::MalformedBinary {
            encoding,
            payload,
            reason,
        }
    }

    pub(crate) fn log(&self) {
        log::warn!("{}", self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IllegalCharacter { ch, line } => {
                write!(f, "illegal character {:?} at line {}", ch, line)
            }
            Diagnostic::MalformedBinary {
                encoding,
                payload,
                reason,
            } => write!(
                f,
                "failed to decode {} data '{}', keeping raw text: {}",
                encoding, payload, reason
            ),
        }
    }
}

/// A value together with the diagnostics collected while producing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnosed<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Diagnosed { value, diagnostics }
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Logs every diagnostic and returns the bare value.
    pub fn into_logged(self) -> T {
        for diagnostic in &self.diagnostics {
            diagnostic.log();
        }
        self.value
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_payload_is_truncated() {
        let payload = "A".repeat(100);
        let diagnostic =
            Diagnostic::malformed_binary(Encoding::Base64, &payload, "bad".to_string());
        match diagnostic {
            Diagnostic::MalformedBinary { payload, .. } => {
                assert_eq!(payload.len(), PAYLOAD_PREVIEW + 3);
                assert!(payload.ends_with("..."));
            }
            _ => panic!("Expected malformed binary"),
        }
    }

    #[test]
    fn test_display_mentions_line() {
        let diagnostic = Diagnostic::IllegalCharacter { ch: '@', line: 4 };
        assert_eq!(diagnostic.to_string(), "illegal character '@' at line 4");
    }

    #[test]
    fn test_map_keeps_diagnostics() {
        let diagnosed = Diagnosed::new(2, vec![Diagnostic::IllegalCharacter { ch: '#', line: 1 }]);
        let mapped = diagnosed.map(|n| n * 2);
        assert_eq!(mapped.value, 4);
        assert!(!mapped.is_clean());
    }
}
