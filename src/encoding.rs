//! The three base-X alphabets a binary block may use.
//!
//! Each [`Encoding`] knows its literal tag (`b32`, `b58`, `b64`) and how to move
//! between a payload as written in a document and raw bytes:
//!
//! | Encoding | Tag   | Written form                          | Read side                     |
//! |----------|-------|---------------------------------------|-------------------------------|
//! | Base32   | `b32` | RFC 4648, upper-case, `=` stripped    | upper-cased, re-padded to 8   |
//! | Base58   | `b58` | Bitcoin alphabet                      | as written                    |
//! | Base64   | `b64` | standard alphabet, `=` stripped       | unwrapped, re-padded to 4     |
//!
//! ## Examples
//!
//! ```rust
//! use serde_bxson::Encoding;
//!
//! let payload = Encoding::Base64.encode(b"hello");
//! assert_eq!(payload, "aGVsbG8");
//! assert_eq!(Encoding::Base64.decode(&payload).unwrap(), b"hello");
//!
//! let encoding: Encoding = "b58".parse().unwrap();
//! assert_eq!(encoding, Encoding::Base58);
//! ```

use crate::error::PayloadError;
use crate::{Error, Result};
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine as _};
use data_encoding::{BASE32, BASE32_NOPAD};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Standard alphabet, padding required on input, stray trailing bits tolerated.
const BASE64_READER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

static BASE32_READER: OnceLock<data_encoding::Encoding> = OnceLock::new();

/// RFC 4648 Base32 with `=` padding, stray trailing bits tolerated.
fn base32_reader() -> &'static data_encoding::Encoding {
    BASE32_READER.get_or_init(|| {
        let mut spec = BASE32.specification();
        spec.check_trailing_bits = false;
        spec.encoding().unwrap_or_else(|_| BASE32.clone())
    })
}

/// Encoding of a binary block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    Base32,
    Base58,
    #[default]
    Base64,
}

impl Encoding {
    /// All encodings, in tag order.
    pub const ALL: [Encoding; 3] = [Encoding::Base32, Encoding::Base58, Encoding::Base64];

    /// The literal tag, e.g. `b64`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Encoding::Base32 => "b32",
            Encoding::Base58 => "b58",
            Encoding::Base64 => "b64",
        }
    }

    /// The tag plus its opening brace, e.g. `b64{`.
    #[must_use]
    pub const fn opener(&self) -> &'static str {
        match self {
            Encoding::Base32 => "b32{",
            Encoding::Base58 => "b58{",
            Encoding::Base64 => "b64{",
        }
    }

    /// Decodes a trimmed payload as written inside a block.
    ///
    /// An empty payload is zero bytes in every alphabet. Base64 payloads may be
    /// wrapped over several lines.
    ///
    /// # Errors
    ///
    /// Returns the alphabet's decode error for characters outside the alphabet
    /// or a length no padding can repair.
    pub fn decode(&self, payload: &str) -> std::result::Result<Vec<u8>, PayloadError> {
        if payload.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Encoding::Base32 => {
                let padded = pad_to(&payload.to_ascii_uppercase(), 8);
                Ok(base32_reader().decode(padded.as_bytes())?)
            }
            Encoding::Base58 => Ok(bs58::decode(payload).into_vec()?),
            Encoding::Base64 => {
                let unwrapped: String = payload
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let padded = pad_to(&unwrapped, 4);
                Ok(BASE64_READER.decode(padded.as_bytes())?)
            }
        }
    }

    /// Encodes bytes into the payload form written inside a block.
    #[must_use]
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Base32 => BASE32_NOPAD.encode(bytes),
            Encoding::Base58 => bs58::encode(bytes).into_string(),
            Encoding::Base64 => STANDARD_NO_PAD.encode(bytes),
        }
    }
}

fn pad_to(payload: &str, block: usize) -> String {
    let missing = (block - payload.len() % block) % block;
    let mut padded = String::with_capacity(payload.len() + missing);
    padded.push_str(payload);
    padded.extend(std::iter::repeat('=').take(missing));
    padded
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    /// Accepts the tag (`b64`) or the long name (`base64`), in any case.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b32" | "base32" => Ok(Encoding::Base32),
            "b58" | "base58" => Ok(Encoding::Base58),
            "b64" | "base64" => Ok(Encoding::Base64),
            _ => Err(Error::unknown_encoding(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_padding_is_restored() {
        assert_eq!(Encoding::Base64.decode("aGVsbG8").unwrap(), b"hello");
        assert_eq!(Encoding::Base64.decode("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(Encoding::Base64.encode(b"hello"), "aGVsbG8");
    }

    #[test]
    fn test_base64_accepts_wrapped_lines() {
        assert_eq!(Encoding::Base64.decode("aGVs\n  bG8").unwrap(), b"hello");
    }

    #[test]
    fn test_base32_is_case_insensitive_on_input() {
        let payload = Encoding::Base32.encode(b"test");
        assert_eq!(payload, "ORSXG5A");
        assert_eq!(Encoding::Base32.decode("orsxg5a").unwrap(), b"test");
    }

    #[test]
    fn test_base32_ignores_trailing_bits() {
        assert_eq!(Encoding::Base32.decode("ORSXG5B").unwrap(), b"test");
        assert_eq!(Encoding::Base32.decode("ORSXG5B=").unwrap(), b"test");
    }

    #[test]
    fn test_base58_known_vector() {
        assert_eq!(Encoding::Base58.encode(b"test"), "3yZe7d");
        assert_eq!(Encoding::Base58.decode("3yZe7d").unwrap(), b"test");
    }

    #[test]
    fn test_empty_payload_is_empty_bytes() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.decode("").unwrap(), Vec::<u8>::new());
            assert_eq!(encoding.encode(&[]), "");
        }
    }

    #[test]
    fn test_invalid_payloads() {
        assert!(Encoding::Base58.decode("0OIl").is_err());
        assert!(Encoding::Base64.decode("a").is_err());
        assert!(Encoding::Base64.decode("!!!!").is_err());
        assert!(Encoding::Base32.decode("A").is_err());
        assert!(Encoding::Base32.decode("189").is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("b32".parse::<Encoding>().unwrap(), Encoding::Base32);
        assert_eq!("Base58".parse::<Encoding>().unwrap(), Encoding::Base58);
        assert_eq!("B64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!(
            "b99".parse::<Encoding>(),
            Err(Error::UnknownEncoding("b99".to_string()))
        );
    }

    #[test]
    fn test_tags() {
        assert_eq!(Encoding::default(), Encoding::Base64);
        assert_eq!(Encoding::Base32.opener(), "b32{");
        assert_eq!(Encoding::Base58.to_string(), "b58");
    }
}
