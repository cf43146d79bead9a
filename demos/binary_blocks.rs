//! Moving bytes through each binary block encoding.
//!
//! Run with: cargo run --example binary_blocks

use serde::{Deserialize, Serialize};
use serde_bxson::{
    decode, encode, from_str, parse, render, to_string_with_options, BxsonOptions, Encoding, Value,
};
use std::error::Error;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Attachment {
    name: String,
    #[serde(with = "raw_bytes")]
    data: Vec<u8>,
}

mod raw_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Vec::<u8>::deserialize(deserializer)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let payload = Value::bytes(b"BXSON carries bytes".to_vec());

    // Same bytes, three literals
    for encoding in Encoding::ALL {
        let literal = encode(&payload, encoding);
        let text = render(&literal, None);
        let back = decode(&parse(&text)?);
        println!("{:>6}: {:<40} round trip ok: {}", encoding, text, back == payload);
    }

    // Structs with byte fields pick the encoding from the options
    let attachment = Attachment {
        name: "note.txt".to_string(),
        data: b"hello".to_vec(),
    };
    for encoding in Encoding::ALL {
        let options = BxsonOptions::pretty().with_encoding(encoding);
        let text = to_string_with_options(&attachment, &options)?;
        println!("\n{}", text);
        assert_eq!(from_str::<Attachment>(&text)?, attachment);
    }

    // A malformed block stays readable as text
    let broken = parse(r#"{"ok": b64{aGk}, "bad": b58{0OIl}}"#)?;
    println!("\nLenient decode: {}", decode(&broken));

    Ok(())
}
