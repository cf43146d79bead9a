//! Parse a BXSON file and pretty-print it, optionally decoding binary blocks.
//!
//! Run with: cargo run --example inspect -- <file.bxson> [--decode]

use serde_bxson::{decode_with_diagnostics, parse_with_diagnostics, render, Value};
use std::error::Error;
use std::process::ExitCode;

fn describe(value: &Value) -> String {
    match value {
        Value::Bytes(bytes) => format!("{} bytes", bytes.len()),
        Value::Binary(lit) => format!("{} literal, {} chars", lit.encoding, lit.payload.len()),
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Object(map) => format!("object with {} members", map.len()),
        other => other.to_string(),
    }
}

fn run(path: &str, should_decode: bool) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path, e))?;

    let parsed = parse_with_diagnostics(&text)?;
    for diagnostic in &parsed.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    println!("--- parsed {} ---", path);

    let tree = if should_decode {
        let decoded = decode_with_diagnostics(&parsed.value);
        for diagnostic in &decoded.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
        decoded.value
    } else {
        parsed.value
    };

    if let Value::Object(map) = &tree {
        for (key, value) in map {
            println!("{:>16}: {}", key, describe(value));
        }
        println!();
    }

    println!("{}", render(&tree, Some(2)));
    if !should_decode {
        println!("\nRun with '--decode' to resolve binary blocks into bytes.");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let (path, should_decode) = match args.as_slice() {
        [_, path] => (path, false),
        [_, path, flag] if flag == "--decode" => (path, true),
        _ => {
            eprintln!("Usage: inspect <file.bxson> [--decode]");
            return ExitCode::FAILURE;
        }
    };

    match run(path, should_decode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
