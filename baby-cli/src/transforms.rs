//! Inspect transforms
//!
//! Development views of a BabyScript file at each stage of the compile
//! pipeline. Each transform name is a stage + format combination.
//!
//! 1. **Tokenization** - Raw text → Token stream
//!    - `token-json`: tokens with their byte offsets and positions
//!    - `token-simple`: one token kind per line
//!
//! 2. **Parsing** - Tokens → element tree
//!    - `ast-json`: the parse result (tree plus syntax errors) as JSON
//!
//! Example: `babyscript inspect level.baby token-simple`

use baby_babel::syntax::{parse, tokenize_with_locations, LineIndex, Token};
use serde_json::json;
use std::ops::Range;

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["token-json", "token-simple", "ast-json"];

pub const DEFAULT_TRANSFORM: &str = "ast-json";

/// Execute a named transform on BabyScript source
pub fn execute_transform(source: &str, transform_name: &str) -> Result<String, String> {
    match transform_name {
        "token-json" => {
            let (tokens, invalid) = tokenize_with_locations(source);
            let index = LineIndex::new(source);
            serde_json::to_string_pretty(&tokens_to_json(source, &index, &tokens, &invalid))
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        "token-simple" => {
            let (tokens, _) = tokenize_with_locations(source);
            Ok(tokens_to_simple(&tokens))
        }
        "ast-json" => serde_json::to_string_pretty(&parse(source))
            .map_err(|e| format!("JSON serialization failed: {e}")),
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}

fn tokens_to_json(
    source: &str,
    index: &LineIndex<'_>,
    tokens: &[(Token, Range<usize>)],
    invalid: &[Range<usize>],
) -> serde_json::Value {
    let recognised = tokens.iter().map(|(token, range)| {
        let position = index.position(range.start);
        json!({
            "token": format!("{:?}", token),
            "text": &source[range.clone()],
            "start": range.start,
            "end": range.end,
            "line": position.line,
            "column": position.column,
        })
    });
    let unrecognised = invalid.iter().map(|range| {
        let position = index.position(range.start);
        json!({
            "token": "Invalid",
            "text": &source[range.clone()],
            "start": range.start,
            "end": range.end,
            "line": position.line,
            "column": position.column,
        })
    });

    let mut all: Vec<_> = recognised.chain(unrecognised).collect();
    all.sort_by_key(|value| value["start"].as_u64());
    json!(all)
}

fn tokens_to_simple(tokens: &[(Token, Range<usize>)]) -> String {
    tokens
        .iter()
        .map(|(token, _)| format!("{token:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}
