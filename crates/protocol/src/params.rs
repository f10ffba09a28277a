//! Parameter decoding for call markers.
//!
//! Two shapes are accepted between a marker's parentheses: a single JSON
//! object covering all parameters, or flat `key: value` pairs. Decoding is
//! permissive. A value that cannot be decoded is recorded as a failure under
//! its key and never aborts the rest of the map.

use indexmap::IndexMap;
use stride_domain::value::{DynamicValue, ParamFailure};

use crate::scan::{split_pair, split_top_level};

/// Key whose value is an embedded JSON document rather than a scalar.
pub const JSON_PAYLOAD_KEY: &str = "workout_json";

/// Failure key used when the whole parameter text is one malformed document.
const RAW_KEY: &str = "_raw";

/// Decoded parameters in document order, plus any per-key failures.
#[derive(Debug, Default, Clone)]
pub struct DecodedParams {
    pub values: IndexMap<String, DynamicValue>,
    pub failures: Vec<ParamFailure>,
}

/// Decode the raw text between a marker's parentheses.
pub fn decode(raw: &str) -> DecodedParams {
    let mut out = DecodedParams::default();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return out;
    }

    if trimmed.starts_with('{') {
        match serde_json::from_str::<DynamicValue>(trimmed) {
            Ok(DynamicValue::Object(map)) => out.values = map,
            Ok(other) => out.failures.push(ParamFailure {
                key: RAW_KEY.to_string(),
                reason: format!("expected a JSON object, got {other}"),
            }),
            Err(err) => out.failures.push(ParamFailure {
                key: RAW_KEY.to_string(),
                reason: err.to_string(),
            }),
        }
        return out;
    }

    for piece in split_top_level(trimmed, ',') {
        let piece = piece.trim();
        if piece.is_empty() {
            // Trailing or doubled comma.
            continue;
        }
        let Some((key, value)) = split_pair(piece) else {
            tracing::debug!(piece, "skipping parameter without a key/value separator");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            tracing::debug!(piece, "skipping parameter with an empty key");
            continue;
        }
        match decode_value(key, value.trim()) {
            Ok(value) => {
                out.values.insert(key.to_string(), value);
            }
            Err(reason) => out.failures.push(ParamFailure {
                key: key.to_string(),
                reason,
            }),
        }
    }
    out
}

/// Decode one flat value. Only the JSON payload key can fail; every other
/// key degrades to a string.
fn decode_value(key: &str, raw: &str) -> Result<DynamicValue, String> {
    if raw.starts_with('"') {
        // JSON string decoding unescapes \" and friends; a value that is not
        // a well-formed JSON string keeps its content minus the outer quotes.
        let content = serde_json::from_str::<String>(raw)
            .unwrap_or_else(|_| raw.trim_matches('"').to_string());
        if key == JSON_PAYLOAD_KEY {
            return parse_payload(&content);
        }
        return Ok(DynamicValue::String(content));
    }

    if raw.starts_with('{') || raw.starts_with('[') {
        return match serde_json::from_str::<DynamicValue>(raw) {
            Ok(value) => Ok(value),
            Err(err) if key == JSON_PAYLOAD_KEY => Err(err.to_string()),
            Err(_) => Ok(DynamicValue::String(raw.to_string())),
        };
    }

    if key == JSON_PAYLOAD_KEY {
        return parse_payload(raw);
    }
    Ok(match raw {
        "true" => DynamicValue::Bool(true),
        "false" => DynamicValue::Bool(false),
        "null" => DynamicValue::Null,
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => DynamicValue::Number(n),
            _ => DynamicValue::String(raw.to_string()),
        },
    })
}

fn parse_payload(content: &str) -> Result<DynamicValue, String> {
    serde_json::from_str::<DynamicValue>(content).map_err(|err| err.to_string())
}
