use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A dynamic parameter value decoded from a tool-call marker.
///
/// Untagged so embedded JSON documents round-trip without a wrapper layer;
/// `Object` keeps document key order, which handlers rely on when echoing
/// parameters back into model-visible summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DynamicValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<DynamicValue>),
    Object(IndexMap<String, DynamicValue>),
}

impl DynamicValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DynamicValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DynamicValue]> {
        match self {
            DynamicValue::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, DynamicValue>> {
        match self {
            DynamicValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }
}

impl std::fmt::Display for DynamicValue {
    /// JSON rendering; bare strings print unquoted.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DynamicValue::String(s) => write!(f, "{s}"),
            other => write!(
                f,
                "{}",
                serde_json::to_string(other).unwrap_or_default()
            ),
        }
    }
}

impl From<&str> for DynamicValue {
    fn from(s: &str) -> Self {
        DynamicValue::String(s.to_string())
    }
}

impl From<f64> for DynamicValue {
    fn from(n: f64) -> Self {
        DynamicValue::Number(n)
    }
}

impl From<bool> for DynamicValue {
    fn from(b: bool) -> Self {
        DynamicValue::Bool(b)
    }
}

/// A single parameter key that failed structured decoding.
///
/// Only the designated JSON-payload key produces these; sibling keys decode
/// independently and the call still routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamFailure {
    pub key: String,
    pub reason: String,
}
