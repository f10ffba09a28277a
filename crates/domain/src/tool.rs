use std::ops::Range;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{DynamicValue, ParamFailure};

/// One capability call detected in a model response.
///
/// Constructed transiently per detection pass and discarded after routing;
/// never persisted. `raw_text` reproduces the source substring at `span`
/// exactly, brackets included.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Capability name. Non-empty, contains no whitespace.
    pub name: String,
    /// Successfully decoded parameters, in source order.
    pub parameters: IndexMap<String, DynamicValue>,
    /// Keys whose designated-JSON value failed to parse; the call still
    /// routes with the surviving siblings.
    pub decode_failures: Vec<ParamFailure>,
    /// The full marker text, `[TOOL_CALL:` through `]`.
    pub raw_text: String,
    /// Byte range of `raw_text` within the source response.
    pub span: Range<usize>,
}

impl ToolCall {
    pub fn param(&self, key: &str) -> Option<&DynamicValue> {
        self.parameters.get(key)
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(DynamicValue::as_str)
    }
}

/// Uniform result shape the router produces for every routed call.
///
/// `payload` is meaningful when `succeeded`, `failure_reason` otherwise;
/// faults never cross the routing boundary as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_name: String,
    pub succeeded: bool,
    /// Human/model-readable summary of what the capability did.
    pub payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ToolCallResult {
    pub fn success(tool_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            succeeded: true,
            payload: payload.into(),
            failure_reason: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            succeeded: false,
            payload: String::new(),
            failure_reason: Some(reason.into()),
        }
    }

    /// One-line summary regardless of outcome, for follow-up context.
    pub fn summary(&self) -> &str {
        if self.succeeded {
            &self.payload
        } else {
            self.failure_reason.as_deref().unwrap_or("failed")
        }
    }
}

/// Outcome of processing one complete model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTurn {
    /// The response prose with every well-formed marker excised.
    pub visible_text: String,
    /// One result per detected call, in source order.
    pub results: Vec<ToolCallResult>,
    /// True when calls executed and a follow-up completion is warranted.
    pub has_pending_follow_up: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_has_payload_only() {
        let r = ToolCallResult::success("plan_workout", "planned Row for 2025-03-15");
        assert!(r.succeeded);
        assert_eq!(r.summary(), "planned Row for 2025-03-15");
        assert!(r.failure_reason.is_none());
    }

    #[test]
    fn failure_surfaces_reason_in_summary() {
        let r = ToolCallResult::failure("plan_workout", "unknown tool");
        assert!(!r.succeeded);
        assert_eq!(r.summary(), "unknown tool");
        assert!(r.payload.is_empty());
    }

    #[test]
    fn failure_reason_omitted_from_json_on_success() {
        let r = ToolCallResult::success("get_training_status", "rest day");
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("failure_reason"));
    }

    #[test]
    fn param_accessors() {
        let mut parameters = IndexMap::new();
        parameters.insert("date".to_string(), DynamicValue::String("today".into()));
        parameters.insert("sets".to_string(), DynamicValue::Number(3.0));
        let call = ToolCall {
            name: "plan_workout".into(),
            parameters,
            decode_failures: Vec::new(),
            raw_text: "[TOOL_CALL: plan_workout(date: today, sets: 3)]".into(),
            span: 0..47,
        };
        assert_eq!(call.param_str("date"), Some("today"));
        assert_eq!(call.param("sets").and_then(DynamicValue::as_f64), Some(3.0));
        assert!(call.param("missing").is_none());
    }
}
