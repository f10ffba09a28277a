//! Events emitted by the turn loop.

use serde::Serialize;
use stride_domain::message::ConversationMessage;
use stride_domain::tool::ToolCallResult;

/// Everything a caller can observe while a turn runs.
///
/// Deltas arrive already gated: marker text never appears in
/// `AssistantDelta`, only in the `ToolStarted`/`ToolFinished` pair it
/// resolved to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum TurnEvent {
    /// Chain-of-thought text, streamed as the model produces it.
    #[serde(rename = "reasoning")]
    Reasoning { text: String },

    /// A chunk of user-visible assistant text.
    #[serde(rename = "assistant_delta")]
    AssistantDelta { text: String },

    /// A detected call is about to be dispatched.
    #[serde(rename = "tool_started")]
    ToolStarted { tool_name: String },

    /// The dispatched call came back (success or failure).
    #[serde(rename = "tool_finished")]
    ToolFinished { result: ToolCallResult },

    /// One completion finished; the message holds its full visible text.
    /// Fires once per completion, so a turn with follow-ups emits several.
    #[serde(rename = "turn_completed")]
    TurnCompleted { message: ConversationMessage },

    /// The completion bound was hit with tool calls still being produced.
    #[serde(rename = "max_turns")]
    MaxTurnsReached { turns: usize },

    /// The turn was cancelled; `content` is the visible text emitted so far.
    #[serde(rename = "stopped")]
    Stopped { content: String },

    /// The turn failed. Always the last event when it fires.
    #[serde(rename = "error")]
    Error { message: String },

    /// Token totals accumulated across every completion in the turn.
    #[serde(rename = "usage")]
    Usage {
        prompt_tokens: u32,
        completion_tokens: u32,
        total_tokens: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = TurnEvent::AssistantDelta {
            text: "hello".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "assistant_delta");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn tool_finished_carries_the_result() {
        let event = TurnEvent::ToolFinished {
            result: ToolCallResult::failure("plan_workout", "missing workout_json"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tool_finished");
        assert_eq!(json["result"]["tool_name"], "plan_workout");
        assert_eq!(json["result"]["succeeded"], false);
    }
}
