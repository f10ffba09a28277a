use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A non-text artifact attached to a message (screenshot, export file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
}

/// One entry in the append-only conversation log.
///
/// The log is owned by the orchestrator's caller; the core only appends.
/// An in-progress assistant message is replaced wholesale when finalized,
/// never patched in place, so no partial state is ever persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Model reasoning trace, kept separate from visible content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            reasoning: None,
            timestamp: Utc::now(),
            attachments: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        let reasoning = reasoning.into();
        self.reasoning = (!reasoning.is_empty()).then_some(reasoning);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
    }

    #[test]
    fn constructors_assign_fresh_ids() {
        let a = ConversationMessage::user("hi");
        let b = ConversationMessage::user("hi");
        assert_ne!(a.id, b.id);
        assert_eq!(a.role, Role::User);
    }

    #[test]
    fn empty_reasoning_stays_none() {
        let msg = ConversationMessage::assistant("ok").with_reasoning("");
        assert!(msg.reasoning.is_none());
        let msg = ConversationMessage::assistant("ok").with_reasoning("thought");
        assert_eq!(msg.reasoning.as_deref(), Some("thought"));
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let msg = ConversationMessage::assistant("done");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("reasoning"));
        assert!(!json.contains("attachments"));
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{
            "id": "7f0f9e76-9f3a-4a1b-9d5e-0a4c5f7c2b11",
            "role": "user",
            "content": "plan my week",
            "timestamp": "2025-03-15T09:30:00Z"
        }"#;
        let msg: ConversationMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content, "plan my week");
        assert!(msg.attachments.is_empty());
    }
}
