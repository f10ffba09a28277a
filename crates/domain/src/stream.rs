use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A boxed async stream, used for streaming completion responses.
pub type BoxStream<'a, T> = Pin<Box<dyn futures_core::Stream<Item = T> + Send + 'a>>;

/// Events emitted while a completion streams (provider-agnostic).
///
/// There are no tool-call variants here: in this protocol, capability calls
/// ride inside the prose as bracketed markers and are recovered downstream
/// by the detector, so the wire stream carries text only.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CompletionEvent {
    /// A visible-prose token chunk.
    #[serde(rename = "token")]
    Token { text: String },

    /// A reasoning-trace chunk, accumulated separately from prose.
    #[serde(rename = "reasoning")]
    Reasoning { text: String },

    /// Stream is finished.
    #[serde(rename = "done")]
    Done {
        usage: Option<Usage>,
        finish_reason: Option<String>,
    },

    /// Provider-reported error mid-stream.
    #[serde(rename = "error")]
    Error { message: String },
}

/// Token usage for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
