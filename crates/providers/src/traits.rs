//! The provider seam between the conversation loop and wire adapters.

use async_trait::async_trait;

use stride_domain::message::ConversationMessage;
use stride_domain::stream::{BoxStream, CompletionEvent};
use stride_domain::Result;

/// One streaming completion request.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// The conversation messages to send, oldest first.
    pub messages: Vec<ConversationMessage>,
    /// Model identifier override. When `None`, the provider uses its default.
    pub model: Option<String>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
    /// Maximum response tokens override.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn from_messages(messages: Vec<ConversationMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }
}

/// A streaming text-completion backend.
///
/// Implementations translate between the internal message types and one
/// provider's HTTP wire format.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Open a token stream for `req`.
    ///
    /// A healthy stream finishes with at least one [`CompletionEvent::Done`].
    /// Usage and finish reason may arrive on separate `Done` events, so
    /// consumers fold them instead of stopping at the first.
    async fn stream_completion(
        &self,
        req: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<CompletionEvent>>>;

    /// A unique identifier for this provider instance.
    fn provider_id(&self) -> &str;
}
