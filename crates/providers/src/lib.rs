//! Streaming completion backends.
//!
//! One trait, [`traits::CompletionProvider`], hides the wire protocol from
//! the conversation layer. The shipped adapter speaks the OpenAI-compatible
//! chat completions contract over SSE, which covers OpenAI itself plus
//! Ollama, vLLM, LM Studio, and most hosted gateways.

pub mod openai_compat;
pub(crate) mod sse;
pub mod traits;
pub(crate) mod util;

// Re-exports for convenience.
pub use openai_compat::OpenAiCompatProvider;
pub use traits::{CompletionProvider, CompletionRequest};
