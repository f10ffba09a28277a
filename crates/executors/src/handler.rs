//! The executor seam.

use async_trait::async_trait;
use stride_domain::tool::{ToolCall, ToolCallResult};
use stride_domain::Result;

/// One named capability the model can invoke.
///
/// Implementations return `Err` for operational failures they want reported;
/// the router also converts panics and timeouts into failed results, so a
/// handler never needs defensive wrapping of its own body.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    async fn execute(&self, call: &ToolCall) -> Result<ToolCallResult>;
}
