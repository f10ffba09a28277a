//! Fault-isolating dispatch of detected calls.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::Instrument;

use stride_domain::tool::{ToolCall, ToolCallResult};

use crate::registry::ExecutorRegistry;

/// Routes one detected call to its executor and absorbs every fault.
pub struct CallRouter {
    registry: Arc<ExecutorRegistry>,
    tool_timeout: Duration,
}

impl CallRouter {
    pub fn new(registry: Arc<ExecutorRegistry>, tool_timeout: Duration) -> Self {
        Self {
            registry,
            tool_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<ExecutorRegistry> {
        &self.registry
    }

    /// Execute `call` and always come back with a result.
    ///
    /// Unknown names, executor errors, panics, and slow executors each
    /// produce a failed result instead of propagating.
    pub async fn route(&self, call: &ToolCall) -> ToolCallResult {
        let span = tracing::info_span!("tool_call", tool = %call.name);
        async {
            let Some(handler) = self.registry.resolve(&call.name) else {
                tracing::warn!(tool = %call.name, "no executor registered");
                return ToolCallResult::failure(&call.name, "unknown tool");
            };

            // catch_unwind: a panicking executor always produces a result.
            let guarded = AssertUnwindSafe(handler.execute(call)).catch_unwind();
            match tokio::time::timeout(self.tool_timeout, guarded).await {
                Ok(Ok(Ok(result))) => result,
                Ok(Ok(Err(err))) => {
                    tracing::warn!(tool = %call.name, error = %err, "executor failed");
                    ToolCallResult::failure(&call.name, err.to_string())
                }
                Ok(Err(_panic)) => {
                    tracing::error!(tool = %call.name, "executor panicked");
                    ToolCallResult::failure(&call.name, "executor panicked")
                }
                Err(_) => {
                    tracing::warn!(tool = %call.name, "executor timed out");
                    ToolCallResult::failure(
                        &call.name,
                        format!("timed out after {}s", self.tool_timeout.as_secs()),
                    )
                }
            }
        }
        .instrument(span)
        .await
    }
}
