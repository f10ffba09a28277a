//! The turn loop: stream the completion, gate markers out of the visible
//! stream, dispatch detected calls, feed results back, repeat.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use stride_domain::config::OrchestratorConfig;
use stride_domain::message::ConversationMessage;
use stride_domain::stream::{CompletionEvent, Usage};
use stride_domain::tool::{ProcessedTurn, ToolCallResult};
use stride_domain::Result;
use stride_executors::CallRouter;
use stride_protocol::{detect, visible_text, MarkerGate};
use stride_providers::{CompletionProvider, CompletionRequest};

use crate::cancel::{CancelMap, CancelToken};
use crate::events::TurnEvent;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn input
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Input to a single turn.
pub struct TurnInput {
    /// Key for cancellation; one running turn per conversation.
    pub conversation_id: String,
    /// Prior messages, system prompt included. The caller owns the log;
    /// the loop works on a private copy and hands finalized messages back
    /// through [`TurnEvent::TurnCompleted`].
    pub history: Vec<ConversationMessage>,
    pub user_message: String,
    /// Model override. None = provider default.
    pub model: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Drives multi-turn conversations against one provider and one router.
///
/// Everything is injected; two orchestrators in the same process never
/// share state unless handed the same `Arc`s.
#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
    router: Arc<CallRouter>,
    config: OrchestratorConfig,
    cancels: Arc<CancelMap>,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        router: Arc<CallRouter>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provider,
            router,
            config,
            cancels: Arc::new(CancelMap::new()),
        }
    }

    /// Request cancellation of the running turn for a conversation.
    /// Returns true if one was running.
    pub fn cancel(&self, conversation_id: &str) -> bool {
        self.cancels.cancel(conversation_id)
    }

    /// Check if a conversation has a turn in flight.
    pub fn is_running(&self, conversation_id: &str) -> bool {
        self.cancels.is_running(conversation_id)
    }

    /// Run one user turn: stream the completion, dispatch detected calls,
    /// request follow-ups until the model stops calling tools or the
    /// completion bound is hit.
    ///
    /// Returns a channel receiver of [`TurnEvent`]s; the caller reads them
    /// as they arrive. The channel closes when the turn is over.
    pub fn run_turn(&self, input: TurnInput) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel::<TurnEvent>(64);

        let cancel_token = self.cancels.register(&input.conversation_id);
        let conversation_id = input.conversation_id.clone();
        let this = self.clone();

        let turn_span = tracing::info_span!("turn", conversation_id = %conversation_id);
        tokio::spawn(tracing::Instrument::instrument(
            async move {
                tracing::debug!("turn started");
                let result = this.run_turn_inner(input, tx.clone(), &cancel_token).await;

                this.cancels.remove(&conversation_id);

                if let Err(e) = result {
                    let _ = tx
                        .send(TurnEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                }
            },
            turn_span,
        ));

        rx
    }

    async fn run_turn_inner(
        &self,
        input: TurnInput,
        tx: mpsc::Sender<TurnEvent>,
        cancel: &CancelToken,
    ) -> Result<()> {
        let mut messages = input.history;
        messages.push(ConversationMessage::user(&input.user_message));

        let max_turns = self.config.max_turns.max(1);
        let mut total = Usage {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
        };

        for turn_idx in 0..max_turns {
            if cancel.is_cancelled() {
                let _ = tx
                    .send(TurnEvent::Stopped {
                        content: String::new(),
                    })
                    .await;
                return Ok(());
            }

            tracing::debug!(turn = turn_idx, "requesting completion");
            let mut request = CompletionRequest::from_messages(messages.clone());
            request.model = input.model.clone();
            let mut stream = self.provider.stream_completion(&request).await?;

            // ── Consume the stream through the marker gate ──────────
            let mut gate = MarkerGate::new();
            let mut visible = String::new();
            let mut reasoning = String::new();
            let mut turn_usage: Option<Usage> = None;
            let mut provider_error: Option<String> = None;
            let mut was_cancelled = false;

            while let Some(event) = stream.next().await {
                if cancel.is_cancelled() {
                    was_cancelled = true;
                    break;
                }
                match event {
                    Ok(CompletionEvent::Token { text }) => {
                        let released = gate.push(&text);
                        if !released.is_empty() {
                            visible.push_str(&released);
                            let _ = tx.send(TurnEvent::AssistantDelta { text: released }).await;
                        }
                    }
                    Ok(CompletionEvent::Reasoning { text }) => {
                        reasoning.push_str(&text);
                        let _ = tx.send(TurnEvent::Reasoning { text }).await;
                    }
                    Ok(CompletionEvent::Done { usage, .. }) => {
                        if usage.is_some() {
                            turn_usage = usage;
                        }
                    }
                    Ok(CompletionEvent::Error { message }) => {
                        provider_error = Some(message);
                        break;
                    }
                    Err(e) => {
                        provider_error = Some(e.to_string());
                        break;
                    }
                }
            }

            if was_cancelled {
                let _ = tx.send(TurnEvent::Stopped { content: visible }).await;
                return Ok(());
            }

            // Final flush. A truncated trailing marker is dropped here, so
            // detection below sees exactly what the caller saw.
            let tail = gate.finish();
            if !tail.is_empty() {
                visible.push_str(&tail);
                let _ = tx.send(TurnEvent::AssistantDelta { text: tail }).await;
            }

            if let Some(u) = &turn_usage {
                total.prompt_tokens += u.prompt_tokens;
                total.completion_tokens += u.completion_tokens;
                total.total_tokens += u.total_tokens;
            }

            if let Some(message) = provider_error {
                // Salvage whatever prose made it out before failing.
                if !visible.is_empty() {
                    let partial = ConversationMessage::assistant(&visible)
                        .with_reasoning(reasoning);
                    let _ = tx.send(TurnEvent::TurnCompleted { message: partial }).await;
                }
                tracing::warn!(error = %message, "provider stream failed");
                let _ = tx.send(TurnEvent::Error { message }).await;
                return Ok(());
            }

            let calls = detect(gate.raw());
            tracing::debug!(calls = calls.len(), "completion finished");

            let assistant = ConversationMessage::assistant(&visible).with_reasoning(&reasoning);
            let _ = tx
                .send(TurnEvent::TurnCompleted {
                    message: assistant.clone(),
                })
                .await;
            messages.push(assistant);

            if calls.is_empty() {
                let _ = tx
                    .send(TurnEvent::Usage {
                        prompt_tokens: total.prompt_tokens,
                        completion_tokens: total.completion_tokens,
                        total_tokens: total.total_tokens,
                    })
                    .await;
                return Ok(());
            }

            // ── Dispatch calls sequentially, in source order ────────
            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                if cancel.is_cancelled() {
                    let _ = tx
                        .send(TurnEvent::Stopped {
                            content: visible.clone(),
                        })
                        .await;
                    return Ok(());
                }
                let _ = tx
                    .send(TurnEvent::ToolStarted {
                        tool_name: call.name.clone(),
                    })
                    .await;
                let result = self.router.route(call).await;
                let _ = tx
                    .send(TurnEvent::ToolFinished {
                        result: result.clone(),
                    })
                    .await;
                results.push(result);
            }

            messages.push(results_context_message(&results));

            if turn_idx == max_turns - 1 {
                tracing::warn!(turns = max_turns, "completion bound reached");
                let _ = tx.send(TurnEvent::MaxTurnsReached { turns: max_turns }).await;
                let _ = tx
                    .send(TurnEvent::Usage {
                        prompt_tokens: total.prompt_tokens,
                        completion_tokens: total.completion_tokens,
                        total_tokens: total.total_tokens,
                    })
                    .await;
                return Ok(());
            }
        }

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Follow-up context
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fold routed results into one system message for the follow-up
/// completion. Entries keep call order, failures included, so the model
/// can acknowledge exactly what happened.
fn results_context_message(results: &[ToolCallResult]) -> ConversationMessage {
    let mut content = String::from("Tool results (in call order):");
    for (idx, result) in results.iter().enumerate() {
        let status = if result.succeeded { "ok" } else { "failed" };
        content.push_str(&format!(
            "\n{}. {} [{}]: {}",
            idx + 1,
            result.tool_name,
            status,
            result.summary()
        ));
    }
    ConversationMessage::system(content)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// One-shot processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process one already-complete response: detect calls, route each in
/// source order, and project the visible text. The non-streaming sibling
/// of [`Orchestrator::run_turn`] for batch transcripts and tests.
pub async fn process_response(response: &str, router: &CallRouter) -> ProcessedTurn {
    let calls = detect(response);
    let visible = visible_text(response, &calls);

    let mut results = Vec::with_capacity(calls.len());
    for call in &calls {
        results.push(router.route(call).await);
    }

    ProcessedTurn {
        visible_text: visible,
        has_pending_follow_up: !results.is_empty(),
        results,
    }
}
