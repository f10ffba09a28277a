//! OpenAI-compatible chat completions adapter.
//!
//! Covers OpenAI itself plus Ollama, vLLM, LM Studio, Together, and any
//! other endpoint that streams the chat completions SSE contract.

use std::time::Duration;

use serde_json::Value;

use stride_domain::config::ProviderConfig;
use stride_domain::error::{Error, Result};
use stride_domain::message::ConversationMessage;
use stride_domain::stream::{BoxStream, CompletionEvent, Usage};

use crate::sse;
use crate::traits::{CompletionProvider, CompletionRequest};
use crate::util::{from_reqwest, resolve_api_key};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Adapter for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiCompatProvider {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    auth_header: String,
    /// Prefix + key, resolved once at construction. `None` sends requests
    /// unauthenticated (local backends).
    auth_value: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn from_config(cfg: &ProviderConfig) -> Result<Self> {
        let auth_value =
            resolve_api_key(&cfg.auth).map(|key| format!("{}{}", cfg.auth.prefix, key));
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            auth_header: cfg.auth.header.clone(),
            auth_value,
            client,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_body(&self, req: &CompletionRequest) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(message_to_wire).collect();
        let mut body = serde_json::json!({
            "model": req.model.clone().unwrap_or_else(|| self.model.clone()),
            "messages": messages,
            "stream": true,
            "temperature": req.temperature.unwrap_or(self.temperature),
            "stream_options": {"include_usage": true},
        });
        if let Some(max) = req.max_tokens.or(self.max_tokens) {
            body["max_tokens"] = serde_json::json!(max);
        }
        body
    }

    fn authed_post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        if let Some(ref value) = self.auth_value {
            builder = builder.header(&self.auth_header, value);
        }
        builder
    }
}

fn message_to_wire(msg: &ConversationMessage) -> Value {
    serde_json::json!({
        "role": msg.role,
        "content": msg.content,
    })
}

/// Map one SSE `data:` payload to at most one event.
///
/// `[DONE]` carries no information beyond what the finish chunk already
/// said, so it maps to nothing; the stream wrapper synthesizes a `Done`
/// if no chunk produced one.
fn parse_stream_data(data: &str) -> Option<Result<CompletionEvent>> {
    if data.trim() == "[DONE]" {
        return None;
    }

    let v: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => return Some(Err(Error::Json(e))),
    };

    let choice = v
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first());

    let Some(choice) = choice else {
        // Usage-only chunk (stream_options.include_usage).
        if let Some(usage) = v.get("usage").and_then(parse_usage) {
            return Some(Ok(CompletionEvent::Done {
                usage: Some(usage),
                finish_reason: None,
            }));
        }
        return None;
    };

    if let Some(reason) = choice.get("finish_reason").and_then(Value::as_str) {
        let usage = v.get("usage").and_then(parse_usage);
        return Some(Ok(CompletionEvent::Done {
            usage,
            finish_reason: Some(reason.to_string()),
        }));
    }

    let delta = choice.get("delta").unwrap_or(&Value::Null);

    // Reasoning content (DeepSeek and friends).
    if let Some(text) = delta.get("reasoning_content").and_then(Value::as_str) {
        if !text.is_empty() {
            return Some(Ok(CompletionEvent::Reasoning {
                text: text.to_string(),
            }));
        }
    }

    if let Some(text) = delta.get("content").and_then(Value::as_str) {
        if !text.is_empty() {
            return Some(Ok(CompletionEvent::Token {
                text: text.to_string(),
            }));
        }
    }

    None
}

fn parse_usage(v: &Value) -> Option<Usage> {
    Some(Usage {
        prompt_tokens: v.get("prompt_tokens")?.as_u64()? as u32,
        completion_tokens: v.get("completion_tokens")?.as_u64()? as u32,
        total_tokens: v.get("total_tokens")?.as_u64()? as u32,
    })
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    async fn stream_completion(
        &self,
        req: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<CompletionEvent>>> {
        let url = self.chat_url();
        let body = self.build_body(req);

        tracing::debug!(url = %url, model = %self.model, "chat completions stream request");

        let resp = self
            .authed_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let err_text = resp.text().await.map_err(from_reqwest)?;
            return Err(Error::Provider {
                provider: self.provider_id().to_string(),
                message: format!("HTTP {} - {}", status.as_u16(), err_text),
            });
        }

        Ok(sse::event_stream(resp, parse_stream_data))
    }

    fn provider_id(&self) -> &str {
        "openai_compat"
    }
}
