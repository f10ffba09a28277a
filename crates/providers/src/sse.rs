//! SSE plumbing shared by streaming adapters.

use stride_domain::error::Result;
use stride_domain::stream::{BoxStream, CompletionEvent};

use crate::util::from_reqwest;

/// Pull every complete `data:` payload out of `buffer`, leaving any trailing
/// partial event in place for the next chunk.
///
/// Events are delimited by `\n\n`; `event:`, `id:`, and `retry:` lines are
/// ignored.
pub(crate) fn take_data_payloads(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(pos) = buffer.find("\n\n") {
        for line in buffer[..pos].lines() {
            if let Some(data) = line.trim().strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    payloads.push(data.to_string());
                }
            }
        }
        buffer.replace_range(..pos + 2, "");
    }
    payloads
}

/// Wrap an SSE `reqwest::Response` into an event stream.
///
/// `parse` maps one `data:` payload to at most one event. The stream flushes
/// a final partial event when the body closes and synthesizes a `Done` if
/// the backend never sent one.
pub(crate) fn event_stream<F>(
    response: reqwest::Response,
    mut parse: F,
) -> BoxStream<'static, Result<CompletionEvent>>
where
    F: FnMut(&str) -> Option<Result<CompletionEvent>> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut response = response;
        let mut buffer = String::new();
        let mut done_emitted = false;

        loop {
            match response.chunk().await {
                Ok(Some(bytes)) => {
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    for payload in take_data_payloads(&mut buffer) {
                        if let Some(event) = parse(&payload) {
                            done_emitted |= matches!(&event, Ok(CompletionEvent::Done { .. }));
                            yield event;
                        }
                    }
                }
                Ok(None) => {
                    if !buffer.trim().is_empty() {
                        buffer.push_str("\n\n");
                        for payload in take_data_payloads(&mut buffer) {
                            if let Some(event) = parse(&payload) {
                                done_emitted |= matches!(&event, Ok(CompletionEvent::Done { .. }));
                                yield event;
                            }
                        }
                    }
                    break;
                }
                Err(e) => {
                    yield Err(from_reqwest(e));
                    break;
                }
            }
        }

        if !done_emitted {
            yield Ok(CompletionEvent::Done {
                usage: None,
                finish_reason: Some("stop".into()),
            });
        }
    };

    Box::pin(stream)
}
