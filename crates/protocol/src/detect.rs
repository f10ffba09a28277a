//! Batch detection of call markers in a completed response.

use std::ops::Range;

use stride_domain::tool::ToolCall;

use crate::params;
use crate::scan::{scan_marker, MarkerScan, MARKER_OPEN};

/// Find every well-formed call marker in `response`, in reading order.
///
/// Malformed openers stay prose and scanning resumes after them. An opener
/// whose marker is still open at end of text swallows the rest of the
/// response, so nothing after it is detected.
pub fn detect(response: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    let mut cursor = 0usize;
    while let Some(found) = response[cursor..].find(MARKER_OPEN) {
        let open = cursor + found;
        match scan_marker(response, open) {
            MarkerScan::Complete(marker) => {
                let decoded = marker
                    .params
                    .as_ref()
                    .map(|range| params::decode(&response[range.clone()]))
                    .unwrap_or_default();
                calls.push(ToolCall {
                    name: response[marker.name.clone()].to_string(),
                    parameters: decoded.values,
                    decode_failures: decoded.failures,
                    raw_text: response[open..marker.end].to_string(),
                    span: open..marker.end,
                });
                cursor = marker.end;
            }
            // The opener itself contains no second '[', so skipping it
            // whole cannot jump over another opener.
            MarkerScan::Invalid => cursor = open + MARKER_OPEN.len(),
            MarkerScan::Incomplete => break,
        }
    }
    calls
}

/// Project the user-visible text of `response`: the detected spans removed,
/// surrounding text byte-for-byte intact.
///
/// A trailing opener that never completed is stream truncation; the text
/// from that opener onward is dropped rather than shown half-raw. The
/// streaming gate makes the same choice, so batch and streaming output
/// agree on every input.
pub fn visible_text(response: &str, calls: &[ToolCall]) -> String {
    let mut spans: Vec<Range<usize>> = calls.iter().map(|call| call.span.clone()).collect();
    spans.sort_by_key(|span| span.start);

    let mut out = String::with_capacity(response.len());
    let mut cursor = 0usize;
    for span in &spans {
        if span.start < cursor {
            continue;
        }
        out.push_str(&response[cursor..span.start]);
        cursor = span.end;
    }

    let mut scan_from = cursor;
    while let Some(found) = response[scan_from..].find(MARKER_OPEN) {
        let open = scan_from + found;
        match scan_marker(response, open) {
            MarkerScan::Incomplete => {
                out.push_str(&response[cursor..open]);
                return out;
            }
            _ => scan_from = open + MARKER_OPEN.len(),
        }
    }
    out.push_str(&response[cursor..]);
    out
}
