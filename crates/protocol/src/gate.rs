//! Streaming hold-back for call markers.
//!
//! Tokens arrive in arbitrary splits, so a marker can straddle any number of
//! them. The gate buffers the raw stream and releases text only once it can
//! no longer belong to a marker. Its one load-bearing property: concatenating
//! everything the gate releases equals [`crate::detect::visible_text`] over
//! the full response, byte for byte, for every token split.
//!
//! That holds because [`crate::scan::scan_marker`] verdicts are monotone:
//! `Invalid` stays invalid no matter what text arrives later, and only
//! `Incomplete` can still change, so `Incomplete` is the only verdict the
//! gate waits on.

use crate::scan::{is_opener_prefix, scan_marker, MarkerScan, MARKER_OPEN};

/// Incremental filter that withholds marker text from a token stream.
#[derive(Debug, Default)]
pub struct MarkerGate {
    buf: String,
    /// Everything before this offset has been released or excised.
    pos: usize,
}

impl MarkerGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one token; returns the text this token has just made safe to show.
    pub fn push(&mut self, token: &str) -> String {
        self.buf.push_str(token);
        self.drain()
    }

    /// The full raw stream so far, markers included. Detection runs on this.
    pub fn raw(&self) -> &str {
        &self.buf
    }

    /// End of stream. A held tail that is a real opener is a truncated
    /// marker and is dropped; a shorter fragment like `[TOO` is prose.
    pub fn finish(&mut self) -> String {
        let tail = &self.buf[self.pos..];
        let released = if tail.starts_with(MARKER_OPEN) {
            String::new()
        } else {
            tail.to_string()
        };
        self.pos = self.buf.len();
        released
    }

    fn drain(&mut self) -> String {
        let mut released = String::new();
        let mut scan_from = self.pos;
        loop {
            let Some(found) = self.buf[scan_from..].find('[') else {
                released.push_str(&self.buf[self.pos..]);
                self.pos = self.buf.len();
                break;
            };
            let open = scan_from + found;
            let tail = &self.buf[open..];
            if tail.starts_with(MARKER_OPEN) {
                match scan_marker(&self.buf, open) {
                    MarkerScan::Complete(marker) => {
                        released.push_str(&self.buf[self.pos..open]);
                        self.pos = marker.end;
                        scan_from = marker.end;
                    }
                    MarkerScan::Incomplete => {
                        released.push_str(&self.buf[self.pos..open]);
                        self.pos = open;
                        break;
                    }
                    MarkerScan::Invalid => scan_from = open + MARKER_OPEN.len(),
                }
            } else if is_opener_prefix(tail) {
                released.push_str(&self.buf[self.pos..open]);
                self.pos = open;
                break;
            } else {
                scan_from = open + 1;
            }
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{detect, visible_text};

    /// Feed `text` in splits of `chunk` bytes and collect everything released.
    fn stream_in_chunks(text: &str, chunk: usize) -> String {
        let mut gate = MarkerGate::new();
        let mut out = String::new();
        let bytes = text.as_bytes();
        let mut at = 0;
        while at < bytes.len() {
            let mut end = (at + chunk).min(bytes.len());
            while !text.is_char_boundary(end) {
                end += 1;
            }
            out.push_str(&gate.push(&text[at..end]));
            at = end;
        }
        out.push_str(&gate.finish());
        assert_eq!(gate.raw(), text);
        out
    }

    const CORPUS: &[&str] = &[
        "plain prose with no markers at all",
        "Sure! [TOOL_CALL: get_training_status] Let's check. \
            [TOOL_CALL: plan_workout(date: \"today\", workout_json: \"{\\\"title\\\":\\\"Row\\\"}\")]",
        "[TOOL_CALL: a][TOOL_CALL: b]",
        "Use [brackets] and [TOOLS] freely.",
        "[TOOL_CALL: !bad] then [TOOL_CALL: good]",
        r#"[TOOL_CALL: note(text: "see [TOOL_CALL: fake]")] done"#,
        "ends mid-marker [TOOL_CALL: plan_workout(date: \"tod",
        "ends mid-opener [TOOL_C",
        "a [TOOL_CALL: x( b [TOOL_CALL: y] c",
        "[TOOL_CALL: remove_workout(date: tomorrow)] trailing",
    ];

    #[test]
    fn streamed_output_matches_batch_visible_text() {
        for text in CORPUS {
            let batch = visible_text(text, &detect(text));
            for chunk in [1, 2, 3, 5, 7, 64] {
                assert_eq!(
                    stream_in_chunks(text, chunk),
                    batch,
                    "split={chunk} text={text:?}"
                );
            }
        }
    }

    #[test]
    fn prose_flows_through_unbuffered() {
        let mut gate = MarkerGate::new();
        assert_eq!(gate.push("Nice and "), "Nice and ");
        assert_eq!(gate.push("easy today."), "easy today.");
        assert_eq!(gate.finish(), "");
    }

    #[test]
    fn opener_prefix_is_held_until_resolved() {
        let mut gate = MarkerGate::new();
        assert_eq!(gate.push("Hello [TOO"), "Hello ");
        // Resolves to prose, not a marker.
        assert_eq!(gate.push("Lbox]"), "[TOOLbox]");
    }

    #[test]
    fn marker_is_excised_across_token_boundaries() {
        let mut gate = MarkerGate::new();
        assert_eq!(gate.push("Plan: "), "Plan: ");
        assert_eq!(gate.push("[TOOL_CALL: get"), "");
        assert_eq!(gate.push("_training_status]"), "");
        assert_eq!(gate.push(" done"), " done");
        assert_eq!(gate.finish(), "");
    }

    #[test]
    fn finish_drops_a_truncated_marker() {
        let mut gate = MarkerGate::new();
        assert_eq!(gate.push("ok [TOOL_CALL: plan_workout(date: \"tod"), "ok ");
        assert_eq!(gate.finish(), "");
        assert_eq!(gate.raw(), "ok [TOOL_CALL: plan_workout(date: \"tod");
    }

    #[test]
    fn finish_flushes_a_short_bracket_fragment() {
        let mut gate = MarkerGate::new();
        assert_eq!(gate.push("ok [TOOL_C"), "ok ");
        assert_eq!(gate.finish(), "[TOOL_C");
    }
}
