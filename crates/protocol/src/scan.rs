//! The marker grammar, as one bracket/quote-aware scanner.
//!
//! Regex cannot balance nested braces and quoted strings, so the whole
//! grammar lives here as an explicit scan. Batch detection and the
//! streaming gate both classify text through these functions; there is no
//! second grammar to drift out of sync.

use std::ops::Range;

/// The literal opening token of a call marker.
pub const MARKER_OPEN: &str = "[TOOL_CALL:";

/// Classification of the text at a `[TOOL_CALL:` opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerScan {
    /// A complete, well-formed marker.
    Complete(ParsedMarker),
    /// Text ran out while the marker could still complete.
    Incomplete,
    /// Cannot be a marker; the opener is ordinary prose.
    Invalid,
}

/// Byte ranges of a complete marker's pieces within the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMarker {
    /// One past the closing `]`.
    pub end: usize,
    /// The capability name.
    pub name: Range<usize>,
    /// Raw parameter bytes between the parentheses, when present.
    pub params: Option<Range<usize>>,
}

/// True when `tail` is a strict prefix of [`MARKER_OPEN`] and so could still
/// grow into an opener as more tokens arrive.
pub fn is_opener_prefix(tail: &str) -> bool {
    tail.len() < MARKER_OPEN.len() && MARKER_OPEN.as_bytes().starts_with(tail.as_bytes())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Classify `text` at byte offset `open`, which must sit on [`MARKER_OPEN`].
///
/// Grammar: `[TOOL_CALL:` ws* name ws* ( `(` balanced-params `)` ws* )? `]`.
/// Whitespace inside the envelope is tolerated; anything else that cannot
/// appear in a marker makes the opener ordinary prose.
pub fn scan_marker(text: &str, open: usize) -> MarkerScan {
    if !text[open..].starts_with(MARKER_OPEN) {
        return MarkerScan::Invalid;
    }
    let body = open + MARKER_OPEN.len();

    let Some(name_start) = skip_ws(text, body) else {
        return MarkerScan::Incomplete;
    };
    let mut name_end = name_start;
    for (i, c) in text[name_start..].char_indices() {
        if is_name_char(c) {
            name_end = name_start + i + c.len_utf8();
        } else {
            break;
        }
    }
    if name_end == name_start {
        // Opener present but the next non-space char cannot start a name.
        return MarkerScan::Invalid;
    }
    let name = name_start..name_end;

    let Some(after_name) = skip_ws(text, name_end) else {
        return MarkerScan::Incomplete;
    };
    match char_at(text, after_name) {
        ']' => MarkerScan::Complete(ParsedMarker {
            end: after_name + 1,
            name,
            params: None,
        }),
        '(' => match scan_group(text, after_name) {
            GroupScan::Closed { end } => {
                let Some(close) = skip_ws(text, end) else {
                    return MarkerScan::Incomplete;
                };
                if char_at(text, close) == ']' {
                    MarkerScan::Complete(ParsedMarker {
                        end: close + 1,
                        name,
                        params: Some(after_name + 1..end - 1),
                    })
                } else {
                    MarkerScan::Invalid
                }
            }
            GroupScan::Open => MarkerScan::Incomplete,
            GroupScan::Mismatched => MarkerScan::Invalid,
        },
        _ => MarkerScan::Invalid,
    }
}

/// Result of scanning one delimiter group from its opening bracket.
enum GroupScan {
    /// The group closed; `end` is one past the closing delimiter.
    Closed { end: usize },
    /// Text ran out inside the group (or inside a string).
    Open,
    /// A closing delimiter did not match its opener.
    Mismatched,
}

/// Scan a `(`/`{`/`[` group starting at `open`, honoring nested groups,
/// double-quoted strings, and backslash escapes.
fn scan_group(text: &str, open: usize) -> GroupScan {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[open..].char_indices() {
        let at = open + i;
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '(' | '{' | '[' if !in_string => stack.push(c),
            ')' | '}' | ']' if !in_string => {
                let expected = match c {
                    ')' => '(',
                    '}' => '{',
                    _ => '[',
                };
                match stack.pop() {
                    Some(top) if top == expected => {
                        if stack.is_empty() {
                            return GroupScan::Closed { end: at + 1 };
                        }
                    }
                    _ => return GroupScan::Mismatched,
                }
            }
            _ => {}
        }
    }
    GroupScan::Open
}

/// Split `raw` at top-level occurrences of `sep`: separators inside quotes
/// or inside balanced groups do not split.
pub(crate) fn split_top_level(raw: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    let mut start = 0usize;

    for (i, c) in raw.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '(' | '{' | '[' if !in_string => depth += 1,
            ')' | '}' | ']' if !in_string => depth = depth.saturating_sub(1),
            c if c == sep && !in_string && depth == 0 => {
                pieces.push(&raw[start..i]);
                start = i + sep.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&raw[start..]);
    pieces
}

/// Split one `key: value` piece at its first top-level colon.
pub(crate) fn split_pair(piece: &str) -> Option<(&str, &str)> {
    let mut in_string = false;
    let mut escape_next = false;
    for (i, c) in piece.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            ':' if !in_string => return Some((&piece[..i], &piece[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Offset of the first non-whitespace char at or after `from`, or None at
/// end of text.
fn skip_ws(text: &str, from: usize) -> Option<usize> {
    text[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| from + i)
}

fn char_at(text: &str, at: usize) -> char {
    text[at..].chars().next().unwrap_or('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(text: &str) -> ParsedMarker {
        match scan_marker(text, 0) {
            MarkerScan::Complete(m) => m,
            other => panic!("expected Complete, got {other:?} for {text:?}"),
        }
    }

    #[test]
    fn bare_marker_without_params() {
        let m = complete("[TOOL_CALL: get_training_status]");
        assert_eq!(&"[TOOL_CALL: get_training_status]"[m.name.clone()], "get_training_status");
        assert!(m.params.is_none());
        assert_eq!(m.end, "[TOOL_CALL: get_training_status]".len());
    }

    #[test]
    fn marker_with_flat_params() {
        let text = "[TOOL_CALL: plan_workout(date: today, sets: 3)]";
        let m = complete(text);
        assert_eq!(&text[m.params.clone().unwrap()], "date: today, sets: 3");
        assert_eq!(m.end, text.len());
    }

    #[test]
    fn params_may_contain_nested_groups_and_quotes() {
        let text = r#"[TOOL_CALL: plan_workout(workout_json: {"sets": [1, 2], "note": "a) b]"})]"#;
        let m = complete(text);
        assert_eq!(
            &text[m.params.clone().unwrap()],
            r#"workout_json: {"sets": [1, 2], "note": "a) b]"}"#
        );
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let text = r#"[TOOL_CALL: plan_workout(workout_json: "{\"title\":\"Row\"}")]"#;
        let m = complete(text);
        assert_eq!(
            &text[m.params.clone().unwrap()],
            r#"workout_json: "{\"title\":\"Row\"}""#
        );
    }

    #[test]
    fn truncated_markers_are_incomplete() {
        for text in [
            "[TOOL_CALL:",
            "[TOOL_CALL: ",
            "[TOOL_CALL: plan",
            "[TOOL_CALL: plan_workout(",
            "[TOOL_CALL: plan_workout(date: \"tod",
            "[TOOL_CALL: plan_workout(date: today)",
        ] {
            assert_eq!(scan_marker(text, 0), MarkerScan::Incomplete, "{text:?}");
        }
    }

    #[test]
    fn impossible_markers_are_invalid() {
        for text in [
            "[TOOL_CALL: [nested]",
            "[TOOL_CALL: !bang]",
            "[TOOL_CALL: name(x: 1) trailing]",
            "[TOOL_CALL: name(a: ])]",
        ] {
            assert_eq!(scan_marker(text, 0), MarkerScan::Invalid, "{text:?}");
        }
    }

    #[test]
    fn whitespace_inside_envelope_tolerated() {
        let text = "[TOOL_CALL:  remove_workout ( date: tomorrow ) ]";
        let m = complete(text);
        assert_eq!(&text[m.name.clone()], "remove_workout");
        assert_eq!(&text[m.params.clone().unwrap()], " date: tomorrow ");
    }

    #[test]
    fn scan_starts_at_given_offset() {
        let text = "prose [TOOL_CALL: a] prose";
        match scan_marker(text, 6) {
            MarkerScan::Complete(m) => assert_eq!(m.end, 20),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn opener_prefix_detection() {
        assert!(is_opener_prefix("["));
        assert!(is_opener_prefix("[TOOL"));
        assert!(is_opener_prefix("[TOOL_CALL"));
        assert!(!is_opener_prefix("[TOOL_CALL:"));
        assert!(!is_opener_prefix("[TX"));
        assert!(!is_opener_prefix("x"));
    }

    #[test]
    fn split_top_level_respects_quotes_and_groups() {
        let raw = r#"note: "a, b", json: {"k": [1, 2]}, date: today"#;
        let pieces = split_top_level(raw, ',');
        assert_eq!(
            pieces,
            [r#"note: "a, b""#, r#" json: {"k": [1, 2]}"#, " date: today"]
        );
    }

    #[test]
    fn split_pair_uses_first_unquoted_colon() {
        let (k, v) = split_pair(r#"note: "time: 5pm""#).unwrap();
        assert_eq!(k, "note");
        assert_eq!(v.trim(), r#""time: 5pm""#);
        assert!(split_pair("no colon here").is_none());
    }
}
