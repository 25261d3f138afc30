//! Response cleanup — a fixed, ordered list of text transformations.
//!
//! Chat models dress up their answers even when told not to: `<think>`
//! blocks, "here's the cleaned text:", echoed `[TEXT]` tags, quoting the
//! whole reply.  [`clean_response`] peels those off in a fixed order.  Pure
//! string-to-string, no network, fully unit-testable.

use std::sync::LazyLock;

use regex::Regex;

use super::prompt::{TEXT_CLOSE, TEXT_OPEN};

/// Preamble/decoration patterns, applied in order.  Each match is deleted.
static STRIP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Reasoning-model think blocks, anywhere in the reply.
        r"(?s)<think>.*?</think>\s*",
        // "here's the cleaned text:" and friends.
        r"(?i)^here['’]?s?\s+(the\s+)?(cleaned|corrected|proofread|polished|revised|updated|draft|a\s+draft)\b[^:\n]*:\s*",
        // Conversational openers, optionally followed by a "here's …:" tail.
        r"(?i)^(sure|okay|of course)[!,.]?\s*(here['’]?s?\b[^:\n]*:\s*)?",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("bad cleanup pattern {p:?}: {e}")))
    .collect()
});

/// Quote pairs eligible for the one-layer surrounding strip.
const QUOTE_PAIRS: [(char, char); 3] = [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')];

/// Clean a raw model reply down to the proofread text.
///
/// Order matters: think block, preambles, echoed `[TEXT]` wrapper, then one
/// layer of surrounding quotes if both ends match.
pub fn clean_response(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    for pattern in STRIP_PATTERNS.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }

    text = strip_echoed_tags(text.trim());
    text = strip_matched_quotes(&text);
    text.trim().to_string()
}

/// Remove `[TEXT]` / `[/TEXT]` if the model echoed the wrapping back.
fn strip_echoed_tags(text: &str) -> String {
    let mut t = text;
    if let Some(rest) = strip_prefix_ignore_case(t, TEXT_OPEN) {
        t = rest.trim_start();
    }
    if let Some(rest) = strip_suffix_ignore_case(t, TEXT_CLOSE) {
        t = rest.trim_end();
    }
    t.to_string()
}

/// ASCII-case-insensitive `strip_prefix`.  `get` keeps the probe slice on
/// char boundaries, so a reply starting with a multi-byte character is
/// simply not a tag match rather than a panic.
fn strip_prefix_ignore_case<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let head = text.get(..tag.len())?;
    head.eq_ignore_ascii_case(tag).then(|| &text[tag.len()..])
}

/// ASCII-case-insensitive `strip_suffix`, boundary-safe like the prefix
/// variant.
fn strip_suffix_ignore_case<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let start = text.len().checked_sub(tag.len())?;
    let tail = text.get(start..)?;
    tail.eq_ignore_ascii_case(tag).then(|| &text[..start])
}

/// Strip exactly one layer of surrounding quotes when first and last chars
/// form a matching pair.
fn strip_matched_quotes(text: &str) -> String {
    let mut chars = text.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return text.to_string();
    };
    if QUOTE_PAIRS.contains(&(first, last)) {
        chars.as_str().to_string()
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
