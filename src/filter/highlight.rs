//! Search-match highlighting
//!
//! Splits a text into an ordered run of match / non-match tokens by
//! repeated case-insensitive literal scanning. Scanning resumes
//! immediately after the end of each match, so overlapping occurrences
//! are never double-counted.

use serde::Serialize;

/// One token of highlighted output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub text: String,
    pub is_match: bool,
}

impl HighlightSpan {
    fn matched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: true,
        }
    }

    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: false,
        }
    }
}

/// Split `text` into match/non-match tokens for `query`.
///
/// An empty query (or empty text) produces a single non-match token
/// covering the whole text, or nothing for empty text.
pub fn highlight(text: &str, query: &str) -> Vec<HighlightSpan> {
    if text.is_empty() {
        return Vec::new();
    }
    if query.is_empty() {
        return vec![HighlightSpan::plain(text)];
    }

    let mut spans = Vec::new();
    let mut position = 0;

    while let Some((start, end)) = find_ci(text, query, position) {
        if start > position {
            spans.push(HighlightSpan::plain(&text[position..start]));
        }
        spans.push(HighlightSpan::matched(&text[start..end]));
        position = end;
    }

    if position < text.len() {
        spans.push(HighlightSpan::plain(&text[position..]));
    }

    spans
}

/// Locate the next case-insensitive literal occurrence of `needle` in
/// `haystack` at or after byte offset `from`. Returns the byte range of
/// the match in the original string.
///
/// Comparison is per-character via `char::to_lowercase`, so byte
/// offsets always refer to the original (un-lowercased) text even when
/// case folding changes character lengths.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    let needle_chars: Vec<char> = needle.chars().collect();
    if needle_chars.is_empty() {
        return None;
    }

    for (start, _) in haystack[from..].char_indices() {
        let absolute_start = from + start;
        let mut candidate = haystack[absolute_start..].chars();
        let mut matched_bytes = 0;
        let mut matched_all = true;

        for expected in &needle_chars {
            match candidate.next() {
                Some(actual) if chars_eq_ci(actual, *expected) => {
                    matched_bytes += actual.len_utf8();
                }
                _ => {
                    matched_all = false;
                    break;
                }
            }
        }

        if matched_all {
            return Some((absolute_start, absolute_start + matched_bytes));
        }
    }

    None
}

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
