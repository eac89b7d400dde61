//! String helpers shared by the extractors, the summarizer, and logging.
//!
//! - Character-safe truncation (article bodies are frequently non-ASCII)
//! - Whitespace normalization for scraped text
//! - Sentence-terminal counting for the summarization threshold

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// A run of sentence-ending punctuation. ASCII marks count only when a
/// space or the end of the text follows (after any closing quotes or
/// brackets), so decimals and domain names are not sentence ends.
static SENTENCE_TERMINAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[。！？]+|[.!?]+["'”’」』)\]]*(?:\s|$)"#).expect("static sentence regex")
});

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the bytes dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Prefix of `s` holding at most `max_chars` Unicode scalar values.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Trim each fragment, drop empty ones, and join with single spaces.
pub fn join_fragments<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    fragments
        .into_iter()
        .flat_map(str::split_whitespace)
        .join(" ")
}

/// Number of sentence-terminal punctuation runs in `text`.
///
/// `"Wait... what?!"` counts as two; `"rose 2.5% to 1,350.2"` counts as none.
///
/// # Arguments
///
/// * `text` - Extracted article text, whitespace already normalized
///
/// # Returns
///
/// How many sentence endings `text` contains, as used by the summarization
/// threshold.
pub fn count_sentence_marks(text: &str) -> usize {
    SENTENCE_TERMINAL.find_iter(text).count()
}
