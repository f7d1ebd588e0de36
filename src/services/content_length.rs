//! Word counting over generated HTML.
//!
//! Counts are approximate: tags are removed with a pattern, not a parser,
//! and entities are left as-is.

use std::sync::LazyLock;

use regex::Regex;

static RE_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Removes every `<...>` tag, replacing it with a space so adjacent blocks
/// do not glue words together, and collapses runs of whitespace.
pub fn strip_tags(html: &str) -> String {
    let text = match RE_TAG.as_ref() {
        Some(re) => re.replace_all(html, " ").into_owned(),
        None => html.to_string(),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the number of whitespace-separated words in the visible text of `html`.
///
/// Never fails: anything that cannot be processed counts as zero words.
pub fn count_words_from_html(html: &str) -> usize {
    if html.trim().is_empty() {
        return 0;
    }
    match RE_TAG.as_ref() {
        Some(re) => re
            .replace_all(html, " ")
            .split_whitespace()
            .filter(|token| !token.is_empty())
            .count(),
        None => 0,
    }
}

/// Estimates reading time at ~200 words per minute, at least one minute for
/// non-empty content.
pub fn estimate_read_minutes(html: &str) -> u32 {
    let words = count_words_from_html(html);
    if words == 0 {
        return 0;
    }
    ((words as f64) / 200.0).ceil().max(1.0) as u32
}

/// First `max_chars` characters of the visible text, cut on a word boundary
/// and suffixed with an ellipsis when truncated.
pub fn snippet(html: &str, max_chars: usize) -> String {
    let text = strip_tags(html);
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end())
}
