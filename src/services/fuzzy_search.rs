//! Diacritic-insensitive token search over a small in-memory corpus.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::search::{SearchItem, SearchWeights};

/// Lowercases, strips diacritics, drops every character that is neither
/// alphanumeric nor whitespace and collapses whitespace.
///
/// `"Café-Crème  brûlée"` becomes `"cafecreme brulee"`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unique query tokens in first-seen order.
fn tokenize(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in normalize(query).split_whitespace() {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Scores one item. Each token adds the field's weight once per field it
/// appears in as a substring.
pub fn score_item(tokens: &[String], item: &SearchItem, weights: &SearchWeights) -> u32 {
    let title = normalize(&item.title);
    let content = normalize(&item.content);
    let keywords: Vec<String> = item.keywords.iter().map(|k| normalize(k)).collect();

    tokens.iter().fold(0, |score, token| {
        let mut s = score;
        if title.contains(token.as_str()) {
            s += weights.title;
        }
        if keywords.iter().any(|k| k.contains(token.as_str())) {
            s += weights.keywords;
        }
        if content.contains(token.as_str()) {
            s += weights.content;
        }
        s
    })
}

/// Returns the ids of matching items, best first.
///
/// Items scoring zero are dropped. Ties keep their input order. An empty or
/// whitespace-only query matches nothing.
pub fn simple_fuzzy_search(query: &str, items: &[SearchItem], weights: &SearchWeights) -> Vec<String> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, &SearchItem)> = items
        .iter()
        .map(|item| (score_item(&tokens, item, weights), item))
        .filter(|(score, _)| *score > 0)
        .collect();
    // sort_by is stable, so equal scores stay in corpus order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, item)| item.id.clone()).collect()
}
