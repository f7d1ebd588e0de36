//! Section-level editing of generated HTML documents.
//!
//! Documents are treated as an intro followed by `<h2>`-headed sections.
//! Nothing here validates markup; inputs that do not match the expected
//! shape fall back to plain concatenation.

use std::sync::LazyLock;

use regex::Regex;

use super::content_length::strip_tags;

static RE_H1: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>.*?</h1>").ok());
static RE_H2: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<h2\b[^>]*>(.*?)</h2>").ok());
static RE_SECTION_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)</?section\b[^>]*>").ok());

/// A `<h2>` section of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// A document split into its intro and sections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitDocument {
    pub intro: String,
    pub sections: Vec<Section>,
}

/// Escapes the characters that would break out of element text or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Removes every `<h1>` element from `fragment`.
pub fn strip_h1(fragment: &str) -> String {
    match RE_H1.as_ref() {
        Some(re) => re.replace_all(fragment, "").into_owned(),
        None => fragment.to_string(),
    }
}

/// Appends `fragment` to `base` as `<section><h2>{heading}</h2>…</section>`.
///
/// Any `<h1>` in the fragment is dropped so the document keeps a single
/// title. With an empty heading the fragment is concatenated as-is.
pub fn merge_html_sections(base: &str, fragment: &str, heading: &str) -> String {
    let heading = heading.trim();
    if heading.is_empty() {
        return format!("{}{}", base, fragment);
    }
    let cleaned = strip_h1(fragment);
    let mut merged = String::with_capacity(base.len() + cleaned.len() + heading.len() + 40);
    merged.push_str(base.trim_end());
    if !merged.is_empty() {
        merged.push('\n');
    }
    merged.push_str("<section>\n<h2>");
    merged.push_str(&escape_html(heading));
    merged.push_str("</h2>\n");
    merged.push_str(cleaned.trim());
    merged.push_str("\n</section>");
    merged
}

/// Text of every `<h2>` in document order, inner tags removed and basic
/// entities decoded.
pub fn extract_h2_headings(html: &str) -> Vec<String> {
    let Some(re) = RE_H2.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape_basic(&strip_tags(m.as_str())))
        .collect()
}

fn unescape_basic(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Compares two headings case-insensitively with whitespace collapsed and
/// the entities produced by [`escape_html`] decoded.
pub fn headings_match(a: &str, b: &str) -> bool {
    let norm = |s: &str| {
        unescape_basic(s)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    };
    norm(a) == norm(b)
}

/// Byte ranges of every `<h2>`: (tag start, tag end, heading text).
fn h2_spans(html: &str) -> Vec<(usize, usize, String)> {
    let Some(re) = RE_H2.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some((whole.start(), whole.end(), strip_tags(inner.as_str())))
        })
        .collect()
}

fn strip_section_tags(html: &str) -> String {
    match RE_SECTION_TAG.as_ref() {
        Some(re) => re.replace_all(html, "").trim().to_string(),
        None => html.trim().to_string(),
    }
}

/// Splits a document into the intro (everything before the first `<h2>`)
/// and one section per `<h2>`. `<section>` wrapper tags are dropped from
/// the returned bodies.
pub fn split_sections(html: &str) -> SplitDocument {
    let spans = h2_spans(html);
    let Some(first) = spans.first() else {
        return SplitDocument {
            intro: strip_section_tags(html),
            sections: Vec::new(),
        };
    };

    let intro = strip_section_tags(&html[..first.0]);
    let sections = spans
        .iter()
        .enumerate()
        .map(|(i, (_, end, heading))| {
            let body_end = spans.get(i + 1).map(|next| next.0).unwrap_or(html.len());
            Section {
                heading: heading.clone(),
                body: strip_section_tags(&html[*end..body_end]),
            }
        })
        .collect();

    SplitDocument { intro, sections }
}

/// Removes the `<h1>` and any `<h2>` naming `heading` from a regenerated
/// fragment, leaving only the section body.
pub fn clean_section_fragment(fragment: &str, heading: &str) -> String {
    let without_h1 = strip_h1(fragment);
    let Some(re) = RE_H2.as_ref() else {
        return without_h1.trim().to_string();
    };
    re.replace_all(&without_h1, |caps: &regex::Captures| {
        let text = caps.get(1).map(|m| strip_tags(m.as_str())).unwrap_or_default();
        if headings_match(&text, heading) {
            String::new()
        } else {
            caps[0].to_string()
        }
    })
    .trim()
    .to_string()
}

/// Replaces the body of the section headed `heading` with `fragment`.
///
/// Headings compare case-insensitively with whitespace collapsed. A closing
/// `</section>` that followed the old body is kept. When no section has the
/// heading the fragment is appended with [`merge_html_sections`].
pub fn replace_section(html: &str, heading: &str, fragment: &str) -> String {
    let spans = h2_spans(html);
    let Some(idx) = spans.iter().position(|(_, _, h)| headings_match(h, heading)) else {
        return merge_html_sections(html, fragment, heading);
    };

    let body_start = spans[idx].1;
    let body_end = spans.get(idx + 1).map(|next| next.0).unwrap_or(html.len());
    let old_body = &html[body_start..body_end];
    let tail = match old_body.rfind("</section>") {
        Some(pos) => &old_body[pos..],
        None => "",
    };

    let cleaned = strip_h1(fragment);
    let mut out = String::with_capacity(html.len() + cleaned.len());
    out.push_str(&html[..body_start]);
    out.push('\n');
    out.push_str(cleaned.trim());
    out.push('\n');
    out.push_str(tail);
    out.push_str(&html[body_end..]);
    out
}
