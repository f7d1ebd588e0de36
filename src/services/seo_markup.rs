//! Meta tags and schema.org markup for a content document.

use serde_json::json;

use crate::services::content_length::count_words_from_html;
use crate::services::html_sections::escape_html;
use crate::types::content::ContentDocument;

fn meta(name_attr: &str, name: &str, content: &str) -> String {
    format!(
        "<meta {}=\"{}\" content=\"{}\">",
        name_attr,
        escape_html(name),
        escape_html(content)
    )
}

fn timestamp_to_rfc3339(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// Renders the `<head>` tags for `doc`, one per line.
///
/// Empty descriptions and keyword lists are omitted rather than emitted blank.
pub fn render_meta_tags(doc: &ContentDocument) -> String {
    let mut tags = vec![format!("<title>{}</title>", escape_html(&doc.title))];
    if !doc.meta_description.trim().is_empty() {
        tags.push(meta("name", "description", &doc.meta_description));
    }
    let keywords: Vec<&str> = doc
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        tags.push(meta("name", "keywords", &keywords.join(", ")));
    }
    tags.push(meta("property", "og:title", &doc.title));
    if !doc.meta_description.trim().is_empty() {
        tags.push(meta("property", "og:description", &doc.meta_description));
    }
    tags.push(meta("property", "og:type", "article"));
    tags.join("\n")
}

/// The schema.org `Article` object for `doc`.
pub fn article_schema(doc: &ContentDocument) -> serde_json::Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": doc.title,
        "description": doc.meta_description,
        "keywords": doc.keywords.join(", "),
        "inLanguage": doc.language,
        "dateModified": timestamp_to_rfc3339(doc.updated_at),
        "wordCount": count_words_from_html(&doc.html),
    })
}

/// Renders [`article_schema`] inside a `<script type="application/ld+json">` block.
pub fn render_json_ld(doc: &ContentDocument) -> String {
    let body = serde_json::to_string_pretty(&article_schema(doc))
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">\n{}\n</script>", body)
}
