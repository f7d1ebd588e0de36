//! Keyword CSV and standalone HTML export.

use std::fs;
use std::path::{Path, PathBuf};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::services::html_sections::escape_html;
use crate::services::seo_markup::{render_json_ld, render_meta_tags};
use crate::types::content::ContentDocument;
use crate::types::errors::ExportError;
use crate::types::keyword::KeywordMetrics;

/// Column order of the keyword export.
pub const CSV_HEADER: [&str; 6] = [
    "keyword",
    "searchVolume",
    "competition",
    "competitionIndex",
    "cpc",
    "difficulty",
];

/// Lowercase ASCII slug: diacritics folded, alphanumerics kept, everything
/// else folded into single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// `{slug(seed)}-keywords.csv`, or `keywords.csv` when the seed has no usable characters.
pub fn export_filename(seed: &str) -> String {
    let slug = slugify(seed);
    if slug.is_empty() {
        "keywords.csv".to_string()
    } else {
        format!("{}-keywords.csv", slug)
    }
}

/// Encodes `keywords` as CSV with [`CSV_HEADER`] as the first line.
pub fn keywords_to_csv(keywords: &[KeywordMetrics]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for k in keywords {
        writer.write_record([
            k.keyword.clone(),
            k.search_volume.to_string(),
            k.competition.clone(),
            k.competition_index.to_string(),
            format!("{:.2}", k.cpc),
            k.difficulty.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

/// Writes the CSV for `seed` into `dir` and returns the file path.
pub fn write_keywords_csv(dir: &Path, seed: &str, keywords: &[KeywordMetrics]) -> Result<PathBuf, ExportError> {
    let csv = keywords_to_csv(keywords)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(seed));
    fs::write(&path, csv)?;
    tracing::info!(path = %path.display(), rows = keywords.len(), "keywords exported");
    Ok(path)
}

/// A complete HTML page for `doc`: meta tags and JSON-LD in the head, the
/// generated HTML as the body.
pub fn render_html_document(doc: &ContentDocument) -> String {
    let lang = if doc.language.trim().is_empty() {
        "en".to_string()
    } else {
        escape_html(doc.language.trim())
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n{}\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        lang,
        render_meta_tags(doc),
        render_json_ld(doc),
        doc.html
    )
}

/// Writes [`render_html_document`] to `{dir}/{slug(title)}.html`.
pub fn write_html_document(dir: &Path, doc: &ContentDocument) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let stem = match slugify(&doc.title) {
        s if s.is_empty() => doc.id.clone(),
        s => s,
    };
    let path = dir.join(format!("{}.html", stem));
    fs::write(&path, render_html_document(doc))?;
    tracing::info!(path = %path.display(), content_id = %doc.id, "document exported");
    Ok(path)
}
