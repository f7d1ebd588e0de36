//! Tests for keyword CSV export and standalone HTML export.

use seoforge::services::export::{
    export_filename, keywords_to_csv, render_html_document, write_html_document, write_keywords_csv, CSV_HEADER,
};
use seoforge::services::keyword_client::MockKeywordProvider;
use seoforge::types::content::{ContentDocument, Tone};
use seoforge::types::keyword::KeywordMetrics;

fn doc() -> ContentDocument {
    ContentDocument {
        id: "c-42".to_string(),
        title: "Home Espresso 101".to_string(),
        keywords: vec!["espresso".to_string()],
        language: "en".to_string(),
        tone: Tone::Professional,
        word_count_target: 500,
        outline: vec![],
        html: "<h1>Home Espresso 101</h1><p>Pull better shots.</p>".to_string(),
        meta_description: "Learn espresso".to_string(),
        seo_score: Some(77),
        provider_used: Some("mock".to_string()),
        request_id: None,
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

#[test]
fn test_csv_header_and_rows_from_mock_research() {
    let research = MockKeywordProvider::new().build("espresso beans").unwrap();
    let csv = keywords_to_csv(&research.keywords).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "keyword,searchVolume,competition,competitionIndex,cpc,difficulty");
    assert_eq!(lines[0], CSV_HEADER.join(","));
    assert!(lines.len() > 1);
    assert_eq!(lines.len(), research.keywords.len() + 1);
}

#[test]
fn test_csv_for_empty_list_is_header_only() {
    let csv = keywords_to_csv(&[]).unwrap();
    assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
}

#[test]
fn test_csv_parses_back_with_csv_reader() {
    let keywords = vec![KeywordMetrics {
        keyword: "say \"hello\"".to_string(),
        search_volume: 1200,
        difficulty: 40,
        competition: "MEDIUM".to_string(),
        competition_index: 51,
        cpc: 0.987,
    }];
    let csv = keywords_to_csv(&keywords).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[0], "say \"hello\"");
    assert_eq!(&record[4], "0.99");
}

#[test]
fn test_export_filename_ends_with_keywords_csv() {
    assert_eq!(export_filename("Espresso Beans"), "espresso-beans-keywords.csv");
    assert!(export_filename("anything at all").ends_with("keywords.csv"));
    assert_eq!(export_filename("Crème Brûlée Café"), "creme-brulee-cafe-keywords.csv");
}

#[test]
fn test_write_keywords_csv_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let research = MockKeywordProvider::new().build("green tea").unwrap();
    let path = write_keywords_csv(&dir.path().join("out"), "Green Tea", &research.keywords).unwrap();

    assert!(path.ends_with("green-tea-keywords.csv"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("keyword,searchVolume"));
}

#[test]
fn test_html_document_contains_meta_and_schema() {
    let html = render_html_document(&doc());
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<html lang=\"en\">"));
    assert!(html.contains("<title>Home Espresso 101</title>"));
    assert!(html.contains("application/ld+json"));
    assert!(html.contains("\"headline\": \"Home Espresso 101\""));
    assert!(html.contains("<p>Pull better shots.</p>"));
}

#[test]
fn test_write_html_document_uses_title_slug() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_html_document(dir.path(), &doc()).unwrap();
    assert_eq!(path.file_name().unwrap(), "home-espresso-101.html");
}
