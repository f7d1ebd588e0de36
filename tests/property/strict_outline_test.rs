//! Property-based tests for outline-constrained generation in mock mode.
//!
//! For any outline the generated document has exactly one `<h2>` per
//! outline item, in order, a single `<h1>`, and reaches the requested
//! word count.

use proptest::prelude::*;
use seoforge::services::content_length::count_words_from_html;
use seoforge::services::generation_client::{ContentProvider, MockContentProvider};
use seoforge::services::html_sections::extract_h2_headings;
use seoforge::types::content::{GenerateRequest, Tone};

fn request(outline: Vec<String>, word_count: u32) -> GenerateRequest {
    GenerateRequest {
        title: "Strict Outline Test".to_string(),
        keywords: vec!["outline".to_string()],
        language: "en".to_string(),
        tone: Tone::Professional,
        word_count,
        outline: Some(outline),
    }
}

#[tokio::test]
async fn two_item_outline_yields_two_headings_in_order() {
    let req = request(vec!["First Section".to_string(), "Second Section".to_string()], 500);
    let result = MockContentProvider::new().generate(&req).await.unwrap();

    let headings = extract_h2_headings(&result.content.content);
    assert_eq!(headings, vec!["First Section", "Second Section"]);
    assert_eq!(result.provider_used, "mock");
}

#[tokio::test]
async fn headings_with_markup_characters_come_back_verbatim() {
    let outline = vec!["Tips & Tricks".to_string(), "Q<A> \"Basics\"".to_string()];
    let result = MockContentProvider::new().generate(&request(outline.clone(), 300)).await.unwrap();

    assert!(result.content.content.contains("<h2>Tips &amp; Tricks</h2>"));
    assert_eq!(extract_h2_headings(&result.content.content), outline);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn headings_match_outline_exactly(
        outline in proptest::collection::vec("[A-Z][a-z]{2,10}( (&|[a-z]{2,8})){0,3}", 1..8),
        word_count in 50u32..3000,
    ) {
        let content = MockContentProvider::new().build(&request(outline.clone(), word_count));

        prop_assert_eq!(extract_h2_headings(&content.content), outline);
        prop_assert_eq!(content.content.matches("<h1>").count(), 1);
        prop_assert!(count_words_from_html(&content.content) >= word_count as usize);
        prop_assert!(content.seo_score.map(|s| s <= 100).unwrap_or(false));
    }
}
