//! Unit tests for the HTML text utilities: word counting, section merging,
//! section replacement, and SEO markup rendering.

use rstest::rstest;
use seoforge::services::content_length::{count_words_from_html, estimate_read_minutes, snippet, strip_tags};
use seoforge::services::html_sections::{
    clean_section_fragment, extract_h2_headings, headings_match, merge_html_sections, replace_section,
    split_sections, strip_h1,
};

#[rstest]
#[case("<p>a b</p>", 2)]
#[case("", 0)]
#[case("   ", 0)]
#[case("<h1>Title</h1><p>one two</p><ul><li>three</li></ul>", 4)]
#[case("plain text without tags", 4)]
#[case("<p>a&nbsp;b</p>", 1)]
fn test_count_words(#[case] html: &str, #[case] expected: usize) {
    assert_eq!(count_words_from_html(html), expected);
}

#[test]
fn test_count_words_never_panics_on_garbage() {
    for input in ["<", ">", "<<<>>>", "<p", "</", "<a href='x>y</a>", "\u{0}\u{1}<b>"] {
        let _ = count_words_from_html(input);
    }
}

#[test]
fn test_strip_tags_collapses_whitespace() {
    assert_eq!(strip_tags("<h2>A</h2>\n\n<p>b   c</p>"), "A b c");
}

#[test]
fn test_read_minutes_and_snippet() {
    let long = format!("<p>{}</p>", "word ".repeat(450));
    assert_eq!(estimate_read_minutes(&long), 3);
    assert_eq!(estimate_read_minutes(""), 0);
    let s = snippet(&long, 20);
    assert!(s.chars().count() <= 21);
    assert!(s.ends_with('…'));
}

#[test]
fn test_merge_strips_h1_and_wraps_section() {
    let merged = merge_html_sections("<h1>Doc</h1><p>intro</p>", "<h1>Dup</h1><p>body</p>", "S");
    assert!(merged.contains("<h2>S</h2>"));
    assert!(!merged.contains("<h1>Dup</h1>"));
    assert!(merged.contains("<section>"));
    assert!(merged.starts_with("<h1>Doc</h1>"));
}

#[test]
fn test_merge_with_empty_heading_concatenates() {
    assert_eq!(merge_html_sections("<p>a</p>", "<p>b</p>", "  "), "<p>a</p><p>b</p>");
}

#[test]
fn test_strip_h1_handles_attributes_and_case() {
    assert_eq!(strip_h1("<H1 class=\"t\">X</H1><p>y</p>"), "<p>y</p>");
}

#[test]
fn test_extract_and_split_sections() {
    let html = "<h1>T</h1><p>intro</p><h2>One</h2><p>1</p><h2 id=\"two\">Two <em>!</em></h2><p>2</p>";
    assert_eq!(extract_h2_headings(html), vec!["One", "Two !"]);

    let doc = split_sections(html);
    assert_eq!(doc.intro, "<h1>T</h1><p>intro</p>");
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.sections[0].heading, "One");
    assert_eq!(doc.sections[0].body, "<p>1</p>");
}

#[test]
fn test_replace_section_keeps_other_sections() {
    let html = "<h1>T</h1>\n<h2>One</h2>\n<p>old</p>\n<h2>Two</h2>\n<p>keep</p>";
    let out = replace_section(html, "  one ", "<p>new</p>");
    assert!(out.contains("<p>new</p>"));
    assert!(!out.contains("<p>old</p>"));
    assert!(out.contains("<h2>Two</h2>\n<p>keep</p>"));
    assert_eq!(extract_h2_headings(&out), vec!["One", "Two"]);
}

#[test]
fn test_replace_section_keeps_section_wrapper() {
    let base = merge_html_sections("<h1>T</h1>", "<p>old</p>", "S");
    let out = replace_section(&base, "S", "<p>new</p>");
    assert!(out.ends_with("</section>"));
    assert!(out.contains("<p>new</p>"));
}

#[test]
fn test_replace_missing_section_appends() {
    let out = replace_section("<h1>T</h1>", "New", "<p>x</p>");
    assert_eq!(extract_h2_headings(&out), vec!["New"]);
}

#[test]
fn test_clean_section_fragment() {
    let fragment = "<h1>Title</h1>\n<p>intro</p>\n<h2>Pricing</h2>\n<p>body</p>";
    assert_eq!(clean_section_fragment(fragment, "pricing"), "<p>intro</p>\n\n<p>body</p>");
}

#[test]
fn test_headings_match_decodes_entities() {
    assert!(headings_match("Tips &amp; Tricks", "tips & tricks"));
    assert!(!headings_match("Tips", "Tricks"));
}
