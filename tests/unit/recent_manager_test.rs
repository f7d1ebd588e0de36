//! Unit tests for the RecentManager public API.
//!
//! These tests exercise recording, listing, removal and the change counter
//! through the `RecentManagerTrait` interface, using an in-memory SQLite database.

use rstest::rstest;
use seoforge::database::Database;
use seoforge::managers::local_store::{LocalStore, RECENT_CONTENTS_KEY};
use seoforge::managers::recent_manager::{
    format_date, format_entry, RecentManager, RecentManagerTrait, DEFAULT_DISPLAY_LIMIT, MAX_STORED,
};
use seoforge::types::recent::RecentItem;

fn item(id: &str, title: &str) -> RecentItem {
    RecentItem {
        id: id.to_string(),
        title: title.to_string(),
        updated_at: "2025-01-05T10:00:00Z".to_string(),
        seo_score: None,
        snippet: None,
    }
}

#[test]
fn test_list_on_empty_store_is_empty() {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let mgr = RecentManager::new(db.connection());
    assert!(mgr.list(DEFAULT_DISPLAY_LIMIT).unwrap().is_empty());
}

#[test]
fn test_list_respects_limit_and_order() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = RecentManager::new(db.connection());

    for i in 0..8 {
        mgr.record(item(&format!("c{}", i), &format!("Doc {}", i))).unwrap();
    }

    let listed = mgr.list(DEFAULT_DISPLAY_LIMIT).unwrap();
    assert_eq!(listed.len(), 5);
    let ids: Vec<&str> = listed.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["c7", "c6", "c5", "c4", "c3"]);
}

#[test]
fn test_record_moves_existing_entry_to_front() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = RecentManager::new(db.connection());

    mgr.record(item("a", "A")).unwrap();
    mgr.record(item("b", "B")).unwrap();
    mgr.record(item("a", "A renamed")).unwrap();

    let listed = mgr.list(10).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "a");
    assert_eq!(listed[0].title, "A renamed");
}

#[test]
fn test_stored_list_is_capped() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = RecentManager::new(db.connection());
    for i in 0..(MAX_STORED + 7) {
        mgr.record(item(&i.to_string(), "x")).unwrap();
    }
    assert_eq!(mgr.list(usize::MAX).unwrap().len(), MAX_STORED);
}

#[test]
fn test_malformed_json_reads_as_empty() {
    let db = Database::open_in_memory().unwrap();
    LocalStore::new(db.connection())
        .set(RECENT_CONTENTS_KEY, "{not json")
        .unwrap();

    let mut mgr = RecentManager::new(db.connection());
    assert!(mgr.list(5).unwrap().is_empty());

    mgr.record(item("a", "A")).unwrap();
    assert_eq!(mgr.list(5).unwrap().len(), 1);
}

#[test]
fn test_remove_and_clear() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = RecentManager::new(db.connection());
    mgr.record(item("a", "A")).unwrap();
    mgr.record(item("b", "B")).unwrap();

    assert!(mgr.remove("a").unwrap());
    assert!(!mgr.remove("missing").unwrap());
    assert_eq!(mgr.list(5).unwrap().len(), 1);

    mgr.clear().unwrap();
    assert!(mgr.list(5).unwrap().is_empty());
}

#[test]
fn test_revision_changes_on_every_write() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = RecentManager::new(db.connection());

    let r0 = mgr.revision().unwrap();
    mgr.record(item("a", "A")).unwrap();
    let r1 = mgr.revision().unwrap();
    mgr.record(item("b", "B")).unwrap();
    let r2 = mgr.revision().unwrap();

    assert!(r1 > r0);
    assert!(r2 > r1);
}

#[rstest]
#[case("en", "Jan 5, 2025")]
#[case("en-US", "Jan 5, 2025")]
#[case("de", "5.1.2025")]
#[case("fr_FR", "5.1.2025")]
fn test_format_date_by_locale(#[case] locale: &str, #[case] expected: &str) {
    assert_eq!(format_date("2025-01-05T10:00:00Z", locale), expected);
}

#[test]
fn test_format_date_passes_through_unparseable() {
    assert_eq!(format_date("yesterday", "en"), "yesterday");
}

#[test]
fn test_format_entry_with_score_badge() {
    let mut entry = item("a", "Rust Guide");
    entry.seo_score = Some(87);
    let line = format_entry(&entry, "en");
    assert!(line.starts_with("Rust Guide"));
    assert!(line.contains("Jan 5, 2025"));
    assert!(line.ends_with("[SEO 87]"));

    entry.seo_score = None;
    assert!(!format_entry(&entry, "en").contains("[SEO"));
}
