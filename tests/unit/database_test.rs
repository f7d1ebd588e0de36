//! Unit tests for the SEOForge database layer (connection + migrations).

use seoforge::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use seoforge::database::Database;

fn table_exists(db: &Database, name: &str) -> bool {
    db.connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |row| row.get(0),
        )
        .unwrap_or(false)
}

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    for table in ["schema_version", "local_store", "contents", "content_revisions"] {
        assert!(table_exists(&db, table), "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = seoforge::database::migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.db");

    let db = Database::open(&db_path);
    assert!(db.is_ok(), "open with file path should succeed");
    assert!(db_path.exists(), "Database file should exist on disk");
}

#[test]
fn test_contents_table_has_request_id() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute(
        "INSERT INTO contents (id, title, language, tone, word_count_target, html, request_id, created_at, updated_at)
         VALUES ('c-1', 'Title', 'en', 'professional', 800, '<p>x</p>', 'req-1', 1700000000, 1700000000)",
        [],
    )
    .expect("Should be able to insert into contents table");

    let request_id: String = conn
        .query_row("SELECT request_id FROM contents WHERE id = 'c-1'", [], |row| row.get(0))
        .expect("Should be able to query contents");
    assert_eq!(request_id, "req-1");
}

#[test]
fn test_revisions_cascade_on_content_delete() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute_batch(
        "INSERT INTO contents (id, title, language, tone, word_count_target, html, created_at, updated_at)
         VALUES ('c-1', 'Title', 'en', 'casual', 500, '<p>new</p>', 1, 1);
         INSERT INTO content_revisions (id, content_id, seq, html, reason, created_at)
         VALUES ('r-1', 'c-1', 1, '<p>old</p>', 'edit', 1);
         DELETE FROM contents WHERE id = 'c-1';",
    )
    .expect("batch should succeed");

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM content_revisions", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}
