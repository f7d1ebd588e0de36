//! Schema migrations for the SEOForge SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: local store, contents, revisions")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Add request_id to contents")?;
    }

    if current < CURRENT_SCHEMA_VERSION {
        tracing::info!(from = current, to = CURRENT_SCHEMA_VERSION, "database migrated");
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: key-value store, content documents and their revisions.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS local_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS contents (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            keywords TEXT NOT NULL DEFAULT '[]',
            language TEXT NOT NULL,
            tone TEXT NOT NULL,
            word_count_target INTEGER NOT NULL,
            outline TEXT NOT NULL DEFAULT '[]',
            html TEXT NOT NULL,
            meta_description TEXT NOT NULL DEFAULT '',
            seo_score INTEGER,
            provider_used TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_contents_updated_at ON contents(updated_at);

        CREATE TABLE IF NOT EXISTS content_revisions (
            id TEXT PRIMARY KEY,
            content_id TEXT NOT NULL,
            seq INTEGER NOT NULL,
            html TEXT NOT NULL,
            reason TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (content_id) REFERENCES contents(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_revisions_content ON content_revisions(content_id, seq);
        ",
    )
}

/// V2: request ids echoed by the generation backend.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    if conn.prepare("SELECT request_id FROM contents LIMIT 0").is_err() {
        conn.execute_batch("ALTER TABLE contents ADD COLUMN request_id TEXT;")?;
    }
    Ok(())
}
