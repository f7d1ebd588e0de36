//! Persistent key-value store for client state.
//!
//! Holds what a browser client keeps in local storage: the recently viewed
//! list, the SerpApi key and the auth bypass flag. Every write bumps a
//! per-key revision so readers can tell when another process changed a key.

use rusqlite::{params, Connection, OptionalExtension};

/// Key of the recently viewed list.
pub const RECENT_CONTENTS_KEY: &str = "recent-contents";

/// Key of the user-supplied SerpApi key.
pub const SERPAPI_API_KEY: &str = "SERPAPI_API_KEY";

/// Key of the auth bypass flag (`"true"` / `"false"`).
pub const BYPASS_AUTH_KEY: &str = "bypassAuth";

/// Key-value store over the `local_store` table.
pub struct LocalStore<'a> {
    conn: &'a Connection,
}

impl<'a> LocalStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT value FROM local_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Stores `value` under `key`, bumping the key's revision.
    pub fn set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO local_store (key, value, revision, updated_at) VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                 revision = local_store.revision + 1, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    /// Deletes `key`. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool, rusqlite::Error> {
        let affected = self
            .conn
            .execute("DELETE FROM local_store WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    /// Revision of `key`; 0 when the key has never been written.
    pub fn revision(&self, key: &str) -> Result<i64, rusqlite::Error> {
        Ok(self
            .conn
            .query_row(
                "SELECT revision FROM local_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0))
    }

    /// Reads a boolean flag; anything but `"true"` / `"1"` is false.
    pub fn get_flag(&self, key: &str) -> Result<bool, rusqlite::Error> {
        Ok(matches!(self.get(key)?.as_deref(), Some("true") | Some("1")))
    }

    pub fn set_flag(&self, key: &str, value: bool) -> Result<(), rusqlite::Error> {
        self.set(key, if value { "true" } else { "false" })
    }
}
