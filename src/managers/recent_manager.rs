//! Recently viewed content for SEOForge.
//!
//! Implements `RecentManagerTrait`: a bounded, most-recent-first list kept as
//! a JSON array under the `recent-contents` key of the local store.

use chrono::{DateTime, Datelike};
use rusqlite::Connection;

use crate::managers::local_store::{LocalStore, RECENT_CONTENTS_KEY};
use crate::types::errors::RecentError;
use crate::types::recent::RecentItem;

/// Number of entries the widget shows by default.
pub const DEFAULT_DISPLAY_LIMIT: usize = 5;

/// Number of entries kept in storage.
pub const MAX_STORED: usize = 20;

/// Trait defining recently viewed operations.
pub trait RecentManagerTrait {
    fn record(&mut self, item: RecentItem) -> Result<(), RecentError>;
    fn list(&self, limit: usize) -> Result<Vec<RecentItem>, RecentError>;
    fn remove(&mut self, id: &str) -> Result<bool, RecentError>;
    fn clear(&mut self) -> Result<(), RecentError>;
    fn revision(&self) -> Result<i64, RecentError>;
}

/// Recently viewed list backed by the SQLite local store.
pub struct RecentManager<'a> {
    store: LocalStore<'a>,
}

impl<'a> RecentManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            store: LocalStore::new(conn),
        }
    }

    /// Reads the stored array. Missing or unparseable data reads as empty.
    fn read_all(&self) -> Result<Vec<RecentItem>, RecentError> {
        let raw = self
            .store
            .get(RECENT_CONTENTS_KEY)
            .map_err(|e| RecentError::DatabaseError(e.to_string()))?;
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<RecentItem>>(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(error = %e, "recent list is not valid JSON, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&self, items: &[RecentItem]) -> Result<(), RecentError> {
        let json = serde_json::to_string(items)
            .map_err(|e| RecentError::SerializationError(e.to_string()))?;
        self.store
            .set(RECENT_CONTENTS_KEY, &json)
            .map_err(|e| RecentError::DatabaseError(e.to_string()))
    }
}

impl<'a> RecentManagerTrait for RecentManager<'a> {
    /// Puts `item` at the front. An entry with the same id is replaced, and
    /// the list is cut to [`MAX_STORED`] entries.
    fn record(&mut self, item: RecentItem) -> Result<(), RecentError> {
        let mut items = self.read_all()?;
        items.retain(|existing| existing.id != item.id);
        items.insert(0, item);
        items.truncate(MAX_STORED);
        self.write_all(&items)
    }

    /// Returns at most `limit` entries, most recent first.
    fn list(&self, limit: usize) -> Result<Vec<RecentItem>, RecentError> {
        let mut items = self.read_all()?;
        items.truncate(limit);
        Ok(items)
    }

    fn remove(&mut self, id: &str) -> Result<bool, RecentError> {
        let mut items = self.read_all()?;
        let before = items.len();
        items.retain(|existing| existing.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.write_all(&items)?;
        Ok(true)
    }

    fn clear(&mut self) -> Result<(), RecentError> {
        self.store
            .remove(RECENT_CONTENTS_KEY)
            .map_err(|e| RecentError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Change counter of the stored list. Pollers compare it with the value
    /// they saw last to pick up writes from other processes.
    fn revision(&self) -> Result<i64, RecentError> {
        self.store
            .revision(RECENT_CONTENTS_KEY)
            .map_err(|e| RecentError::DatabaseError(e.to_string()))
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Formats an RFC 3339 timestamp for `locale`. Unparseable input is returned as-is.
pub fn format_date(updated_at: &str, locale: &str) -> String {
    let Ok(dt) = DateTime::parse_from_rfc3339(updated_at) else {
        return updated_at.to_string();
    };
    let lang = locale.split(['-', '_']).next().unwrap_or("en").to_lowercase();
    match lang.as_str() {
        "de" | "fr" | "es" | "pt" | "it" | "nl" | "ru" | "pl" => {
            format!("{}.{}.{}", dt.day(), dt.month(), dt.year())
        }
        _ => format!("{} {}, {}", MONTHS[dt.month0() as usize], dt.day(), dt.year()),
    }
}

/// One display line: title, localized date and the optional score badge.
pub fn format_entry(item: &RecentItem, locale: &str) -> String {
    let mut line = format!("{} · {}", item.title, format_date(&item.updated_at, locale));
    if let Some(score) = item.seo_score {
        line.push_str(&format!(" [SEO {}]", score));
    }
    line
}
