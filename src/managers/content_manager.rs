//! Content documents for SEOForge.
//!
//! Stores generated documents, snapshots the previous HTML before every
//! change so edits can be undone, and diffs versions section by section.
//! Every write also refreshes the document's entry in the recently viewed list.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::managers::recent_manager::{RecentManager, RecentManagerTrait};
use crate::services::content_length::snippet;
use crate::services::html_sections::split_sections;
use crate::types::content::{
    ContentDocument, ContentRevision, DiffKind, GenerateRequest, GeneratedContent, SectionDiff,
    Tone,
};
use crate::types::errors::ContentError;
use crate::types::recent::RecentItem;

const SNIPPET_CHARS: usize = 140;

const DOCUMENT_COLUMNS: &str = "id, title, keywords, language, tone, word_count_target, outline, \
     html, meta_description, seo_score, provider_used, request_id, created_at, updated_at";

/// Trait defining content document operations.
pub trait ContentManagerTrait {
    fn create(
        &mut self,
        request: &GenerateRequest,
        generated: &GeneratedContent,
        provider_used: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<ContentDocument, ContentError>;
    fn get(&self, id: &str) -> Result<ContentDocument, ContentError>;
    fn list(&self) -> Result<Vec<ContentDocument>, ContentError>;
    fn update_html(&mut self, id: &str, html: &str, reason: &str) -> Result<ContentDocument, ContentError>;
    fn undo(&mut self, id: &str) -> Result<ContentDocument, ContentError>;
    fn revisions(&self, id: &str) -> Result<Vec<ContentRevision>, ContentError>;
    fn diff(&self, id: &str, revision_id: Option<&str>) -> Result<Vec<SectionDiff>, ContentError>;
    fn delete(&mut self, id: &str) -> Result<(), ContentError>;
}

/// Content manager backed by a SQLite connection.
pub struct ContentManager<'a> {
    conn: &'a Connection,
}

impl<'a> ContentManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn db_err(e: rusqlite::Error) -> ContentError {
        ContentError::DatabaseError(e.to_string())
    }

    fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<ContentDocument> {
        let keywords: String = row.get(2)?;
        let tone: String = row.get(4)?;
        let outline: String = row.get(6)?;
        let seo_score: Option<i64> = row.get(9)?;
        Ok(ContentDocument {
            id: row.get(0)?,
            title: row.get(1)?,
            keywords: serde_json::from_str(&keywords).unwrap_or_default(),
            language: row.get(3)?,
            tone: Tone::parse(&tone),
            word_count_target: row.get(5)?,
            outline: serde_json::from_str(&outline).unwrap_or_default(),
            html: row.get(7)?,
            meta_description: row.get(8)?,
            seo_score: seo_score.map(|s| s.clamp(0, 100) as u8),
            provider_used: row.get(10)?,
            request_id: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    fn row_to_revision(row: &rusqlite::Row) -> rusqlite::Result<ContentRevision> {
        Ok(ContentRevision {
            id: row.get(0)?,
            content_id: row.get(1)?,
            html: row.get(2)?,
            reason: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn latest_revision(&self, id: &str) -> Result<Option<ContentRevision>, ContentError> {
        self.conn
            .query_row(
                "SELECT id, content_id, html, reason, created_at FROM content_revisions \
                 WHERE content_id = ?1 ORDER BY seq DESC LIMIT 1",
                params![id],
                Self::row_to_revision,
            )
            .optional()
            .map_err(Self::db_err)
    }

    fn snapshot(&self, doc: &ContentDocument, reason: &str) -> Result<(), ContentError> {
        let next_seq: i64 = self
            .conn
            .query_row(
                "SELECT COALESCE(MAX(seq), 0) + 1 FROM content_revisions WHERE content_id = ?1",
                params![doc.id],
                |row| row.get(0),
            )
            .map_err(Self::db_err)?;
        self.conn
            .execute(
                "INSERT INTO content_revisions (id, content_id, seq, html, reason, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![Uuid::new_v4().to_string(), doc.id, next_seq, doc.html, reason, Self::now()],
            )
            .map_err(Self::db_err)?;
        Ok(())
    }

    fn write_html(&self, id: &str, html: &str) -> Result<(), ContentError> {
        self.conn
            .execute(
                "UPDATE contents SET html = ?1, updated_at = ?2 WHERE id = ?3",
                params![html, Self::now(), id],
            )
            .map_err(Self::db_err)?;
        Ok(())
    }

    /// Refreshes the recently viewed entry. Failures are logged, not returned:
    /// the document write already succeeded.
    fn touch_recent(&self, doc: &ContentDocument) {
        let updated_at = chrono::DateTime::from_timestamp(doc.updated_at, 0)
            .unwrap_or_default()
            .to_rfc3339();
        let item = RecentItem {
            id: doc.id.clone(),
            title: doc.title.clone(),
            updated_at,
            seo_score: doc.seo_score,
            snippet: Some(snippet(&doc.html, SNIPPET_CHARS)).filter(|s| !s.is_empty()),
        };
        if let Err(e) = RecentManager::new(self.conn).record(item) {
            tracing::warn!(content_id = %doc.id, error = %e, "failed to update recent list");
        }
    }
}

impl<'a> ContentManagerTrait for ContentManager<'a> {
    fn create(
        &mut self,
        request: &GenerateRequest,
        generated: &GeneratedContent,
        provider_used: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<ContentDocument, ContentError> {
        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        let keywords = serde_json::to_string(&request.keywords)
            .map_err(|e| ContentError::SerializationError(e.to_string()))?;
        let outline = serde_json::to_string(&request.outline.clone().unwrap_or_default())
            .map_err(|e| ContentError::SerializationError(e.to_string()))?;
        let title = if generated.title.trim().is_empty() {
            request.title.clone()
        } else {
            generated.title.clone()
        };

        self.conn
            .execute(
                "INSERT INTO contents (id, title, keywords, language, tone, word_count_target, outline, \
                 html, meta_description, seo_score, provider_used, request_id, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
                params![
                    id,
                    title,
                    keywords,
                    request.language,
                    request.tone.as_str(),
                    request.word_count,
                    outline,
                    generated.content,
                    generated.meta_description,
                    generated.seo_score.map(i64::from),
                    provider_used,
                    request_id,
                    now,
                ],
            )
            .map_err(Self::db_err)?;

        let doc = self.get(&id)?;
        tracing::info!(content_id = %doc.id, provider = ?provider_used, "content stored");
        self.touch_recent(&doc);
        Ok(doc)
    }

    fn get(&self, id: &str) -> Result<ContentDocument, ContentError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM contents WHERE id = ?1", DOCUMENT_COLUMNS),
                params![id],
                Self::row_to_document,
            )
            .optional()
            .map_err(Self::db_err)?
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    /// Lists documents, most recently updated first.
    fn list(&self) -> Result<Vec<ContentDocument>, ContentError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM contents ORDER BY updated_at DESC, created_at DESC",
                DOCUMENT_COLUMNS
            ))
            .map_err(Self::db_err)?;
        let rows = stmt.query_map([], Self::row_to_document).map_err(Self::db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(Self::db_err)?);
        }
        Ok(results)
    }

    /// Replaces the document HTML after snapshotting the current HTML.
    fn update_html(&mut self, id: &str, html: &str, reason: &str) -> Result<ContentDocument, ContentError> {
        let current = self.get(id)?;
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;
        self.snapshot(&current, reason)?;
        self.write_html(id, html)?;
        tx.commit().map_err(Self::db_err)?;
        let doc = self.get(id)?;
        self.touch_recent(&doc);
        Ok(doc)
    }

    /// Restores the newest revision and drops it from the stack.
    fn undo(&mut self, id: &str) -> Result<ContentDocument, ContentError> {
        self.get(id)?;
        let revision = self
            .latest_revision(id)?
            .ok_or_else(|| ContentError::NothingToUndo(id.to_string()))?;
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;
        self.write_html(id, &revision.html)?;
        self.conn
            .execute("DELETE FROM content_revisions WHERE id = ?1", params![revision.id])
            .map_err(Self::db_err)?;
        tx.commit().map_err(Self::db_err)?;
        tracing::info!(content_id = %id, reason = %revision.reason, "undid content change");
        let doc = self.get(id)?;
        self.touch_recent(&doc);
        Ok(doc)
    }

    /// Revisions of a document, newest first.
    fn revisions(&self, id: &str) -> Result<Vec<ContentRevision>, ContentError> {
        self.get(id)?;
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, content_id, html, reason, created_at FROM content_revisions \
                 WHERE content_id = ?1 ORDER BY seq DESC",
            )
            .map_err(Self::db_err)?;
        let rows = stmt.query_map(params![id], Self::row_to_revision).map_err(Self::db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(Self::db_err)?);
        }
        Ok(results)
    }

    /// Diffs a revision (the newest when `revision_id` is `None`) against the
    /// current HTML. Without any revision every section is unchanged.
    fn diff(&self, id: &str, revision_id: Option<&str>) -> Result<Vec<SectionDiff>, ContentError> {
        let doc = self.get(id)?;
        let before = match revision_id {
            Some(rev_id) => self
                .conn
                .query_row(
                    "SELECT id, content_id, html, reason, created_at FROM content_revisions \
                     WHERE id = ?1 AND content_id = ?2",
                    params![rev_id, id],
                    Self::row_to_revision,
                )
                .optional()
                .map_err(Self::db_err)?
                .ok_or_else(|| ContentError::RevisionNotFound(rev_id.to_string()))?
                .html,
            None => self
                .latest_revision(id)?
                .map(|r| r.html)
                .unwrap_or_else(|| doc.html.clone()),
        };
        Ok(section_diff(&before, &doc.html))
    }

    fn delete(&mut self, id: &str) -> Result<(), ContentError> {
        self.conn
            .execute("DELETE FROM content_revisions WHERE content_id = ?1", params![id])
            .map_err(Self::db_err)?;
        let affected = self
            .conn
            .execute("DELETE FROM contents WHERE id = ?1", params![id])
            .map_err(Self::db_err)?;
        if affected == 0 {
            return Err(ContentError::NotFound(id.to_string()));
        }
        if let Err(e) = RecentManager::new(self.conn).remove(id) {
            tracing::warn!(content_id = %id, error = %e, "failed to drop deleted content from recent list");
        }
        Ok(())
    }
}

fn heading_key(heading: &str) -> String {
    heading.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn compare(heading: Option<String>, before: &str, after: &str) -> SectionDiff {
    let kind = if before == after {
        DiffKind::Unchanged
    } else {
        DiffKind::Changed
    };
    SectionDiff {
        heading,
        kind,
        before: Some(before.to_string()),
        after: Some(after.to_string()),
    }
}

/// Section-level diff of two documents.
///
/// The intro comes first, then the sections of `after` in order (changed,
/// unchanged or added), then sections only present in `before` as removed.
/// Sections pair up by heading, case-insensitively.
pub fn section_diff(before: &str, after: &str) -> Vec<SectionDiff> {
    let old = split_sections(before);
    let new = split_sections(after);

    let mut diffs = vec![compare(None, &old.intro, &new.intro)];
    let mut matched = vec![false; old.sections.len()];

    for section in &new.sections {
        let key = heading_key(&section.heading);
        let found = old
            .sections
            .iter()
            .enumerate()
            .find(|(i, s)| !matched[*i] && heading_key(&s.heading) == key);
        match found {
            Some((i, old_section)) => {
                matched[i] = true;
                diffs.push(compare(Some(section.heading.clone()), &old_section.body, &section.body));
            }
            None => diffs.push(SectionDiff {
                heading: Some(section.heading.clone()),
                kind: DiffKind::Added,
                before: None,
                after: Some(section.body.clone()),
            }),
        }
    }

    for (i, section) in old.sections.iter().enumerate() {
        if !matched[i] {
            diffs.push(SectionDiff {
                heading: Some(section.heading.clone()),
                kind: DiffKind::Removed,
                before: Some(section.body.clone()),
                after: None,
            });
        }
    }

    diffs
}
