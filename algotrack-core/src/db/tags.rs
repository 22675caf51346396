//! Tag repository
//!
//! Tag names are unique. Writes that reference a tag by name resolve it with
//! get-or-create inside the caller's transaction, so a duplicate name never
//! surfaces as an error.

use super::Database;
use crate::error::{Error, Result};
use crate::format;
use crate::types::Tag;
use crate::validate::validate_tag_name;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Resolve `name` to a tag id, inserting the tag if it does not exist yet.
///
/// Runs on whatever connection or transaction it is handed; problem writes
/// pass their open transaction so lookup and insert commit together.
pub(crate) fn get_or_create_tag_id(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO tags (name, created_at) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
        params![name, format::to_storage(Utc::now())],
    )?;
    conn.query_row("SELECT id FROM tags WHERE name = ?1", [name], |r| r.get(0))
}

/// Tags attached to a problem, sorted by name.
pub(crate) fn tags_for_problem(conn: &Connection, problem_id: i64) -> rusqlite::Result<Vec<Tag>> {
    let mut stmt = conn.prepare_cached(
        r#"
        SELECT t.id, t.name, t.created_at
        FROM tags t
        INNER JOIN problem_tags pt ON t.id = pt.tag_id
        WHERE pt.problem_id = ?1
        ORDER BY t.name
        "#,
    )?;
    let tags = stmt
        .query_map([problem_id], row_to_tag)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tags)
}

fn row_to_tag(row: &Row) -> rusqlite::Result<Tag> {
    let created_at_str: Option<String> = row.get("created_at")?;
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: created_at_str
            .as_deref()
            .and_then(format::parse_storage)
            .unwrap_or_else(Utc::now),
    })
}

impl Database {
    // ============================================
    // Tag operations
    // ============================================

    /// Look up a tag by exact name, creating it if absent.
    pub fn get_or_create_tag(&self, name: &str) -> Result<i64> {
        validate_tag_name(name)?;
        let mut conn = self.connection();
        let tx = conn.transaction()?;
        let id = get_or_create_tag_id(&tx, name)?;
        tx.commit()?;
        Ok(id)
    }

    /// Create a tag.
    ///
    /// Does not dedupe: an existing name fails with a constraint error. Use
    /// [`Database::get_or_create_tag`] for idempotent creation.
    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        validate_tag_name(name)?;
        let conn = self.connection();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO tags (name, created_at) VALUES (?1, ?2)",
            params![name, format::to_storage(now)],
        )?;
        let tag = Tag {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
        };
        tracing::debug!(id = tag.id, name, "Created tag");
        Ok(tag)
    }

    /// All tags, sorted by name
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.connection();
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM tags ORDER BY name")?;
        let tags = stmt
            .query_map([], row_to_tag)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Find a tag by exact name
    pub fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        let conn = self.connection();
        conn.query_row(
            "SELECT id, name, created_at FROM tags WHERE name = ?1",
            [name],
            row_to_tag,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Delete a tag and, by cascade, its problem links.
    ///
    /// Returns whether a tag was removed; an unknown id is not an error.
    pub fn delete_tag(&self, id: i64) -> Result<bool> {
        let conn = self.connection();
        let deleted = conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
        tracing::debug!(id, deleted, "Deleted tag");
        Ok(deleted > 0)
    }
}
