//! Database schema and migrations
//!
//! The base schema is created with `IF NOT EXISTS`, so running it against an
//! existing file is a no-op. Columns added after the first release are applied
//! as best-effort `ALTER TABLE ... ADD COLUMN` statements: a failure (usually
//! "duplicate column") is logged and ignored.

use rusqlite::Connection;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS problems (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT NOT NULL,
        link             TEXT DEFAULT '',
        platform         TEXT NOT NULL,
        difficulty       TEXT NOT NULL,
        solve_time       INTEGER DEFAULT 0,
        notes            TEXT,
        code_snippet     TEXT,
        created_at       DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at       DATETIME DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS tags (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT UNIQUE NOT NULL,
        created_at       DATETIME DEFAULT CURRENT_TIMESTAMP
    );

    -- Many-to-many: deleting either side removes the link
    CREATE TABLE IF NOT EXISTS problem_tags (
        problem_id       INTEGER,
        tag_id           INTEGER,
        PRIMARY KEY (problem_id, tag_id),
        FOREIGN KEY (problem_id) REFERENCES problems(id) ON DELETE CASCADE,
        FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_problems_difficulty ON problems(difficulty);
    CREATE INDEX IF NOT EXISTS idx_problems_platform ON problems(platform);
    CREATE INDEX IF NOT EXISTS idx_problems_created_at ON problems(created_at);
    CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name);
    CREATE INDEX IF NOT EXISTS idx_problem_tags_tag ON problem_tags(tag_id);
"#;

/// Columns introduced after the base schema: (table, column, definition).
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[("problems", "link", "TEXT DEFAULT ''")];

/// Create missing tables and apply additive column migrations.
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    tracing::info!("Ensuring database schema");
    conn.execute_batch(SCHEMA)?;

    for (table, column, definition) in ADDITIVE_COLUMNS {
        let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition);
        match conn.execute(&sql, []) {
            Ok(_) => tracing::info!(table, column, "Added column"),
            Err(e) => tracing::debug!(table, column, error = %e, "Skipped column migration"),
        }
    }

    Ok(())
}

/// Whether `table` currently has a column named `column`.
pub fn has_column(conn: &Connection, table: &str, column: &str) -> crate::error::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|n| n == column))
}
