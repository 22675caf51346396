//! Statistics aggregation

use super::Database;
use crate::error::Result;
use crate::types::Statistics;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Run a two-column `(name, count)` query into a map.
fn grouped_counts(conn: &Connection, sql: &str) -> rusqlite::Result<BTreeMap<String, i64>> {
    let mut stmt = conn.prepare(sql)?;
    let counts = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<std::result::Result<_, _>>()?;
    Ok(counts)
}

impl Database {
    // ============================================
    // Statistics
    // ============================================

    /// Aggregate counts and the average recorded solve time.
    pub fn statistics(&self) -> Result<Statistics> {
        let conn = self.connection();

        let total_problems: i64 =
            conn.query_row("SELECT COUNT(*) FROM problems", [], |r| r.get(0))?;

        let by_difficulty = grouped_counts(
            &conn,
            "SELECT difficulty, COUNT(*) FROM problems GROUP BY difficulty",
        )?;

        let by_platform = grouped_counts(
            &conn,
            "SELECT platform, COUNT(*) FROM problems GROUP BY platform",
        )?;

        // LEFT JOIN keeps tags with no problems at 0
        let by_tag = grouped_counts(
            &conn,
            r#"
            SELECT t.name, COUNT(DISTINCT pt.problem_id)
            FROM tags t
            LEFT JOIN problem_tags pt ON t.id = pt.tag_id
            GROUP BY t.id, t.name
            "#,
        )?;

        // Unrecorded (0) times are excluded; AVG over no rows is NULL
        let average_solve_time: f64 = conn.query_row(
            "SELECT COALESCE(AVG(solve_time), 0.0) FROM problems WHERE solve_time > 0",
            [],
            |r| r.get(0),
        )?;

        Ok(Statistics {
            total_problems,
            by_difficulty,
            by_platform,
            by_tag,
            average_solve_time,
        })
    }
}
