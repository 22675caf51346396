//! Problem repository
//!
//! Every multi-row write (problem row plus tag links) runs in one
//! transaction; an error at any step drops the transaction, which rolls it
//! back before the error reaches the caller.

use super::filter::{ProblemQuery, PROBLEM_COLUMNS};
use super::tags::{get_or_create_tag_id, tags_for_problem};
use super::Database;
use crate::error::{Error, Result};
use crate::format;
use crate::types::{Problem, ProblemFilter, Tag};
use crate::validate::validate_problem;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

/// Attach each named tag to `problem_id`, creating tags as needed.
///
/// Blank names are skipped and repeated names link once.
fn link_tags(conn: &Connection, problem_id: i64, tags: &[Tag]) -> rusqlite::Result<usize> {
    let mut linked = 0;
    for tag in tags.iter().filter(|t| !t.name.is_empty()) {
        let tag_id = get_or_create_tag_id(conn, &tag.name)?;
        linked += conn.execute(
            "INSERT OR IGNORE INTO problem_tags (problem_id, tag_id) VALUES (?1, ?2)",
            params![problem_id, tag_id],
        )?;
    }
    Ok(linked)
}

fn row_to_problem(row: &Row) -> rusqlite::Result<Problem> {
    let solve_time: Option<i64> = row.get("solve_time")?;
    let created_at_str: Option<String> = row.get("created_at")?;
    let updated_at_str: Option<String> = row.get("updated_at")?;

    Ok(Problem {
        id: row.get("id")?,
        name: row.get("name")?,
        link: row.get::<_, Option<String>>("link")?.unwrap_or_default(),
        platform: row.get("platform")?,
        difficulty: row.get("difficulty")?,
        solve_time: solve_time.and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
        notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
        code_snippet: row
            .get::<_, Option<String>>("code_snippet")?
            .unwrap_or_default(),
        tags: Vec::new(),
        created_at: created_at_str
            .as_deref()
            .and_then(format::parse_storage)
            .unwrap_or_else(Utc::now),
        updated_at: updated_at_str
            .as_deref()
            .and_then(format::parse_storage)
            .unwrap_or_else(Utc::now),
    })
}

impl Database {
    // ============================================
    // Problem operations
    // ============================================

    /// Validate and insert a problem with its tags.
    ///
    /// Both timestamps are set to now; any id on the input is ignored.
    /// Returns the stored problem with its assigned id and resolved tags.
    pub fn create_problem(&self, problem: &Problem) -> Result<Problem> {
        self.insert_problem(problem, None)
    }

    /// Like [`Database::create_problem`], but keeps the input's creation time.
    ///
    /// Used when re-importing exported data so creation history survives.
    pub fn import_problem(&self, problem: &Problem) -> Result<Problem> {
        self.insert_problem(problem, Some(problem.created_at))
    }

    fn insert_problem(
        &self,
        problem: &Problem,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Problem> {
        validate_problem(problem)?;
        let now = Utc::now();
        let created_at = created_at.unwrap_or(now);

        let id = {
            let mut conn = self.connection();
            let tx = conn.transaction()?;

            tx.execute(
                r#"
                INSERT INTO problems (name, link, platform, difficulty, solve_time, notes,
                                      code_snippet, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    problem.name,
                    problem.link,
                    problem.platform,
                    problem.difficulty,
                    problem.solve_time,
                    problem.notes,
                    problem.code_snippet,
                    format::to_storage(created_at),
                    format::to_storage(now),
                ],
            )?;
            let id = tx.last_insert_rowid();
            let linked = link_tags(&tx, id, &problem.tags)?;

            tx.commit()?;
            tracing::info!(id, tags = linked, "Created problem");
            id
        };

        self.get_problem(id)
    }

    /// Validate and overwrite a problem's mutable fields and tag set.
    ///
    /// The creation time never changes; the update time is refreshed. The tag
    /// set is replaced wholesale. Returns the number of problem rows touched,
    /// which is 0 (not an error) for an unknown id.
    pub fn update_problem(&self, problem: &Problem) -> Result<usize> {
        validate_problem(problem)?;

        let mut conn = self.connection();
        let tx = conn.transaction()?;

        let updated = tx.execute(
            r#"
            UPDATE problems
            SET name = ?1, link = ?2, platform = ?3, difficulty = ?4, solve_time = ?5,
                notes = ?6, code_snippet = ?7, updated_at = ?8
            WHERE id = ?9
            "#,
            params![
                problem.name,
                problem.link,
                problem.platform,
                problem.difficulty,
                problem.solve_time,
                problem.notes,
                problem.code_snippet,
                format::to_storage(Utc::now()),
                problem.id,
            ],
        )?;

        if updated > 0 {
            tx.execute(
                "DELETE FROM problem_tags WHERE problem_id = ?1",
                [problem.id],
            )?;
            link_tags(&tx, problem.id, &problem.tags)?;
        }

        tx.commit()?;
        tracing::info!(id = problem.id, updated, "Updated problem");
        Ok(updated)
    }

    /// Delete a problem; its tag links go with it.
    ///
    /// Returns whether a problem was removed; an unknown id is not an error.
    pub fn delete_problem(&self, id: i64) -> Result<bool> {
        let conn = self.connection();
        let deleted = conn.execute("DELETE FROM problems WHERE id = ?1", [id])?;
        tracing::info!(id, deleted, "Deleted problem");
        Ok(deleted > 0)
    }

    /// Get a problem by ID, with its tags sorted by name
    pub fn get_problem(&self, id: i64) -> Result<Problem> {
        let conn = self.connection();
        let sql = format!("SELECT {} FROM problems p WHERE p.id = ?1", PROBLEM_COLUMNS);
        let mut problem = conn
            .query_row(&sql, [id], row_to_problem)
            .optional()?
            .ok_or(Error::ProblemNotFound(id))?;
        problem.tags = tags_for_problem(&conn, id)?;
        Ok(problem)
    }

    /// List problems, newest first, optionally filtered
    pub fn list_problems(&self, filter: Option<&ProblemFilter>) -> Result<Vec<Problem>> {
        let (sql, params) = ProblemQuery::from_filter(filter).render();
        tracing::debug!(%sql, params = params.len(), "Listing problems");

        let conn = self.connection();
        let mut stmt = conn.prepare(&sql)?;
        let mut problems = stmt
            .query_map(params_from_iter(params.iter()), row_to_problem)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for problem in &mut problems {
            problem.tags = tags_for_problem(&conn, problem.id)?;
        }

        Ok(problems)
    }

    /// Count stored problems
    pub fn count_problems(&self) -> Result<i64> {
        let conn = self.connection();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM problems", [], |r| r.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn two_sum() -> Problem {
        Problem::new("Two Sum", "LeetCode", "Easy")
            .with_link("https://leetcode.com/problems/two-sum/")
            .with_solve_time(15)
            .with_notes("hash map of complements")
            .with_code_snippet("fn two_sum() {}")
            .with_tags(["Hash Map", "Array"])
    }

    #[test]
    fn test_create_then_get() {
        let db = db();
        let created = db.create_problem(&two_sum()).unwrap();
        assert!(created.id > 0);

        let fetched = db.get_problem(created.id).unwrap();
        assert_eq!(fetched.name, "Two Sum");
        assert_eq!(fetched.link, "https://leetcode.com/problems/two-sum/");
        assert_eq!(fetched.platform, "LeetCode");
        assert_eq!(fetched.difficulty, "Easy");
        assert_eq!(fetched.solve_time, 15);
        assert_eq!(fetched.notes, "hash map of complements");
        assert_eq!(fetched.code_snippet, "fn two_sum() {}");
        assert_eq!(fetched.tag_names(), vec!["Array", "Hash Map"]);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn test_duplicate_tag_names_link_once() {
        let db = db();
        let problem = Problem::new("Dup", "LeetCode", "Easy").with_tags(["Graph", "Graph", ""]);
        let created = db.create_problem(&problem).unwrap();
        assert_eq!(created.tag_names(), vec!["Graph"]);
        assert_eq!(db.list_tags().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_problem_is_never_written() {
        let db = db();
        let err = db
            .create_problem(&Problem::new("X", "LeetCode", "Impossible"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownDifficulty(_))
        ));
        assert_eq!(db.count_problems().unwrap(), 0);
    }

    #[test]
    fn test_failed_create_rolls_back() {
        let db = db();
        // Make tag linking fail after the problem row is inserted
        db.connection()
            .execute_batch(
                "CREATE TRIGGER no_links BEFORE INSERT ON problem_tags
                 BEGIN SELECT RAISE(ABORT, 'links disabled'); END;",
            )
            .unwrap();

        assert!(matches!(
            db.create_problem(&two_sum()),
            Err(Error::Database(_))
        ));
        assert_eq!(db.count_problems().unwrap(), 0);
        assert!(db.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_failed_update_rolls_back() {
        let db = db();
        let created = db
            .create_problem(&Problem::new("A", "LeetCode", "Easy").with_tags(["X"]))
            .unwrap();
        db.connection()
            .execute_batch(
                "CREATE TRIGGER no_links BEFORE INSERT ON problem_tags
                 BEGIN SELECT RAISE(ABORT, 'links disabled'); END;",
            )
            .unwrap();

        let mut edit = created.clone();
        edit.name = "B".to_string();
        edit.tags = vec![Tag::named("Y")];
        assert!(matches!(db.update_problem(&edit), Err(Error::Database(_))));

        let fetched = db.get_problem(created.id).unwrap();
        assert_eq!(fetched.name, "A");
        assert_eq!(fetched.tag_names(), vec!["X"]);
        assert_eq!(fetched.updated_at, created.updated_at);
        assert!(db.find_tag("Y").unwrap().is_none());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let db = db();
        assert!(matches!(
            db.get_problem(42),
            Err(Error::ProblemNotFound(42))
        ));
    }

    #[test]
    fn test_update_replaces_tags_and_keeps_created_at() {
        let db = db();
        let created = db.create_problem(&two_sum()).unwrap();

        let mut edit = created.clone();
        edit.name = "Two Sum II".to_string();
        edit.difficulty = "Medium".to_string();
        edit.tags = vec![Tag::named("Two Pointers")];
        assert_eq!(db.update_problem(&edit).unwrap(), 1);

        let fetched = db.get_problem(created.id).unwrap();
        assert_eq!(fetched.name, "Two Sum II");
        assert_eq!(fetched.difficulty, "Medium");
        assert_eq!(fetched.tag_names(), vec!["Two Pointers"]);
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at >= created.updated_at);

        // Old tags survive without links
        assert_eq!(db.list_tags().unwrap().len(), 3);
    }

    #[test]
    fn test_update_is_idempotent() {
        let db = db();
        let created = db.create_problem(&two_sum()).unwrap();
        let mut edit = created.clone();
        edit.notes = "revisited".to_string();

        db.update_problem(&edit).unwrap();
        let once = db.get_problem(created.id).unwrap();
        db.update_problem(&edit).unwrap();
        let twice = db.get_problem(created.id).unwrap();

        assert_eq!(once.notes, twice.notes);
        assert_eq!(once.tags, twice.tags);
        assert_eq!(once.created_at, twice.created_at);
    }

    #[test]
    fn test_update_unknown_id_touches_nothing() {
        let db = db();
        let mut ghost = two_sum();
        ghost.id = 999;
        assert_eq!(db.update_problem(&ghost).unwrap(), 0);
        assert_eq!(db.count_problems().unwrap(), 0);
    }

    #[test]
    fn test_delete_cascades_links_not_tags() {
        let db = db();
        let created = db.create_problem(&two_sum()).unwrap();

        assert!(db.delete_problem(created.id).unwrap());
        assert!(!db.delete_problem(created.id).unwrap());

        let links: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM problem_tags", [], |r| r.get(0))
            .unwrap();
        assert_eq!(links, 0);
        assert_eq!(db.list_tags().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_tag_detaches_from_problems() {
        let db = db();
        let created = db.create_problem(&two_sum()).unwrap();
        let array = db.find_tag("Array").unwrap().unwrap();

        db.delete_tag(array.id).unwrap();

        let fetched = db.get_problem(created.id).unwrap();
        assert_eq!(fetched.tag_names(), vec!["Hash Map"]);
    }

    #[test]
    fn test_list_filters() {
        let db = db();
        let easy = db.create_problem(&two_sum()).unwrap();
        let hard = db
            .create_problem(
                &Problem::new("Median of Two Arrays", "LeetCode", "Hard")
                    .with_tags(["Binary Search", "Array"]),
            )
            .unwrap();
        let cf = db
            .create_problem(&Problem::new("Watermelon", "Codeforces", "Easy").with_tags(["Math"]))
            .unwrap();

        let ids = |filter: ProblemFilter| -> Vec<i64> {
            db.list_problems(Some(&filter))
                .unwrap()
                .into_iter()
                .map(|p| p.id)
                .collect()
        };

        // Newest first; same-second ties fall back to id
        assert_eq!(ids(ProblemFilter::default()), vec![cf.id, hard.id, easy.id]);
        assert_eq!(ids(ProblemFilter::default().difficulty("Hard")), vec![hard.id]);
        assert!(ids(ProblemFilter::default().difficulty("hard")).is_empty());
        assert_eq!(ids(ProblemFilter::default().platform("Codeforces")), vec![cf.id]);
        assert_eq!(ids(ProblemFilter::default().search("TWO")), vec![hard.id, easy.id]);

        // Any-of tag match, no duplicates for problems with both tags
        assert_eq!(
            ids(ProblemFilter::default().tags(["Array", "Hash Map"])),
            vec![hard.id, easy.id]
        );
        assert_eq!(
            ids(ProblemFilter::default().tags(["Math", "Binary Search"]).difficulty("Easy")),
            vec![cf.id]
        );
    }

    #[test]
    fn test_list_date_range_is_inclusive() {
        let db = db();
        let mut old = Problem::new("Old", "POJ", "Medium");
        old.created_at = "2023-06-15T10:00:00Z".parse().unwrap();
        let old = db.import_problem(&old).unwrap();
        db.create_problem(&Problem::new("New", "POJ", "Medium")).unwrap();

        let ids: Vec<i64> = db
            .list_problems(Some(
                &ProblemFilter::default()
                    .created_from("2023-06-15")
                    .created_until("2023-06-15"),
            ))
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![old.id]);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let db = db();
        db.create_problem(&Problem::new("100% Coverage", "Kattis", "Easy")).unwrap();
        db.create_problem(&Problem::new("1000 Coverage", "Kattis", "Easy")).unwrap();

        let found = db
            .list_problems(Some(&ProblemFilter::default().search("0%")))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "100% Coverage");
    }
}
