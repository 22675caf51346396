//! Filter-to-SQL translation for problem listing
//!
//! A [`ProblemFilter`] becomes an ordered list of typed [`Clause`]s. Each
//! clause renders its SQL fragment and pushes its bound values in the same
//! step, so placeholder numbers and parameters cannot drift apart. No filter
//! value is ever spliced into SQL text.

use crate::types::ProblemFilter;
use chrono::NaiveDate;
use rusqlite::types::Value;

/// Columns selected for every problem listing, in `row_to_problem` order.
pub(crate) const PROBLEM_COLUMNS: &str = "p.id, p.name, p.link, p.platform, p.difficulty, \
     p.solve_time, p.notes, p.code_snippet, p.created_at, p.updated_at";

/// Suffix that stretches a bare `YYYY-MM-DD` upper bound to the end of that day.
const END_OF_DAY: &str = "T23:59:59.999Z";

/// One condition on the problem listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `column = value`
    Equals { column: &'static str, value: String },
    /// `column` contains `needle`, ASCII case-insensitive
    Contains {
        column: &'static str,
        needle: String,
    },
    /// `column >= value`
    AtLeast { column: &'static str, value: String },
    /// `column <= value`
    AtMost { column: &'static str, value: String },
    /// Problem carries at least one of these tag names
    HasAnyTag(Vec<String>),
}

impl Clause {
    fn needs_tag_join(&self) -> bool {
        matches!(self, Clause::HasAnyTag(_))
    }

    fn render(&self, sql: &mut String, params: &mut Vec<Value>) {
        let mut bind = |value: String, sql: &mut String| {
            params.push(Value::Text(value));
            sql.push_str(&format!("?{}", params.len()));
        };

        match self {
            Clause::Equals { column, value } => {
                sql.push_str(&format!("{} = ", column));
                bind(value.clone(), sql);
            }
            Clause::Contains { column, needle } => {
                sql.push_str(&format!("{} LIKE ", column));
                bind(format!("%{}%", escape_like(needle)), sql);
                sql.push_str(" ESCAPE '\\'");
            }
            Clause::AtLeast { column, value } => {
                sql.push_str(&format!("{} >= ", column));
                bind(value.clone(), sql);
            }
            Clause::AtMost { column, value } => {
                sql.push_str(&format!("{} <= ", column));
                bind(value.clone(), sql);
            }
            Clause::HasAnyTag(names) => {
                sql.push_str("t.name IN (");
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    bind(name.clone(), sql);
                }
                sql.push(')');
            }
        }
    }
}

/// Builder for the problem listing query.
#[derive(Debug, Clone, Default)]
pub struct ProblemQuery {
    clauses: Vec<Clause>,
}

impl ProblemQuery {
    /// An unrestricted listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a filter. `None` and empty fields add no clauses.
    pub fn from_filter(filter: Option<&ProblemFilter>) -> Self {
        let mut query = Self::new();
        let Some(filter) = filter else {
            return query;
        };

        let mut tags: Vec<String> = Vec::new();
        for name in filter.tags.iter().filter(|n| !n.is_empty()) {
            if !tags.contains(name) {
                tags.push(name.clone());
            }
        }
        if !tags.is_empty() {
            query.push(Clause::HasAnyTag(tags));
        }

        if let Some(difficulty) = non_empty(&filter.difficulty) {
            query.push(Clause::Equals {
                column: "p.difficulty",
                value: difficulty.to_string(),
            });
        }
        if let Some(platform) = non_empty(&filter.platform) {
            query.push(Clause::Equals {
                column: "p.platform",
                value: platform.to_string(),
            });
        }
        if let Some(search) = non_empty(&filter.search_query) {
            query.push(Clause::Contains {
                column: "p.name",
                needle: search.to_string(),
            });
        }
        if let Some(start) = non_empty(&filter.start_date) {
            query.push(Clause::AtLeast {
                column: "p.created_at",
                value: start.to_string(),
            });
        }
        if let Some(end) = non_empty(&filter.end_date) {
            query.push(Clause::AtMost {
                column: "p.created_at",
                value: inclusive_upper_bound(end),
            });
        }

        query
    }

    pub fn push(&mut self, clause: Clause) -> &mut Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Render SQL text and the matching parameter list.
    pub fn render(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT DISTINCT {} FROM problems p", PROBLEM_COLUMNS);
        let mut params = Vec::new();

        if self.clauses.iter().any(Clause::needs_tag_join) {
            sql.push_str(
                " INNER JOIN problem_tags pt ON p.id = pt.problem_id \
                 INNER JOIN tags t ON pt.tag_id = t.id",
            );
        }

        for (i, clause) in self.clauses.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            clause.render(&mut sql, &mut params);
        }

        sql.push_str(" ORDER BY p.created_at DESC, p.id DESC");
        (sql, params)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A bare date as an upper bound means "through the end of that day".
fn inclusive_upper_bound(end: &str) -> String {
    if NaiveDate::parse_from_str(end, "%Y-%m-%d").is_ok() {
        format!("{}{}", end, END_OF_DAY)
    } else {
        end.to_string()
    }
}
