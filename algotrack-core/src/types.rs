//! Core domain types for algotrack
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Problem** | A practiced algorithm exercise from some judge or site |
//! | **Tag** | A knowledge-point label (e.g. "Two Pointers") attachable to many problems |
//! | **Filter** | A transient read-time restriction on which problems are listed |
//! | **Statistics** | Aggregate counts and averages over all problems |
//!
//! Problems and tags are linked many-to-many. A problem's tag set is always
//! written as a whole: an update replaces it rather than diffing it.

use crate::format;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================
// Difficulty
// ============================================

/// The fixed set of difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    /// Case-sensitive: "easy" is not a difficulty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            _ => Err(format!("unknown difficulty: {}", s)),
        }
    }
}

// ============================================
// Tag
// ============================================

/// A named knowledge-point label.
///
/// Names are unique and compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(with = "format::lenient", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// A tag that exists only by name; the database assigns identity on write.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

// ============================================
// Problem
// ============================================

/// A tracked algorithm exercise.
///
/// `difficulty` keeps the caller's raw string so validation can say exactly
/// what was wrong with it; see [`Difficulty`] for the accepted values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// Database identity; 0 until the problem has been created
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub link: String,
    pub platform: String,
    pub difficulty: String,
    /// Minutes spent solving; 0 means not recorded
    #[serde(default)]
    pub solve_time: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub code_snippet: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(with = "format::lenient", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "format::lenient", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    pub fn new(
        name: impl Into<String>,
        platform: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            link: String::new(),
            platform: platform.into(),
            difficulty: difficulty.into(),
            solve_time: 0,
            notes: String::new(),
            code_snippet: String::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = names.into_iter().map(Tag::named).collect();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_solve_time(mut self, minutes: u32) -> Self {
        self.solve_time = minutes;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_code_snippet(mut self, code: impl Into<String>) -> Self {
        self.code_snippet = code.into();
        self
    }

    /// Tag names in the order they are held.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

// ============================================
// Filter
// ============================================

/// Read-time restriction for listing problems.
///
/// Every field is optional and empty values mean "no restriction". Set
/// conditions are combined with AND; the tag list matches problems carrying
/// any one of the listed tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Inclusive lower bound on creation time (ISO-8601 date or timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive upper bound on creation time; a bare date covers that whole day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Case-insensitive substring of the problem name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl ProblemFilter {
    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn created_from(mut self, start: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self
    }

    pub fn created_until(mut self, end: impl Into<String>) -> Self {
        self.end_date = Some(end.into());
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// True when no field restricts anything.
    pub fn is_empty(&self) -> bool {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().unwrap_or("").is_empty()
        }
        blank(&self.difficulty)
            && blank(&self.platform)
            && self.tags.iter().all(String::is_empty)
            && blank(&self.start_date)
            && blank(&self.end_date)
            && blank(&self.search_query)
    }
}

// ============================================
// Statistics
// ============================================

/// Aggregate view over every stored problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_problems: i64,
    pub by_difficulty: BTreeMap<String, i64>,
    pub by_platform: BTreeMap<String, i64>,
    /// Distinct problems per tag; unused tags appear with 0
    pub by_tag: BTreeMap<String, i64>,
    /// Mean of recorded solve times, ignoring 0 ("not recorded")
    pub average_solve_time: f64,
}
