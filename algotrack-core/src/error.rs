//! Error types for algotrack-core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the algotrack-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A write was rejected before reaching the database
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Problem not found
    #[error("problem not found: {0}")]
    ProblemNotFound(i64),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backup/restore requested for a database that has no file on disk
    #[error("database is not backed by a file")]
    NoDatabaseFile,

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Export/import format not supported for the requested direction
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Which rule a rejected write broke.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("problem name is required")]
    EmptyName,

    #[error("platform is required")]
    EmptyPlatform,

    #[error("difficulty is required")]
    EmptyDifficulty,

    #[error("difficulty must be Easy, Medium, or Hard (got {0:?})")]
    UnknownDifficulty(String),

    #[error("tag name cannot be empty")]
    EmptyTagName,
}

/// Coarse classification used by boundary layers.
///
/// Serialized in snake case (`"not_found"`) as the `kind` of a failed
/// [`crate::Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
    Interchange,
    Config,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::ProblemNotFound(_) => ErrorKind::NotFound,
            Error::Database(_) | Error::Io(_) | Error::NoDatabaseFile => ErrorKind::Storage,
            Error::Json(_) | Error::Csv(_) | Error::UnsupportedFormat(_) => {
                ErrorKind::Interchange
            }
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for algotrack-core
pub type Result<T> = std::result::Result<T, Error>;
