//! # algotrack-core
//!
//! Core library for algotrack - a personal tracker for solved algorithm problems.
//!
//! This library provides:
//! - Domain types for problems, tags, filters, and statistics
//! - Database storage layer with SQLite
//! - A filter-to-SQL builder for problem listings
//! - JSON/CSV interchange and file-level backup
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use algotrack_core::{Config, Problem, ProblemFilter, Tracker};
//!
//! let config = Config::load().expect("failed to load config");
//! let tracker = Tracker::open(&config.resolved_database_path()).expect("failed to open database");
//!
//! let problem = Problem::new("Two Sum", "LeetCode", "Easy").with_tags(["Array", "Hash Map"]);
//! tracker.create_problem(&problem).expect("failed to add problem");
//!
//! let easy = ProblemFilter::default().difficulty("Easy");
//! for p in tracker.list_problems(Some(&easy)).expect("failed to list") {
//!     println!("{} ({})", p.name, p.platform);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, ProblemQuery};
pub use error::{Error, ErrorKind, Result, ValidationError};
pub use exchange::ExportFormat;
pub use response::Response;
pub use service::{ImportSummary, Tracker};
pub use types::*;

// Public modules
pub mod backup;
pub mod config;
pub mod db;
pub mod error;
pub mod exchange;
pub mod format;
pub mod logging;
pub mod response;
pub mod service;
pub mod types;
pub mod validate;
