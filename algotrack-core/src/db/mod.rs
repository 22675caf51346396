//! Database layer for algotrack
//!
//! This module provides the storage layer using SQLite with:
//! - Idempotent schema creation and additive column migrations
//! - Repository methods for problems and tags on [`Database`]
//! - A typed filter-to-SQL builder for problem listings
//! - Statistics aggregation

pub mod filter;
pub mod problems;
pub mod repo;
pub mod schema;
pub mod stats;
pub mod tags;

pub use filter::{Clause, ProblemQuery};
pub use repo::Database;
