//! Tracker service context
//!
//! [`Tracker`] owns one [`Database`] and is the entry point boundary layers
//! call into. There is no global state: each tracker is constructed
//! explicitly, and independent trackers can coexist (one per test, for
//! instance).

use crate::backup;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::exchange::{self, ExportFormat};
use crate::types::{Problem, ProblemFilter, Statistics, Tag};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
}

/// The problem tracker: validated writes, filtered reads, statistics,
/// interchange, and backup over a single database.
pub struct Tracker {
    db: Database,
    pretty_export: bool,
}

impl Tracker {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_database(Database::initialize(path)?))
    }

    /// A tracker over a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        db.migrate()?;
        Ok(Self::from_database(db))
    }

    /// Wrap an already-migrated database.
    pub fn from_database(db: Database) -> Self {
        Self {
            db,
            pretty_export: true,
        }
    }

    /// Choose between indented (default) and compact JSON exports.
    pub fn with_pretty_export(mut self, pretty: bool) -> Self {
        self.pretty_export = pretty;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Release the database connection.
    pub fn close(self) -> Result<()> {
        self.db.close()
    }

    // ============================================
    // Problems
    // ============================================

    pub fn create_problem(&self, problem: &Problem) -> Result<Problem> {
        self.db.create_problem(problem)
    }

    /// Returns the number of rows updated (0 for an unknown id).
    pub fn update_problem(&self, problem: &Problem) -> Result<usize> {
        self.db.update_problem(problem)
    }

    pub fn delete_problem(&self, id: i64) -> Result<bool> {
        self.db.delete_problem(id)
    }

    pub fn get_problem(&self, id: i64) -> Result<Problem> {
        self.db.get_problem(id)
    }

    pub fn list_problems(&self, filter: Option<&ProblemFilter>) -> Result<Vec<Problem>> {
        self.db.list_problems(filter)
    }

    // ============================================
    // Tags
    // ============================================

    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        self.db.create_tag(name)
    }

    /// Id of the tag named `name`, creating it if needed.
    pub fn get_or_create_tag(&self, name: &str) -> Result<i64> {
        self.db.get_or_create_tag(name)
    }

    pub fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        self.db.find_tag(name)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        self.db.list_tags()
    }

    pub fn delete_tag(&self, id: i64) -> Result<bool> {
        self.db.delete_tag(id)
    }

    pub fn statistics(&self) -> Result<Statistics> {
        self.db.statistics()
    }

    // ============================================
    // Interchange
    // ============================================

    /// Write every problem, newest first, to `path`.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<usize> {
        let problems = self.db.list_problems(None)?;
        let writer = BufWriter::new(File::create(path)?);

        match format {
            ExportFormat::Json => exchange::write_json(writer, &problems, self.pretty_export)?,
            ExportFormat::Csv => exchange::write_csv(writer, &problems)?,
        }

        tracing::info!(
            %format,
            path = %path.display(),
            count = problems.len(),
            "Exported problems"
        );
        Ok(problems.len())
    }

    /// Create one problem per record in the JSON file at `path`.
    ///
    /// Records get new ids and keep their creation time. Each record is its
    /// own transaction: the first failing record stops the import and the
    /// records before it stay committed.
    pub fn import(&self, format: ExportFormat, path: &Path) -> Result<ImportSummary> {
        if format != ExportFormat::Json {
            return Err(Error::UnsupportedFormat(format!(
                "{} import (only json is supported)",
                format
            )));
        }

        let problems = exchange::read_json(BufReader::new(File::open(path)?))?;
        let total = problems.len();

        let mut imported = 0;
        for problem in &problems {
            if let Err(e) = self.db.import_problem(problem) {
                tracing::warn!(imported, total, error = %e, "Import stopped early");
                return Err(e);
            }
            imported += 1;
        }

        tracing::info!(imported, path = %path.display(), "Imported problems");
        Ok(ImportSummary { imported })
    }

    // ============================================
    // Backup / restore
    // ============================================

    fn file_path(&self) -> Result<PathBuf> {
        self.db
            .path()
            .map(Path::to_path_buf)
            .ok_or(Error::NoDatabaseFile)
    }

    /// Copy the database file to `backup_path`.
    pub fn backup(&self, backup_path: &Path) -> Result<u64> {
        let path = self.file_path()?;
        backup::backup_file(&path, backup_path)
    }

    /// Replace the database with the file at `backup_path`.
    ///
    /// Closes this tracker's connection, copies the backup over the database
    /// file, and reopens it. The backup must exist; it is checked before the
    /// connection is closed. The tracker is reopened against its file even
    /// when the close or the copy fails, so it stays usable after an error.
    pub fn restore(&mut self, backup_path: &Path) -> Result<()> {
        let path = self.file_path()?;
        std::fs::metadata(backup_path)?;

        let live = std::mem::replace(&mut self.db, Database::open_in_memory()?);
        let copied = live
            .close()
            .and_then(|_| backup::restore_file(&path, backup_path));
        if let Err(e) = &copied {
            tracing::warn!(error = %e, path = %path.display(), "Restore failed, reopening");
        }

        self.db = Database::initialize(&path)?;
        copied.map(|_| ())
    }
}
