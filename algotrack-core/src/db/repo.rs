//! Database handle and connection lifecycle
//!
//! Query and write operations live in sibling modules as further
//! `impl Database` blocks: [`super::tags`], [`super::problems`], and
//! [`super::stats`].

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Database handle owning the single connection for one tracker
pub struct Database {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Rollback journal (not WAL) keeps the whole database in one file,
        // which is what backup and restore copy.
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::info!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Open the database at `path` and make sure its schema is current.
    pub fn initialize(path: &Path) -> Result<Self> {
        let db = Self::open(path)?;
        db.migrate()?;
        Ok(db)
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.connection();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    ///
    /// A poisoned lock is recovered; open transactions roll back on drop.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// File backing this database, or `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, e)| Error::Database(e))?;
        if let Some(path) = &self.path {
            tracing::info!(path = %path.display(), "Closed database");
        }
        Ok(())
    }
}
