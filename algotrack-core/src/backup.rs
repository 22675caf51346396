//! File-level backup and restore of the database
//!
//! Both directions are plain byte copies. Restoring over a live database is
//! only safe once its connection is closed; [`crate::Tracker::restore`]
//! sequences that.

use crate::error::Result;
use std::path::Path;

/// Copy the database file at `db_path` to `backup_path`.
///
/// Returns the number of bytes copied.
pub fn backup_file(db_path: &Path, backup_path: &Path) -> Result<u64> {
    ensure_parent(backup_path)?;
    let bytes = std::fs::copy(db_path, backup_path)?;
    tracing::info!(
        from = %db_path.display(),
        to = %backup_path.display(),
        bytes,
        "Backed up database"
    );
    Ok(bytes)
}

/// Copy `backup_path` over the database file at `db_path`.
///
/// The caller must have closed every connection to `db_path`.
pub fn restore_file(db_path: &Path, backup_path: &Path) -> Result<u64> {
    ensure_parent(db_path)?;
    let bytes = std::fs::copy(backup_path, db_path)?;
    tracing::info!(
        from = %backup_path.display(),
        to = %db_path.display(),
        bytes,
        "Restored database file"
    );
    Ok(bytes)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
