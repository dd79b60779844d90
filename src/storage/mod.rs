//! Storage module for persisting crawl reports
//!
//! This module handles the local report store used by single-crawl mode:
//! - SQLite database initialization and schema management
//! - Saving finished reports (files, directories, failures)
//! - Reading stored tasks back for inspection

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::{Path, PathBuf};

/// File name of the report database inside the crawled directory
pub const DATABASE_FILE: &str = "reports.db";

/// Returns the report database path for a crawled directory
pub fn database_path(crawled_dir: &Path) -> PathBuf {
    crawled_dir.join(DATABASE_FILE)
}

/// Initializes or opens a storage database
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A stored crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Row id in the local store
    pub id: i64,

    /// Identifier assigned by the task source
    pub task_id: i64,
    pub url: String,
    pub started_at: String,
    pub finished_at: String,
}
