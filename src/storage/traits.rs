//! Storage traits and error types

use crate::model::{File, JobFailure, Report};
use crate::storage::TaskRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored task not found: {0}")]
    TaskNotFound(i64),

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for local report store implementations
///
/// Stored tasks are addressed by the row id returned from `save_report`,
/// since the same remote task may be crawled more than once.
pub trait Storage {
    /// Persists a finished report and returns its row id
    fn save_report(&mut self, report: &Report) -> StorageResult<i64>;

    /// Loads the files of a stored task, ordered by path
    fn load_files(&self, id: i64) -> StorageResult<Vec<File>>;

    /// Loads the failures of a stored task
    fn load_failures(&self, id: i64) -> StorageResult<Vec<JobFailure>>;

    /// Counts the files of a stored task
    fn count_files(&self, id: i64) -> StorageResult<u64>;

    /// Gets a stored task by row id
    fn get_task(&self, id: i64) -> StorageResult<TaskRecord>;

    /// Gets the most recently stored task
    fn latest_task(&self) -> StorageResult<Option<TaskRecord>>;
}
