//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::model::{FailureKind, File, JobFailure, Report};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::TaskRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get(0)?,
        task_id: row.get(1)?,
        url: row.get(2)?,
        started_at: row.get(3)?,
        finished_at: row.get(4)?,
    })
}

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

impl Storage for SqliteStorage {
    fn save_report(&mut self, report: &Report) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO tasks (task_id, url, started_at, finished_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                report.task.id,
                report.task.url,
                report.started_at.to_rfc3339(),
                report.finished_at.to_rfc3339()
            ],
        )?;
        let row_id = tx.last_insert_rowid();

        {
            let mut insert_file = tx.prepare(
                "INSERT INTO files (task_row, path, name, is_dir, size, modified)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for file in &report.files {
                insert_file.execute(params![
                    row_id,
                    file.path,
                    file.name,
                    file.is_dir,
                    file.size.map(|s| s as i64),
                    file.modified.map(|m| m.to_rfc3339())
                ])?;
            }

            let mut insert_dir = tx.prepare(
                "INSERT INTO directories (task_row, path, name, signature, entries)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for dir in &report.directories {
                insert_dir.execute(params![
                    row_id,
                    dir.path,
                    dir.name,
                    dir.signature.to_hex(),
                    dir.entries as i64
                ])?;
            }

            let mut insert_failure = tx.prepare(
                "INSERT INTO failures (task_row, url, kind, message) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for failure in &report.failures {
                insert_failure.execute(params![
                    row_id,
                    failure.url,
                    failure.kind.to_db_string(),
                    failure.message
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            "Stored task {} as row {} ({} files)",
            report.task.id,
            row_id,
            report.files.len()
        );
        Ok(row_id)
    }

    fn load_files(&self, id: i64) -> StorageResult<Vec<File>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, path, is_dir, size, modified FROM files WHERE task_row = ?1 ORDER BY path",
        )?;

        let files = stmt
            .query_map(params![id], |row| {
                let mut file = File::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get(2)?,
                );
                file.size = row.get::<_, Option<i64>>(3)?.map(|s| s as u64);
                file.modified = parse_timestamp(row.get(4)?);
                Ok(file)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(files)
    }

    fn load_failures(&self, id: i64) -> StorageResult<Vec<JobFailure>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, kind, message FROM failures WHERE task_row = ?1 ORDER BY id")?;

        let rows = stmt
            .query_map(params![id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(url, kind, message)| {
                let kind = FailureKind::from_db_string(&kind)
                    .ok_or_else(|| StorageError::Corrupt(format!("failure kind {:?}", kind)))?;
                Ok(JobFailure { url, kind, message })
            })
            .collect()
    }

    fn count_files(&self, id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM files WHERE task_row = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn get_task(&self, id: i64) -> StorageResult<TaskRecord> {
        self.conn
            .query_row(
                "SELECT id, task_id, url, started_at, finished_at FROM tasks WHERE id = ?1",
                params![id],
                task_from_row,
            )
            .optional()?
            .ok_or(StorageError::TaskNotFound(id))
    }

    fn latest_task(&self) -> StorageResult<Option<TaskRecord>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, task_id, url, started_at, finished_at FROM tasks ORDER BY id DESC LIMIT 1",
                [],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }
}
