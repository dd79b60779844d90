use crate::crawler::DirectorySignature;
use crate::model::{File, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Why a job failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum FailureKind {
    /// HTTP 429
    RateLimited,
    /// HTTP 401 or 403
    Forbidden,
    /// Any other unexpected status
    Status(u16),
    /// Timeout, connection failure or malformed response
    Transport,
}

impl FailureKind {
    /// Only rate limiting is worth another attempt later on
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    pub fn to_db_string(&self) -> String {
        match self {
            Self::RateLimited => "rate_limited".to_string(),
            Self::Forbidden => "forbidden".to_string(),
            Self::Status(code) => format!("status_{}", code),
            Self::Transport => "transport".to_string(),
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "rate_limited" => Some(Self::RateLimited),
            "forbidden" => Some(Self::Forbidden),
            "transport" => Some(Self::Transport),
            other => other
                .strip_prefix("status_")
                .and_then(|code| code.parse().ok())
                .map(Self::Status),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// A job that did not produce a file record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

/// A successfully listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRecord {
    /// Path relative to the task root (empty for the root itself)
    pub path: String,

    /// Base name of the directory
    pub name: String,

    /// Fingerprint of the directory name and its listed children
    pub signature: DirectorySignature,

    /// Number of child links that survived filtering
    pub entries: usize,
}

/// Everything a finished task hands back
///
/// Partial results are kept: failed branches show up in `failures` while
/// everything that was discovered elsewhere stays in `files`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub task: Task,
    pub files: Vec<File>,
    pub directories: Vec<DirectoryRecord>,
    pub failures: Vec<JobFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Report {
    /// Creates an empty report for a task that starts now
    pub fn new(task: Task) -> Self {
        let now = Utc::now();
        Self {
            task,
            files: Vec::new(),
            directories: Vec::new(),
            failures: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Number of regular files
    pub fn file_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_dir).count()
    }

    /// Number of directories reported as files (the root is not included)
    pub fn dir_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_dir).count()
    }

    /// Sum of all known file sizes
    pub fn total_size(&self) -> u64 {
        self.files.iter().filter_map(|f| f.size).sum()
    }

    /// Failures that may succeed on a later attempt
    pub fn retryable_failures(&self) -> impl Iterator<Item = &JobFailure> {
        self.failures.iter().filter(|f| f.kind.is_retryable())
    }

    /// Elapsed wall time of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
