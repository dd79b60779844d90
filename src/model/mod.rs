//! Data model shared by the crawler, the task source and the report store
//!
//! - `Task`: one assigned crawl root
//! - `Job`: one URL inside a task's subtree
//! - `File`: the metadata record produced for a job
//! - `Report`: everything a finished task hands back

mod file;
mod report;
mod task;

pub use file::File;
pub use report::{DirectoryRecord, FailureKind, JobFailure, Report};
pub use task::{Job, Task};
