//! Task sources
//!
//! The orchestrator pulls work from a `TaskSource` and hands finished reports
//! back to it. The production source talks to a coordination server over
//! HTTP; tests plug in in-memory sources.

mod http;

pub use http::HttpTaskSource;

use crate::model::{Report, Task};
use crate::CrawlerError;
use async_trait::async_trait;

/// Supplier of crawl tasks and sink for their reports
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetches the next task
    ///
    /// # Returns
    ///
    /// * `Ok(Some(task))` - A task is available
    /// * `Ok(None)` - Nothing to do right now
    /// * `Err(CrawlerError)` - The source could not be reached
    async fn fetch_task(&self) -> Result<Option<Task>, CrawlerError>;

    /// Hands a finished report back
    async fn submit_report(&self, task: &Task, report: &Report) -> Result<(), CrawlerError>;
}
