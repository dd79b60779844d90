//! Crawl coordinator - task orchestration
//!
//! This module contains the outer loops of the crawler:
//! - Server mode: periodically acquire tasks from a task source, run each one
//!   on its own tree walker and hand the report back
//! - Single mode: crawl one URL and return its report
//! - Graceful shutdown: stop acquiring, let running tasks drain

use crate::crawler::context::CrawlContext;
use crate::crawler::scheduler::TreeWalker;
use crate::crawler::shutdown::sleep_or_cancel;
use crate::model::{Report, Task};
use crate::remote::TaskSource;
use crate::url::parse_task_url;
use crate::{CrawlerError, UrlError};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
}

impl Coordinator {
    pub fn new(ctx: Arc<CrawlContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<CrawlContext> {
        &self.ctx
    }

    /// Crawls a single task to completion
    ///
    /// # Returns
    ///
    /// * `Ok(Report)` - The task ran; per-job failures are inside the report
    /// * `Err(CrawlerError)` - The task URL cannot be crawled
    pub async fn crawl_one(&self, task: Task) -> Result<Report, CrawlerError> {
        let root = parse_task_url(&task.url)?;
        Ok(run_task(Arc::clone(&self.ctx), task, root).await)
    }

    /// Runs the task acquisition loop until `shutdown` is cancelled
    ///
    /// Every `recheck-interval` one task is requested from `source`. Tasks
    /// run concurrently and share the worker pool. After cancellation no new
    /// task is acquired and the call returns once every running task has
    /// finished and its report was submitted.
    pub async fn run_server(&self, source: Arc<dyn TaskSource>, shutdown: CancellationToken) {
        let mut ticker = interval(self.ctx.config.recheck_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            // The tick and the signal may have raced
            if shutdown.is_cancelled() {
                break;
            }

            match self.acquire_task(source.as_ref()).await {
                Ok(Some((task, root))) => self.schedule(Arc::clone(&source), task, root),
                Ok(None) => {
                    if self.ctx.active_tasks() == 0 {
                        tracing::info!("Waiting for new tasks...");
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to acquire task: {}", e);
                    if !sleep_or_cancel(self.ctx.config.cooldown(), &shutdown).await {
                        break;
                    }
                }
            }
        }

        let remaining = self.ctx.active_tasks();
        if remaining > 0 {
            tracing::info!("Waiting for {} running task(s) to finish", remaining);
        }
        self.ctx.tracker().close();
        self.ctx.tracker().wait().await;
        tracing::info!("All tasks finished");
    }

    /// Requests one task and validates its root URL
    ///
    /// Tasks with an unsupported scheme are skipped without an error.
    async fn acquire_task(
        &self,
        source: &dyn TaskSource,
    ) -> Result<Option<(Task, Url)>, CrawlerError> {
        let Some(task) = source.fetch_task().await? else {
            return Ok(None);
        };

        match parse_task_url(&task.url) {
            Ok(root) => Ok(Some((task, root))),
            Err(UrlError::UnsupportedScheme(scheme)) => {
                tracing::debug!("Skipping task {} with scheme {}", task.id, scheme);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Spawns a task on the tracker and submits its report when done
    fn schedule(&self, source: Arc<dyn TaskSource>, task: Task, root: Url) {
        let ctx = Arc::clone(&self.ctx);
        self.ctx.tracker().spawn(async move {
            let report = run_task(ctx, task.clone(), root).await;
            if let Err(e) = source.submit_report(&task, &report).await {
                tracing::error!("Failed to submit report of task {}: {}", task.id, e);
            }
        });
    }
}

/// Runs one tree walker, keeping the outstanding-task counter current
async fn run_task(ctx: Arc<CrawlContext>, task: Task, root: Url) -> Report {
    let running = ctx.task_started();
    tracing::info!(
        "Starting crawl of {} (task {}, {} running)",
        root,
        task.id,
        running
    );

    let start = Instant::now();
    let report = TreeWalker::new(Arc::clone(&ctx), task, root.clone())
        .run()
        .await;
    let remaining = ctx.task_finished();

    tracing::info!(
        "Crawled {}: {} files, {} directories, {} failures in {:?} ({} running)",
        root,
        report.file_count(),
        report.dir_count(),
        report.failures.len(),
        start.elapsed(),
        remaining
    );

    report
}
