//! Process-wide crawl context
//!
//! Everything workers share lives here and is passed around explicitly:
//! the transport (one connection pool), the crawler settings, the global
//! worker pool, and the outstanding-task bookkeeping the orchestrator
//! waits on during shutdown.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{HttpTransport, Transport};
use crate::CrawlerError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::task::TaskTracker;

/// Fixed-size pool of worker slots shared by every tree walker
///
/// A job holds one slot from the start of its request until its result is
/// produced, which caps concurrent network operations process-wide.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Waits for a free slot
    ///
    /// Returns `None` only if the pool was closed.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.semaphore.clone().acquire_owned().await.ok()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of currently free slots
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Shared state handed to the orchestrator, tree walkers and workers
pub struct CrawlContext {
    pub config: CrawlerConfig,
    pub transport: Arc<dyn Transport>,
    pub pool: WorkerPool,
    active_tasks: AtomicUsize,
    tracker: TaskTracker,
}

impl CrawlContext {
    pub fn new(config: CrawlerConfig, transport: Arc<dyn Transport>) -> Self {
        let pool = WorkerPool::new(config.workers as usize);
        Self {
            config,
            transport,
            pool,
            active_tasks: AtomicUsize::new(0),
            tracker: TaskTracker::new(),
        }
    }

    /// Builds a context around a real HTTP transport
    pub fn from_config(config: CrawlerConfig) -> Result<Self, CrawlerError> {
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Number of tasks whose tree walkers have not finished yet
    pub fn active_tasks(&self) -> usize {
        self.active_tasks.load(Ordering::SeqCst)
    }

    pub(crate) fn task_started(&self) -> usize {
        self.active_tasks.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn task_finished(&self) -> usize {
        self.active_tasks.fetch_sub(1, Ordering::SeqCst) - 1
    }

    /// Completion barrier for spawned tasks
    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_pool_caps_slots() {
        let pool = WorkerPool::new(2);
        let a = pool.acquire().await.unwrap();
        let _b = pool.acquire().await.unwrap();
        assert_eq!(pool.available(), 0);

        let third = tokio::time::timeout(Duration::from_millis(50), pool.acquire()).await;
        assert!(third.is_err(), "third slot should not be granted");

        drop(a);
        assert_eq!(pool.available(), 1);
        assert!(pool.acquire().await.is_some());
    }

    #[test]
    fn test_task_counter() {
        let ctx = CrawlContext::from_config(CrawlerConfig::default()).unwrap();
        assert_eq!(ctx.active_tasks(), 0);
        assert_eq!(ctx.task_started(), 1);
        assert_eq!(ctx.task_started(), 2);
        assert_eq!(ctx.task_finished(), 1);
        assert_eq!(ctx.active_tasks(), 1);
        assert_eq!(ctx.pool.size(), 4);
    }
}
