//! Tree walker: the per-task job scheduler
//!
//! This module handles:
//! - The breadth-first job queue of one crawl root
//! - Handing jobs to the shared worker pool
//! - Deduplicating resolved URLs within the task
//! - Collecting files, directory signatures and failures into a report
//!
//! Jobs only ever point below the listing that produced them, so the job
//! graph is acyclic and no cycle detection is needed at runtime.

use crate::crawler::context::CrawlContext;
use crate::crawler::prober::{fetch_listing, probe_file};
use crate::crawler::signature::DirectorySignature;
use crate::model::{DirectoryRecord, FailureKind, File, Job, JobFailure, Report, Task};
use crate::state::JobState;
use crate::CrawlerError;
use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// What a successful job produced
#[derive(Debug)]
pub enum JobOutput {
    /// A listed directory and the children to enqueue
    Directory {
        file: File,
        signature: DirectorySignature,
        links: Vec<Url>,
    },

    /// A probed file
    File(File),
}

/// Result of processing one job on a worker
#[derive(Debug)]
pub struct JobResult {
    pub job: Job,

    /// `Expanding` or `Probed` on success, `Failed` otherwise
    pub state: JobState,

    pub outcome: Result<JobOutput, CrawlerError>,
}

/// Processes one job: lists a directory or probes a file
pub async fn process_job(ctx: &CrawlContext, job: Job) -> JobResult {
    let timeout = ctx.config.timeout();
    let fetching = JobState::Pending.transition(JobState::Fetching);
    tracing::debug!("Fetching {}", job.url);

    let result = match fetching {
        Ok(state) if job.is_dir() => fetch_listing(ctx.transport.as_ref(), &job, timeout)
            .await
            .and_then(|listing| {
                let signature = DirectorySignature::compute(&listing.file.name, &listing.links);
                let next = state.transition(JobState::Expanding)?;
                Ok((
                    next,
                    JobOutput::Directory {
                        file: listing.file,
                        signature,
                        links: listing.links,
                    },
                ))
            }),
        Ok(state) => probe_file(ctx.transport.as_ref(), &job, timeout)
            .await
            .and_then(|file| Ok((state.transition(JobState::Probed)?, JobOutput::File(file)))),
        Err(e) => Err(e),
    };

    match result {
        Ok((state, output)) => JobResult {
            job,
            state,
            outcome: Ok(output),
        },
        Err(e) => JobResult {
            job,
            state: JobState::Failed,
            outcome: Err(e),
        },
    }
}

/// Walks the directory tree of one task
pub struct TreeWalker {
    ctx: Arc<CrawlContext>,
    task: Task,
    root: Url,
}

impl TreeWalker {
    /// Creates a walker for `task`, rooted at the already parsed `root` URL
    pub fn new(ctx: Arc<CrawlContext>, task: Task, root: Url) -> Self {
        Self { ctx, task, root }
    }

    /// Crawls the whole subtree and returns the report
    ///
    /// Failed jobs are recorded and never abort the rest of the walk, so the
    /// report always holds everything that could be discovered.
    pub async fn run(self) -> Report {
        let mut report = Report::new(self.task.clone());
        let mut queue: VecDeque<Job> = VecDeque::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut in_flight: JoinSet<JobResult> = JoinSet::new();

        let root = Job::root(self.root.clone());
        seen.insert(root.url.to_string());
        queue.push_back(root);

        loop {
            // Hand every pending job to the pool; each waits for a free slot
            while let Some(job) = queue.pop_front() {
                let Some(slot) = self.ctx.pool.acquire().await else {
                    report.failures.push(JobFailure {
                        url: job.url.to_string(),
                        kind: FailureKind::Transport,
                        message: "worker pool closed".to_string(),
                    });
                    continue;
                };

                let ctx = Arc::clone(&self.ctx);
                in_flight.spawn(async move {
                    let _slot = slot;
                    process_job(&ctx, job).await
                });
            }

            match in_flight.join_next().await {
                Some(Ok(result)) => self.absorb(result, &mut report, &mut queue, &mut seen),
                Some(Err(e)) => tracing::error!("Worker for task {} panicked: {}", self.task.id, e),
                None => break,
            }
        }

        report.finished_at = Utc::now();
        report
    }

    /// Folds one job result into the report and enqueues its children
    fn absorb(
        &self,
        result: JobResult,
        report: &mut Report,
        queue: &mut VecDeque<Job>,
        seen: &mut HashSet<String>,
    ) {
        let JobResult { job, state, outcome } = result;

        let output = match outcome {
            Ok(output) => output,
            Err(e) => {
                let kind = e.failure_kind();
                if kind.is_retryable() {
                    tracing::warn!("Rate limited on {}", job.url);
                } else {
                    tracing::debug!("Job {} failed: {}", job.url, e);
                }
                report.failures.push(JobFailure {
                    url: job.url.to_string(),
                    kind,
                    message: e.to_string(),
                });
                return;
            }
        };

        match output {
            JobOutput::Directory {
                file,
                signature,
                links,
            } => {
                let mut enqueued = 0;
                for link in &links {
                    if seen.insert(link.to_string()) {
                        queue.push_back(job.child(link.clone()));
                        enqueued += 1;
                    }
                }
                tracing::trace!(
                    "Listed {}: {} links, {} new jobs",
                    job.url,
                    links.len(),
                    enqueued
                );

                report.directories.push(DirectoryRecord {
                    path: file.path.clone(),
                    name: file.name.clone(),
                    signature,
                    entries: links.len(),
                });
                if !job.is_root() {
                    report.files.push(file);
                }
            }
            JobOutput::File(file) => report.files.push(file),
        }

        if let Err(e) = state.transition(JobState::Done) {
            tracing::error!("Job {} ended in an unexpected state: {}", job.url, e);
        }
    }
}
