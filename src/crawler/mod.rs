//! Crawler module for open-directory traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport and per-node requests
//! - Directory listing link extraction
//! - Per-task tree walking on a shared worker pool
//! - Task orchestration and shutdown

mod context;
mod coordinator;
mod fetcher;
mod parser;
mod prober;
mod scheduler;
mod shutdown;
mod signature;

pub use context::{CrawlContext, WorkerPool};
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchMethod, FetchResponse, HttpTransport, Transport};
pub use parser::{extract_links, resolve_link, LinkRejection};
pub use prober::{fetch_listing, probe_file, Listing};
pub use scheduler::{process_job, JobOutput, JobResult, TreeWalker};
pub use shutdown::{sleep_or_cancel, Shutdown, FORCED_EXIT_CODE};
pub use signature::{DirectorySignature, SIGNATURE_LEN};
