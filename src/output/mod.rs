//! Output module for crawl summaries
//!
//! This module handles:
//! - Summarizing finished reports
//! - Printing crawl statistics

pub mod stats;

pub use stats::{format_size, print_statistics, CrawlStatistics};
