//! Statistics of a finished crawl
//!
//! This module provides functionality for summarizing a report and
//! displaying the summary at the end of a single crawl.

use crate::model::{FailureKind, Report};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Root URL of the crawl
    pub url: String,

    /// Number of regular files found
    pub files: usize,

    /// Number of subdirectories found
    pub directories: usize,

    /// Sum of all known file sizes
    pub total_size: u64,

    /// Files without a reported size
    pub unknown_sizes: usize,

    /// Failed jobs by kind
    pub failures_by_kind: HashMap<FailureKind, u64>,

    /// Failed jobs that may succeed later
    pub retryable: usize,

    /// Elapsed wall time in seconds
    pub duration_seconds: f64,
}

impl CrawlStatistics {
    /// Summarizes a finished report
    pub fn from_report(report: &Report) -> Self {
        let mut failures_by_kind = HashMap::new();
        for failure in &report.failures {
            *failures_by_kind.entry(failure.kind).or_insert(0) += 1;
        }

        Self {
            url: report.task.url.clone(),
            files: report.file_count(),
            directories: report.dir_count(),
            total_size: report.total_size(),
            unknown_sizes: report
                .files
                .iter()
                .filter(|f| !f.is_dir && f.size.is_none())
                .count(),
            failures_by_kind,
            retryable: report.retryable_failures().count(),
            duration_seconds: report.duration().num_milliseconds() as f64 / 1000.0,
        }
    }

    pub fn total_failures(&self) -> u64 {
        self.failures_by_kind.values().sum()
    }
}

/// Formats a byte count with a binary unit suffix
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Root: {}", stats.url);
    println!("  Files: {}", stats.files);
    println!("  Directories: {}", stats.directories);
    println!(
        "  Total size: {} ({} files without size)",
        format_size(stats.total_size),
        stats.unknown_sizes
    );
    println!("  Duration: {:.1}s", stats.duration_seconds);
    println!();

    if !stats.failures_by_kind.is_empty() {
        println!("Failures:");
        let mut counts: Vec<_> = stats.failures_by_kind.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    if stats.retryable > 0 {
        println!(
            "{} job(s) were rate limited and may succeed on a later crawl",
            stats.retryable
        );
    }
}
