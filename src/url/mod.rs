//! URL handling module for od-crawler
//!
//! This module provides path cleaning, task URL parsing with scheme support
//! checks, and the subtree scope rules that keep a crawl inside its root.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{
    clean_path, collapse_slashes, file_name, parse_crawl_argument, parse_task_url, relative_path,
};
pub use scope::{is_descendant, same_origin};

/// URL schemes the crawler knows how to walk
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Returns true if the scheme can be crawled
///
/// # Examples
///
/// ```
/// use od_crawler::url::is_supported_scheme;
///
/// assert!(is_supported_scheme("https"));
/// assert!(!is_supported_scheme("ftp"));
/// ```
pub fn is_supported_scheme(scheme: &str) -> bool {
    SUPPORTED_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
}
