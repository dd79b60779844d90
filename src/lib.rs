//! od-crawler: an open-directory harvesting agent
//!
//! This crate crawls web servers that expose raw file/folder listings,
//! rebuilds their tree structure and reports every file found (path, size,
//! last-modified time) together with directory membership and signatures.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod remote;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rate limited by {url}")]
    RateLimited { url: String },

    #[error("Access forbidden for {url}")]
    Forbidden { url: String },

    #[error("Got HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Task source error: {0}")]
    TaskSource(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::JobState,
        to: state::JobState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlerError {
    /// Builds a transport error, separating timeouts from other failures
    pub fn from_transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Maps a job error onto the failure kind recorded in a report
    pub fn failure_kind(&self) -> model::FailureKind {
        match self {
            Self::RateLimited { .. } => model::FailureKind::RateLimited,
            Self::Forbidden { .. } => model::FailureKind::Forbidden,
            Self::HttpStatus { status, .. } => model::FailureKind::Status(*status),
            _ => model::FailureKind::Transport,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{File, Job, Report, Task};
pub use state::{JobState, StatusClass};
pub use url::{clean_path, parse_task_url};
