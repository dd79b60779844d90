//! Configuration module for od-crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the defaults.
//!
//! # Example
//!
//! ```no_run
//! use od_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, ServerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_or_default};
pub use validation::validate;
