use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for od-crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: Option<ServerConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Size of the process-wide worker pool shared by every running task
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Per-request timeout (milliseconds)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Interval between task acquisition attempts (milliseconds)
    #[serde(rename = "recheck-interval", default = "default_recheck_interval")]
    pub recheck_interval: u64,

    /// Delay after a failed task acquisition (milliseconds)
    #[serde(default = "default_cooldown")]
    pub cooldown: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn recheck_interval(&self) -> Duration {
        Duration::from_millis(self.recheck_interval)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout: default_timeout(),
            recheck_interval: default_recheck_interval(),
            cooldown: default_cooldown(),
            user_agent: default_user_agent(),
        }
    }
}

/// Local working directories
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding the local report store
    #[serde(rename = "crawled-dir", default = "default_crawled_dir")]
    pub crawled_dir: String,

    /// Directory holding queued task state
    #[serde(rename = "queue-dir", default = "default_queue_dir")]
    pub queue_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            crawled_dir: default_crawled_dir(),
            queue_dir: default_queue_dir(),
        }
    }
}

/// Remote task server connection
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the task API
    pub url: String,

    /// Access token sent with every API call
    #[serde(default)]
    pub token: String,
}

fn default_workers() -> u32 {
    4
}

fn default_timeout() -> u64 {
    10_000
}

fn default_recheck_interval() -> u64 {
    1_000
}

fn default_cooldown() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("od-crawler/{}", env!("CARGO_PKG_VERSION"))
}

fn default_crawled_dir() -> String {
    "crawled".to_string()
}

fn default_queue_dir() -> String {
    "queue".to_string()
}
