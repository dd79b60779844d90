use crate::config::types::{Config, CrawlerConfig, OutputConfig, ServerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    if let Some(server) = &config.server {
        validate_server_config(server)?;
    }
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 256 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 256, got {}",
            config.workers
        )));
    }

    if config.timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 100ms, got {}ms",
            config.timeout
        )));
    }

    if config.recheck_interval < 100 {
        return Err(ConfigError::Validation(format!(
            "recheck-interval must be >= 100ms, got {}ms",
            config.recheck_interval
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.crawled_dir.is_empty() {
        return Err(ConfigError::Validation(
            "crawled-dir cannot be empty".to_string(),
        ));
    }

    if config.queue_dir.is_empty() {
        return Err(ConfigError::Validation(
            "queue-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid server url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Server url '{}' must use http or https",
            config.url
        )));
    }

    Ok(())
}
