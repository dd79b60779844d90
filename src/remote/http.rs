//! Task source backed by the coordination server's HTTP API

use crate::config::{CrawlerConfig, ServerConfig};
use crate::crawler::build_http_client;
use crate::model::{DirectoryRecord, File, JobFailure, Report, Task};
use crate::remote::TaskSource;
use crate::{ConfigError, CrawlerError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Report upload payload
#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    token: &'a str,
    website_id: i64,
    files: &'a [File],
    directories: &'a [DirectoryRecord],
    failures: &'a [JobFailure],
}

/// Pulls tasks from `POST {url}/task/get` and pushes reports to
/// `POST {url}/task/upload`
///
/// Both calls are bounded by the crawler's request timeout.
#[derive(Debug, Clone)]
pub struct HttpTaskSource {
    client: Client,
    base_url: Url,
    token: String,
    timeout: Duration,
}

impl HttpTaskSource {
    pub fn new(client: Client, base_url: Url, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            token: token.into(),
            timeout,
        }
    }

    /// Builds a source from the `[server]` section
    pub fn from_config(
        server: &ServerConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, CrawlerError> {
        let base_url = Url::parse(&server.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", server.url, e)))?;
        let client = build_http_client(crawler)?;
        Ok(Self::new(
            client,
            base_url,
            server.token.clone(),
            crawler.timeout(),
        ))
    }

    /// Resolves an API endpoint below the base URL
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl TaskSource for HttpTaskSource {
    async fn fetch_task(&self) -> Result<Option<Task>, CrawlerError> {
        let url = self.endpoint("task/get");
        let response = self
            .client
            .post(&url)
            .form(&[("token", self.token.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CrawlerError::from_transport(&url, e))?;

        match response.status() {
            StatusCode::OK => {
                let task = response
                    .json::<Task>()
                    .await
                    .map_err(|e| CrawlerError::TaskSource(format!("Malformed task: {}", e)))?;
                Ok(Some(task))
            }
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status => Err(CrawlerError::TaskSource(format!(
                "Task request answered with HTTP {}",
                status.as_u16()
            ))),
        }
    }

    async fn submit_report(&self, task: &Task, report: &Report) -> Result<(), CrawlerError> {
        let url = self.endpoint("task/upload");
        let body = UploadBody {
            token: &self.token,
            website_id: task.id,
            files: &report.files,
            directories: &report.directories,
            failures: &report.failures,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CrawlerError::from_transport(&url, e))?;

        if !response.status().is_success() {
            return Err(CrawlerError::TaskSource(format!(
                "Upload of task {} answered with HTTP {}",
                task.id,
                response.status().as_u16()
            )));
        }

        tracing::debug!("Uploaded report of task {}", task.id);
        Ok(())
    }
}
