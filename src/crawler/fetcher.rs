//! HTTP transport
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the process-wide HTTP client
//! - The `Transport` seam used by workers (real client or test doubles)
//! - Separating transport failures from HTTP status outcomes

use crate::config::CrawlerConfig;
use crate::CrawlerError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Request methods used by the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    /// Full fetch of a directory listing
    Get,
    /// Metadata-only probe of a file
    Head,
}

/// Response returned by a transport
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Body text, only read for successful GET requests
    pub body: Option<String>,
}

impl FetchResponse {
    /// Returns a header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Capability to issue one HTTP request with a bounded timeout
///
/// Errors are transport-level only (DNS, connect, timeout, broken body).
/// HTTP status codes are returned as data and classified by the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(
        &self,
        url: &Url,
        method: FetchMethod,
        timeout: Duration,
    ) -> Result<FetchResponse, CrawlerError>;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed: a listing that redirects is reported with its
/// 3xx status instead of being crawled from an unexpected location.
///
/// # Example
///
/// ```no_run
/// use od_crawler::config::CrawlerConfig;
/// use od_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.timeout().min(Duration::from_secs(10)))
        .redirect(Policy::none())
        .build()
}

/// Transport backed by a shared `reqwest::Client`
///
/// The client owns the connection pool and is safe to use from every worker.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the transport from crawler settings
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        url: &Url,
        method: FetchMethod,
        timeout: Duration,
    ) -> Result<FetchResponse, CrawlerError> {
        let request = match method {
            FetchMethod::Get => self.client.get(url.clone()),
            FetchMethod::Head => self.client.head(url.clone()),
        };

        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| CrawlerError::from_transport(url.as_str(), e))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();

        // Bodies of failed or metadata-only requests are never needed
        let body = if method == FetchMethod::Get && status == 200 {
            let text = response
                .text()
                .await
                .map_err(|e| CrawlerError::from_transport(url.as_str(), e))?;
            Some(text)
        } else {
            None
        };

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}
