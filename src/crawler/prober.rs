//! Per-node requests: directory listings (GET) and file probes (HEAD)

use crate::crawler::fetcher::{FetchMethod, Transport};
use crate::crawler::parser::extract_links;
use crate::model::{File, Job};
use crate::state::check_status;
use crate::url::{clean_path, file_name, relative_path};
use crate::CrawlerError;
use reqwest::header::{CONTENT_LENGTH, LAST_MODIFIED};
use std::time::Duration;
use url::Url;

/// A fetched directory listing
#[derive(Debug, Clone)]
pub struct Listing {
    /// Record for the directory itself
    pub file: File,

    /// Child links that survived filtering, in listing order
    pub links: Vec<Url>,
}

/// Fetches a directory listing and extracts its child links
///
/// # Returns
///
/// * `Ok(Listing)` - The listing answered 200 and was parsed
/// * `Err(CrawlerError)` - Transport failure or non-200 status
pub async fn fetch_listing(
    transport: &dyn Transport,
    job: &Job,
    timeout: Duration,
) -> Result<Listing, CrawlerError> {
    let file = File::new(
        file_name(job.url.path()),
        relative_path(&job.root, &job.url),
        true,
    );

    let response = transport.fetch(&job.url, FetchMethod::Get, timeout).await?;
    check_status(response.status, job.url.as_str())?;

    let body = response.body.unwrap_or_default();
    let links = extract_links(&body, &job.url);

    Ok(Listing { file, links })
}

/// Probes a file with a HEAD request and records its metadata
///
/// Missing or unparseable `Content-Length` and `Last-Modified` headers leave
/// the corresponding fields unset; only transport and status errors fail.
pub async fn probe_file(
    transport: &dyn Transport,
    job: &Job,
    timeout: Duration,
) -> Result<File, CrawlerError> {
    let mut url = job.url.clone();
    let cleaned = clean_path(url.path());
    url.set_path(&cleaned);

    let mut file = File::new(file_name(&cleaned), relative_path(&job.root, &url), false);

    let response = transport.fetch(&url, FetchMethod::Head, timeout).await?;
    check_status(response.status, url.as_str())?;

    if let Some(value) = response.header(CONTENT_LENGTH.as_str()) {
        file.apply_content_length(value);
    }
    if let Some(value) = response.header(LAST_MODIFIED.as_str()) {
        file.apply_last_modified(value);
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchResponse;
    use async_trait::async_trait;
    use reqwest::header::{HeaderMap, HeaderValue};
    use std::sync::Mutex;

    /// Transport that answers every request with the same canned response
    struct CannedTransport {
        status: u16,
        headers: HeaderMap,
        body: Option<String>,
        requests: Mutex<Vec<(String, FetchMethod)>>,
    }

    impl CannedTransport {
        fn new(status: u16) -> Self {
            Self {
                status,
                headers: HeaderMap::new(),
                body: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
            self.headers.insert(name, HeaderValue::from_static(value));
            self
        }

        fn with_body(mut self, body: &str) -> Self {
            self.body = Some(body.to_string());
            self
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn fetch(
            &self,
            url: &Url,
            method: FetchMethod,
            _timeout: Duration,
        ) -> Result<FetchResponse, CrawlerError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), method));
            Ok(FetchResponse {
                status: self.status,
                headers: self.headers.clone(),
                body: self.body.clone(),
            })
        }
    }

    fn root_job() -> Job {
        Job::root(Url::parse("http://host/root/").unwrap())
    }

    #[tokio::test]
    async fn test_probe_file_reads_metadata() {
        let transport = CannedTransport::new(200)
            .with_header("content-length", "2048")
            .with_header("last-modified", "Mon, 02 Jan 2006 15:04:05 GMT");
        let job = root_job().child(Url::parse("http://host/root/iso//disk.img").unwrap());

        let file = probe_file(&transport, &job, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(file.name, "disk.img");
        assert_eq!(file.path, "iso/disk.img");
        assert!(!file.is_dir);
        assert_eq!(file.size, Some(2048));
        assert!(file.modified.is_some());

        let requests = transport.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            ("http://host/root/iso/disk.img".to_string(), FetchMethod::Head)
        );
    }

    #[tokio::test]
    async fn test_probe_file_tolerates_bad_headers() {
        let transport = CannedTransport::new(200)
            .with_header("content-length", "lots")
            .with_header("last-modified", "yesterday-ish");
        let job = root_job().child(Url::parse("http://host/root/a.txt").unwrap());

        let file = probe_file(&transport, &job, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(file.size, None);
        assert_eq!(file.modified, None);
    }

    #[tokio::test]
    async fn test_probe_file_status_failure() {
        let transport = CannedTransport::new(403);
        let job = root_job().child(Url::parse("http://host/root/secret").unwrap());

        let result = probe_file(&transport, &job, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(CrawlerError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_fetch_listing() {
        let transport = CannedTransport::new(200)
            .with_body(r#"<a href="../">..</a><a href="sub/">sub/</a><a href="f.txt">f.txt</a>"#);
        let job = root_job().child(Url::parse("http://host/root/dir/").unwrap());

        let listing = fetch_listing(&transport, &job, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(listing.file.name, "dir");
        assert_eq!(listing.file.path, "dir");
        assert!(listing.file.is_dir);
        assert_eq!(listing.links.len(), 2);
        assert_eq!(listing.links[0].as_str(), "http://host/root/dir/sub/");

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].1, FetchMethod::Get);
    }

    #[tokio::test]
    async fn test_fetch_listing_rate_limited() {
        let transport = CannedTransport::new(429);
        let result = fetch_listing(&transport, &root_job(), Duration::from_secs(1)).await;
        assert!(matches!(result, Err(CrawlerError::RateLimited { .. })));
    }
}
