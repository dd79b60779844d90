//! Integration tests for the crawler
//!
//! These tests use wiremock to serve open-directory listings and run the
//! full crawl cycle end-to-end over real HTTP.

use async_trait::async_trait;
use od_crawler::config::CrawlerConfig;
use od_crawler::crawler::{CrawlContext, Coordinator};
use od_crawler::model::{FailureKind, Report};
use od_crawler::remote::TaskSource;
use od_crawler::storage::{SqliteStorage, Storage};
use od_crawler::{CrawlerError, Task};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_coordinator(workers: u32) -> Coordinator {
    let config = CrawlerConfig {
        workers,
        timeout: 2_000,
        recheck_interval: 20,
        ..CrawlerConfig::default()
    };
    let ctx = CrawlContext::from_config(config).expect("Failed to build context");
    Coordinator::new(Arc::new(ctx))
}

fn listing(hrefs: &[&str]) -> String {
    let rows: String = hrefs
        .iter()
        .map(|h| format!("<a href=\"{}\">{}</a>\n", h, h))
        .collect();
    format!(
        "<html><head><title>Index</title></head><body><pre>{}</pre></body></html>",
        rows
    )
}

async fn mount_dir(server: &MockServer, dir: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path(dir))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(hrefs)))
        .mount(server)
        .await;
}

async fn mount_file(server: &MockServer, file: &str, size: u64) {
    Mock::given(method("HEAD"))
        .and(path(file))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", size.to_string().as_str())
                .insert_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
        )
        .mount(server)
        .await;
}

fn sorted_paths(report: &Report) -> Vec<String> {
    let mut paths: Vec<String> = report.files.iter().map(|f| f.path.clone()).collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_full_tree_crawl() {
    let server = MockServer::start().await;
    mount_dir(
        &server,
        "/pub/",
        &["?C=N;O=D", "../", "/", "iso/", "README", "/icons/blank.gif"],
    )
    .await;
    mount_dir(&server, "/pub/iso/", &["../", "debian.iso", "#top"]).await;
    mount_file(&server, "/pub/README", 120).await;
    mount_file(&server, "/pub/iso/debian.iso", 4096).await;

    let report = create_coordinator(4)
        .crawl_one(Task::new(0, format!("{}/pub", server.uri())))
        .await
        .unwrap();

    assert_eq!(sorted_paths(&report), vec!["README", "iso", "iso/debian.iso"]);
    assert_eq!(report.total_size(), 4216);
    assert_eq!(report.file_count(), 2);
    assert_eq!(report.dir_count(), 1);
    assert_eq!(report.directories.len(), 2);
    assert!(report.failures.is_empty());

    let iso = report
        .files
        .iter()
        .find(|f| f.name == "debian.iso")
        .unwrap();
    assert!(iso.modified.is_some());
}

#[tokio::test]
async fn test_forbidden_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let report = create_coordinator(2)
        .crawl_one(Task::new(0, format!("{}/private/", server.uri())))
        .await
        .unwrap();

    assert!(report.files.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FailureKind::Forbidden);
}

#[tokio::test]
async fn test_partial_failure_is_preserved() {
    let server = MockServer::start().await;
    mount_dir(&server, "/data/", &["good/", "broken/", "busy.bin"]).await;
    mount_dir(&server, "/data/good/", &["a.txt"]).await;
    mount_file(&server, "/data/good/a.txt", 1).await;
    Mock::given(method("GET"))
        .and(path("/data/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/data/busy.bin"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let report = create_coordinator(2)
        .crawl_one(Task::new(0, format!("{}/data/", server.uri())))
        .await
        .unwrap();

    assert_eq!(sorted_paths(&report), vec!["good", "good/a.txt"]);
    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .any(|f| f.kind == FailureKind::Status(500)));
    assert_eq!(report.retryable_failures().count(), 1);
}

#[tokio::test]
async fn test_self_linking_listing_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing(&["./", "/loop/", "/loop/#x"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = create_coordinator(2)
        .crawl_one(Task::new(0, format!("{}/loop/", server.uri())))
        .await
        .unwrap();

    assert!(report.files.is_empty());
    assert_eq!(report.directories[0].entries, 0);
}

#[tokio::test]
async fn test_timeout_recorded_as_transport_failure() {
    let server = MockServer::start().await;
    mount_dir(&server, "/t/", &["slow.bin"]).await;
    Mock::given(method("HEAD"))
        .and(path("/t/slow.bin"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let report = create_coordinator(2)
        .crawl_one(Task::new(0, format!("{}/t/", server.uri())))
        .await
        .unwrap();

    assert!(report.files.is_empty());
    assert_eq!(report.failures[0].kind, FailureKind::Transport);
}

#[tokio::test]
async fn test_worker_pool_is_shared_between_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(&[]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let coordinator = create_coordinator(1);
    let start = Instant::now();
    let (a, b) = tokio::join!(
        coordinator.crawl_one(Task::new(1, format!("{}/a/", server.uri()))),
        coordinator.crawl_one(Task::new(2, format!("{}/b/", server.uri()))),
    );

    assert!(a.is_ok() && b.is_ok());
    assert!(start.elapsed() >= Duration::from_millis(400));
}

/// Task source serving a fixed list of tasks and recording submissions
#[derive(Default)]
struct RecordingSource {
    tasks: Mutex<Vec<Task>>,
    reports: Mutex<Vec<(i64, usize)>>,
}

#[async_trait]
impl TaskSource for RecordingSource {
    async fn fetch_task(&self) -> Result<Option<Task>, CrawlerError> {
        Ok(self.tasks.lock().unwrap().pop())
    }

    async fn submit_report(&self, task: &Task, report: &Report) -> Result<(), CrawlerError> {
        self.reports
            .lock()
            .unwrap()
            .push((task.id, report.files.len()));
        Ok(())
    }
}

#[tokio::test]
async fn test_soft_shutdown_drains_running_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(&["f"]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_file(&server, "/slow/f", 9).await;

    let source = Arc::new(RecordingSource::default());
    source
        .tasks
        .lock()
        .unwrap()
        .push(Task::new(5, format!("{}/slow/", server.uri())));

    let shutdown = CancellationToken::new();
    let stopper = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        stopper.cancel();
    });

    let coordinator = create_coordinator(2);
    coordinator
        .run_server(source.clone() as Arc<dyn TaskSource>, shutdown)
        .await;

    // The task was running when the signal fired and still got reported
    assert_eq!(*source.reports.lock().unwrap(), vec![(5, 1)]);
    assert_eq!(coordinator.context().active_tasks(), 0);
}

#[tokio::test]
async fn test_report_round_trips_through_storage() {
    let server = MockServer::start().await;
    mount_dir(&server, "/s/", &["x.bin", "y/"]).await;
    mount_dir(&server, "/s/y/", &[]).await;
    mount_file(&server, "/s/x.bin", 77).await;

    let report = create_coordinator(2)
        .crawl_one(Task::new(9, format!("{}/s/", server.uri())))
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("reports.db")).unwrap();
    let id = storage.save_report(&report).unwrap();

    assert_eq!(storage.count_files(id).unwrap(), 2);
    let files = storage.load_files(id).unwrap();
    assert_eq!(files[0].path, "x.bin");
    assert_eq!(files[0].size, Some(77));
    assert_eq!(files[1].path, "y");
    assert_eq!(storage.latest_task().unwrap().unwrap().task_id, 9);
}
