//! od-crawler main entry point
//!
//! This is the command-line interface for the open-directory crawler.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use od_crawler::config::{compute_config_hash, load_or_default, Config};
use od_crawler::crawler::{CrawlContext, Coordinator, Shutdown};
use od_crawler::output::{print_statistics, CrawlStatistics};
use od_crawler::remote::{HttpTaskSource, TaskSource};
use od_crawler::storage::{database_path, open_storage, Storage};
use od_crawler::url::parse_crawl_argument;
use od_crawler::Task;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// od-crawler: an open-directory harvesting agent
///
/// Crawls web servers that expose raw file listings and reports every file
/// found with its size and modification time.
#[derive(Parser, Debug)]
#[command(name = "od-crawler")]
#[command(version)]
#[command(about = "Open-directory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "od-crawler.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take tasks from the configured server until interrupted
    Server,

    /// Crawl a single URL and print its statistics
    Crawl {
        /// Root URL of the open directory
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli.config)?;
    prepare_directories(&config)?;

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown.clone().listen_for_interrupts());
    tokio::spawn(shutdown.clone().exit_on_hard_shutdown());

    let ctx = Arc::new(
        CrawlContext::from_config(config.crawler.clone())
            .context("Failed to build HTTP client")?,
    );
    let coordinator = Coordinator::new(ctx);

    match cli.command {
        Command::Server => handle_server(&config, &coordinator, &shutdown).await,
        Command::Crawl { url } => handle_crawl(&config, &coordinator, &url).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("od_crawler=info,warn"),
            1 => EnvFilter::new("od_crawler=debug,info"),
            2 => EnvFilter::new("od_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, falling back to defaults when it is absent
fn load_configuration(path: &Path) -> anyhow::Result<Config> {
    let config = load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if path.exists() {
        let hash = compute_config_hash(path)?;
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    } else {
        tracing::info!("No configuration at {}, using defaults", path.display());
    }

    Ok(config)
}

/// Creates the local working directories
fn prepare_directories(config: &Config) -> anyhow::Result<()> {
    for dir in [&config.output.crawled_dir, &config.output.queue_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir))?;
    }
    Ok(())
}

/// Handles the server mode: pull tasks until a soft shutdown
async fn handle_server(
    config: &Config,
    coordinator: &Coordinator,
    shutdown: &Shutdown,
) -> anyhow::Result<()> {
    let Some(server) = &config.server else {
        bail!("Server mode requires a [server] section in the configuration");
    };

    let source: Arc<dyn TaskSource> =
        Arc::new(HttpTaskSource::from_config(server, &config.crawler)?);

    tracing::info!(
        "Starting server mode against {} with {} workers",
        server.url,
        config.crawler.workers
    );
    coordinator.run_server(source, shutdown.soft()).await;

    Ok(())
}

/// Handles the crawl mode: one task, stored locally, statistics printed
async fn handle_crawl(config: &Config, coordinator: &Coordinator, url: &str) -> anyhow::Result<()> {
    let root = parse_crawl_argument(url).with_context(|| format!("Invalid URL {}", url))?;

    let report = coordinator.crawl_one(Task::new(0, root.as_str())).await?;

    let path = database_path(Path::new(&config.output.crawled_dir));
    let mut storage = open_storage(&path)
        .with_context(|| format!("Failed to open report store {}", path.display()))?;
    let id = storage.save_report(&report)?;
    tracing::info!("Report stored in {} as task {}", path.display(), id);

    print_statistics(&CrawlStatistics::from_report(&report));

    Ok(())
}
