//! rank-crawler main entry point
//!
//! This is the command-line interface for the depth-bounded rank crawler.

use anyhow::Context;
use clap::Parser;
use rank_crawler::config::{load_config_with_hash, validate, Config};
use rank_crawler::crawler::run_crawl;
use rank_crawler::output::{
    print_statistics, write_records, CrawlStatistics, ErrorEntry, ErrorKind, ErrorLog, ErrorSink,
    OutputFormat,
};
use rank_crawler::CrawlError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// rank-crawler: crawl outward from a root URL and rank pages by domain locality
///
/// Every HTML page within the depth limit gets one row in `output.<format>`
/// with its depth and the share of its links that stay on its own hostname.
/// Failures are appended to the error log and never stop the crawl.
#[derive(Parser, Debug)]
#[command(name = "rank-crawler")]
#[command(version)]
#[command(about = "A depth-bounded web crawler ranking pages by domain locality", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "ROOT_URL")]
    root_url: String,

    /// Maximum link depth to follow (0 crawls only the root)
    #[arg(value_name = "DEPTH_LIMIT")]
    max_depth: u32,

    /// Output format: `csv` is comma-delimited, anything else tab-delimited
    #[arg(value_name = "OUTPUT_FORMAT", default_value = "csv")]
    format: String,

    /// Path to a TOML file tuning concurrency, delays, timeouts and paths
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory to write the output file to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path of the append-only error log
    #[arg(long, value_name = "FILE")]
    error_log: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let format = OutputFormat::parse(&cli.format).context("Invalid output format")?;
    let errors = Arc::new(ErrorLog::new(&config.output.error_log));

    handle_crawl(&cli.root_url, &config, &format, errors).await;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the start and completion banners.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rank_crawler=info,warn"),
            1 => EnvFilter::new("rank_crawler=debug,info"),
            2 => EnvFilter::new("rank_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the optional config file with the command-line arguments
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    config.crawler.max_depth = cli.max_depth;
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if let Some(log) = &cli.error_log {
        config.output.error_log = log.display().to_string();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the main crawl operation
///
/// Failures here are logged, not returned: a crawl that produced nothing
/// still writes a header-only output file.
async fn handle_crawl(
    root_url: &str,
    config: &Config,
    format: &OutputFormat,
    errors: Arc<ErrorLog>,
) {
    println!(
        "Starting crawl at {} with max depth {}",
        root_url, config.crawler.max_depth
    );
    tracing::info!(
        "Concurrency: {}, delay: {}ms, timeout: {}ms",
        config.crawler.max_concurrency,
        config.crawler.rate_limit_delay,
        config.crawler.request_timeout
    );
    let start_time = Instant::now();

    let records = match run_crawl(config, root_url, errors.clone()).await {
        Ok(records) => records,
        Err(e) => {
            report(&errors, &e);
            Vec::new()
        }
    };

    let output_path = match write_records(&records, format, Path::new(&config.output.directory))
    {
        Ok(path) => path,
        Err(e) => {
            report(&errors, &CrawlError::from(e));
            return;
        }
    };

    let stats = CrawlStatistics::from_records(&records, start_time.elapsed());
    print_statistics(&stats, &output_path);
}

fn report(errors: &ErrorLog, error: &CrawlError) {
    errors.record_error(&ErrorEntry::new(
        ErrorKind::CrawlError,
        "An error occurred during crawling",
        error,
    ));
}
