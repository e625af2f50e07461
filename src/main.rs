//! # Feed Scraper
//!
//! Collects news-feed metadata for downstream consumption. Each run reads a
//! list of RSS/Atom feed URLs, fetches every feed, keeps four fields per entry
//! (title, link, publication date, summary) and saves them as one JSON array
//! named after the run date.
//!
//! ## Usage
//!
//! ```sh
//! feed_scraper
//! feed_scraper --feeds custom_feeds.txt --data-dir ./output
//! feed_scraper -f custom_feeds.txt -d ./output -l 10 -v
//! ```
//!
//! ## Architecture
//!
//! The application is a linear pipeline:
//! 1. **Loading**: Read feed URLs from the feed list
//! 2. **Fetching**: Download and parse each feed (failures isolated per feed)
//! 3. **Normalizing**: Map entries to four-field records with placeholders
//! 4. **Output**: Write `{data_dir}/{YYYY-MM-DD}.json`
//!
//! Scheduling is left to the caller (cron, systemd timers, ...).

use chrono::Local;
use clap::Parser;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod error;
mod feed;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod utils;

use cli::Cli;
use feed::HttpFetcher;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.level_filter());

    let start_time = std::time::Instant::now();
    info!("feed_scraper starting up");

    let config = args.run_config();
    debug!(?config, "Parsed CLI arguments");

    let fetcher = match HttpFetcher::new(config.timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let today = Local::now().date_naive();
    let report = match pipeline::run(&config, &fetcher, today).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    print!("{}", report.render(config.verbose));

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        entries = report.run.records.len(),
        failed_feeds = report.run.failures.len(),
        "Execution complete"
    );
    ExitCode::SUCCESS
}

/// Install the global `tracing` subscriber. Logs go to stderr so stdout
/// carries only the run report.
fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::default().add_directive(level.into());
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}
