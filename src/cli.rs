//! Command-line interface definitions for the feed scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate
//! and turns them into a [`RunConfig`] and a log level.

use crate::config::{
    DEFAULT_CONCURRENCY, DEFAULT_DATA_DIR, DEFAULT_FEEDS_FILE, DEFAULT_TIMEOUT_SECS, RunConfig,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Command-line arguments for the feed scraper.
///
/// # Examples
///
/// ```sh
/// # Defaults: feed_urls.txt -> data/YYYY-MM-DD.json
/// feed_scraper
///
/// # Custom list and output directory
/// feed_scraper --feeds custom_feeds.txt --data-dir ./output
///
/// # At most 10 entries per feed, with detailed output
/// feed_scraper -f custom_feeds.txt -d ./output -l 10 -v
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to file containing feed URLs
    #[arg(short, long, default_value = DEFAULT_FEEDS_FILE)]
    pub feeds: PathBuf,

    /// Directory to store output files
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Limit the number of entries per feed (0 or absent: no limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Enable detailed logging to console
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging level
    #[arg(long, value_enum, ignore_case = true, default_value = "INFO")]
    pub log_level: LogLevel,

    /// HTTP timeout per feed, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of feeds to fetch at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

/// Severity threshold for log output, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing` has no level above `ERROR`, so `Critical` shares it.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error | Self::Critical => LevelFilter::ERROR,
        }
    }
}

impl Cli {
    /// `--verbose` overrides `--log-level` with `DEBUG`.
    pub fn level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else {
            self.log_level.level_filter()
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            feeds_path: self.feeds.clone(),
            data_dir: self.data_dir.clone(),
            limit: self.limit,
            timeout: Duration::from_secs(self.timeout),
            concurrency: self.concurrency.max(1),
            verbose: self.verbose,
        }
    }
}
