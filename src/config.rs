//! Run configuration.
//!
//! [`RunConfig`] is built once from the command line and handed to the
//! pipeline; no component reads process-wide settings on its own.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FEEDS_FILE: &str = "feed_urls.txt";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Text file with one feed URL per line.
    pub feeds_path: PathBuf,
    /// Directory receiving the dated JSON file.
    pub data_dir: PathBuf,
    /// Per-feed entry cap; `None` or `Some(0)` keeps everything.
    pub limit: Option<usize>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Feeds fetched at once. Output order does not depend on it.
    pub concurrency: usize,
    /// Print per-feed counts and failures after the run.
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            feeds_path: PathBuf::from(DEFAULT_FEEDS_FILE),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            limit: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// The effective entry cap, with zero meaning unbounded.
    pub fn entry_limit(&self) -> Option<usize> {
        self.limit.filter(|&n| n > 0)
    }
}
