//! Error types for the scraper.
//!
//! Two families of errors exist:
//! - [`ScraperError`]: fatal to the run (feed list unreadable, output not writable)
//! - [`FeedError`]: scoped to a single feed; recorded and reported, never fatal

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the run.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// The feed list could not be opened or read.
    #[error("feed list {path:?} is unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory or file could not be written.
    #[error("failed to write output {path:?}: {source}")]
    StorageWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why a single feed contributed no records.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with HTTP {status}")]
    Status { status: reqwest::StatusCode },

    #[error("failed to parse feed: {0}")]
    Parse(String),

    #[error("document is not an RSS or Atom feed (root element <{root}>)")]
    NotAFeed { root: String },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
