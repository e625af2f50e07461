//! HTTP retrieval of feed documents.
//!
//! [`FeedFetcher`] is the seam between the pipeline and the network: the
//! binary uses [`HttpFetcher`], tests substitute canned documents.

use super::parser::parse_feed;
use crate::error::FeedError;
use crate::models::RawEntry;
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// User agent sent with every feed request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Retrieves one feed and returns its entries in document order.
pub trait FeedFetcher {
    /// Fetch and parse the feed at `url`. One attempt, no retries.
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError>;
}

/// Fetches feeds over HTTP(S) with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an already configured `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl FeedFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { status });
        }

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Downloaded feed document");

        parse_feed(&bytes).inspect_err(|e| {
            if matches!(e, FeedError::NotAFeed { .. }) {
                debug!(
                    preview = %truncate_for_log(&String::from_utf8_lossy(&bytes), 200),
                    "Response is not a feed"
                );
            }
        })
    }
}
