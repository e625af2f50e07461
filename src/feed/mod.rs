//! Fetching, parsing and normalizing individual feeds.
//!
//! - [`parser`]: RSS 2.0 / RSS 1.0 / Atom document parsing
//! - [`client`]: the [`FeedFetcher`] trait and its HTTP implementation
//!
//! [`fetch_feed`] is the per-feed unit of work. It never fails: network and
//! parse errors are captured in the returned [`FeedOutcome`] so that one bad
//! feed cannot abort the run.

pub mod client;
pub mod parser;

#[cfg(test)]
pub(crate) mod stub;

pub use client::{FeedFetcher, HttpFetcher};

use crate::aggregate::FeedOutcome;
use crate::models::NewsRecord;
use tracing::{debug, error, info, instrument, warn};

/// Fetch one feed, keep at most `limit` entries and normalize them.
///
/// A `limit` of `None` or `Some(0)` keeps every entry.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_feed<F: FeedFetcher>(
    fetcher: &F,
    url: &str,
    limit: Option<usize>,
) -> FeedOutcome {
    info!("Fetching feed");

    let result = fetcher.fetch(url).await.map(|mut entries| {
        if entries.is_empty() {
            warn!("Feed has no entries");
        }
        if let Some(limit) = limit.filter(|&n| n > 0) {
            if entries.len() > limit {
                debug!(limit, available = entries.len(), "Limiting entries");
                entries.truncate(limit);
            }
        }
        entries
            .into_iter()
            .map(NewsRecord::from_raw)
            .collect::<Vec<_>>()
    });

    match &result {
        Ok(records) => info!(count = records.len(), "Fetched feed entries"),
        Err(e) => error!(error = %e, "Feed fetch failed"),
    }

    FeedOutcome {
        url: url.to_string(),
        result,
    }
}
