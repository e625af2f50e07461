//! Loading the list of feed URLs.
//!
//! The feed list is plain text with one URL per line. Blank lines and lines
//! starting with `#` are skipped; duplicates are kept.

use crate::error::{Result, ScraperError};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Read the feed list at `path`.
///
/// # Errors
///
/// Returns [`ScraperError::SourceUnavailable`] if the file is missing, is not
/// a regular file, or cannot be read.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_feed_urls(path: &Path) -> Result<Vec<String>> {
    let unavailable = |source| ScraperError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let meta = fs::metadata(path).await.map_err(unavailable)?;
    if !meta.is_file() {
        return Err(unavailable(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let text = fs::read_to_string(path).await.map_err(unavailable)?;
    let urls = parse_feed_list(&text);

    info!(count = urls.len(), "Loaded feed URLs");
    debug!(urls = ?urls, "Feed URLs");
    Ok(urls)
}

/// Extract feed URLs from the text of a feed list, in file order.
pub fn parse_feed_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
