//! In-memory [`FeedFetcher`] for tests.

use super::client::FeedFetcher;
use super::parser::parse_feed;
use crate::error::FeedError;
use crate::models::RawEntry;
use std::collections::HashMap;

/// Serves canned documents by URL. Unknown URLs fail with a 404.
#[derive(Debug, Default)]
pub struct StubFetcher {
    documents: HashMap<String, String>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, xml: &str) -> Self {
        self.documents.insert(url.to_string(), xml.to_string());
        self
    }
}

impl FeedFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError> {
        match self.documents.get(url) {
            Some(xml) => parse_feed(xml.as_bytes()),
            None => Err(FeedError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }
}

/// An RSS 2.0 document with `count` items titled `"{prefix} item {n}"`.
pub fn rss_with_items(prefix: &str, count: usize) -> String {
    let items: String = (1..=count)
        .map(|n| {
            format!(
                "<item><title>{prefix} item {n}</title>\
                 <link>https://{prefix}.example/{n}</link>\
                 <pubDate>Thu, 08 May 2025 0{}:00:00 GMT</pubDate>\
                 <description>Story {n}</description></item>",
                n % 10
            )
        })
        .collect();
    format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>{prefix}</title>{items}</channel></rss>"#)
}
