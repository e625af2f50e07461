//! One end-to-end run: load the feed list, fetch every feed, merge the
//! records and write the dated JSON file.
//!
//! Only two failures stop a run: an unreadable feed list (before any fetch)
//! and an unwritable output file (after all fetching). Per-feed failures are
//! logged and reported but never propagate.

use crate::aggregate::{FeedOutcome, RunResult};
use crate::config::RunConfig;
use crate::error::Result;
use crate::feed::{FeedFetcher, fetch_feed};
use crate::outputs::json;
use crate::sources::load_feed_urls;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub run: RunResult,
}

impl RunReport {
    /// Console report printed at the end of a run.
    ///
    /// Verbose mode adds per-feed counts and the list of failed feeds.
    pub fn render(&self, verbose: bool) -> String {
        let mut lines = Vec::new();

        if verbose {
            for (url, count) in &self.run.fetched {
                lines.push(format!("Fetched {count} entries from {url}"));
            }
            if !self.run.failures.is_empty() {
                lines.push(String::new());
                lines.push("The following feeds could not be processed:".to_string());
                for failure in &self.run.failures {
                    lines.push(format!("  - {}: {}", failure.url, failure.reason));
                }
            }
        }

        let path = self.output_path.display();
        if self.run.records.is_empty() {
            lines.push("No entries found in any feeds.".to_string());
            lines.push(format!("Wrote empty entry list to {path}"));
        } else {
            lines.push(format!(
                "Successfully saved {} entries to {path}",
                self.run.records.len()
            ));
            lines.push(self.run.summary());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Execute one run, writing `{data_dir}/{date}.json`.
///
/// Feeds are fetched `config.concurrency` at a time; the merged records are
/// always in feed-list order.
///
/// # Errors
///
/// - [`ScraperError::SourceUnavailable`](crate::error::ScraperError::SourceUnavailable)
///   if the feed list cannot be read
/// - [`ScraperError::StorageWriteFailure`](crate::error::ScraperError::StorageWriteFailure)
///   if the output cannot be written
#[instrument(level = "info", skip_all, fields(feeds = %config.feeds_path.display()))]
pub async fn run<F: FeedFetcher>(
    config: &RunConfig,
    fetcher: &F,
    date: NaiveDate,
) -> Result<RunReport> {
    let urls = load_feed_urls(&config.feeds_path).await?;
    if urls.is_empty() {
        warn!("Feed list contains no URLs; writing an empty entry list");
    }

    let limit = config.entry_limit();
    let outcomes: Vec<FeedOutcome> = stream::iter(&urls)
        .map(|url| fetch_feed(fetcher, url, limit))
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    let run = RunResult::from_outcomes(outcomes);
    info!(
        feeds = urls.len(),
        succeeded = run.fetched.len(),
        failed = run.failures.len(),
        entries = run.records.len(),
        "Finished fetching feeds"
    );
    for failure in &run.failures {
        warn!(url = %failure.url, reason = %failure.reason, "Feed could not be processed");
    }

    let output_path = json::write_entries(&run.records, &config.data_dir, date).await?;
    Ok(RunReport { output_path, run })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScraperError;
    use crate::feed::stub::{StubFetcher, rss_with_items};
    use crate::models::NewsRecord;
    use std::path::Path;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 8).unwrap()
    }

    fn config_in(dir: &Path, feed_list: &str) -> RunConfig {
        let feeds_path = dir.join("feed_urls.txt");
        std::fs::write(&feeds_path, feed_list).unwrap();
        RunConfig {
            feeds_path,
            data_dir: dir.join("data"),
            ..Default::default()
        }
    }

    fn read_output(path: &Path) -> Vec<NewsRecord> {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn titles(records: &[NewsRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_full_aggregation_in_feed_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "https://a/rss\n# comment\n\nhttps://b/rss\n");
        let fetcher = StubFetcher::new()
            .with_feed("https://a/rss", &rss_with_items("a", 2))
            .with_feed("https://b/rss", &rss_with_items("b", 1));

        let report = run(&config, &fetcher, date()).await.unwrap();
        assert_eq!(report.output_path, dir.path().join("data").join("2025-05-08.json"));

        let written = read_output(&report.output_path);
        assert_eq!(titles(&written), vec!["a item 1", "a item 2", "b item 1"]);
        assert!(report.run.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failing_feed_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "https://a/rss\nhttps://down/rss\nhttps://b/rss\n");
        let fetcher = StubFetcher::new()
            .with_feed("https://a/rss", &rss_with_items("a", 1))
            .with_feed("https://b/rss", &rss_with_items("b", 1));

        let report = run(&config, &fetcher, date()).await.unwrap();
        let written = read_output(&report.output_path);
        assert_eq!(titles(&written), vec!["a item 1", "b item 1"]);
        assert_eq!(report.run.failures.len(), 1);
        assert_eq!(report.run.failures[0].url, "https://down/rss");
    }

    #[tokio::test]
    async fn test_all_feeds_fail_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "https://a/rss\nhttps://b/rss\n");
        let fetcher = StubFetcher::new().with_feed("https://b/rss", "not xml at all <");

        let report = run(&config, &fetcher, date()).await.unwrap();
        assert!(read_output(&report.output_path).is_empty());
        assert_eq!(report.run.failures.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_feed_list_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "# nothing yet\n");

        let report = run(&config, &StubFetcher::new(), date()).await.unwrap();
        assert!(read_output(&report.output_path).is_empty());
    }

    #[tokio::test]
    async fn test_limit_applies_per_feed() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), "https://a/rss\nhttps://b/rss\n");
        config.limit = Some(2);
        let fetcher = StubFetcher::new()
            .with_feed("https://a/rss", &rss_with_items("a", 5))
            .with_feed("https://b/rss", &rss_with_items("b", 1));

        let report = run(&config, &fetcher, date()).await.unwrap();
        assert_eq!(
            titles(&report.run.records),
            vec!["a item 1", "a item 2", "b item 1"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_fetch_keeps_feed_order() {
        let dir = tempfile::tempdir().unwrap();
        let urls: Vec<String> = (0..8).map(|i| format!("https://f{i}/rss")).collect();
        let mut config = config_in(dir.path(), &urls.join("\n"));
        config.concurrency = 4;

        let fetcher = urls.iter().enumerate().fold(StubFetcher::new(), |f, (i, url)| {
            f.with_feed(url, &rss_with_items(&format!("f{i}"), 1))
        });

        let report = run(&config, &fetcher, date()).await.unwrap();
        let expected: Vec<String> = (0..8).map(|i| format!("f{i} item 1")).collect();
        assert_eq!(titles(&report.run.records), expected);
    }

    #[tokio::test]
    async fn test_missing_feed_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            feeds_path: dir.path().join("missing.txt"),
            data_dir: dir.path().join("data"),
            ..Default::default()
        };

        let err = run(&config, &StubFetcher::new(), date()).await.unwrap_err();
        assert!(matches!(err, ScraperError::SourceUnavailable { .. }));
        assert!(!dir.path().join("data").exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), "https://a/rss\n");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        config.data_dir = blocker;
        let fetcher = StubFetcher::new().with_feed("https://a/rss", &rss_with_items("a", 1));

        let err = run(&config, &fetcher, date()).await.unwrap_err();
        assert!(matches!(err, ScraperError::StorageWriteFailure { .. }));
    }

    #[tokio::test]
    async fn test_rerun_overwrites_same_date() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "https://a/rss\n");

        let first = StubFetcher::new().with_feed("https://a/rss", &rss_with_items("a", 3));
        run(&config, &first, date()).await.unwrap();

        let second = StubFetcher::new().with_feed("https://a/rss", &rss_with_items("z", 1));
        let report = run(&config, &second, date()).await.unwrap();

        assert_eq!(titles(&read_output(&report.output_path)), vec!["z item 1"]);
    }

    #[test]
    fn test_render_report() {
        use crate::aggregate::FailedFeed;
        use crate::models::RawEntry;

        let mut run = RunResult::default();
        run.fetched.push(("https://a/rss".to_string(), 1));
        run.records.push(NewsRecord::from_raw(RawEntry {
            title: Some("t".to_string()),
            link: Some("https://a.example/1".to_string()),
            ..Default::default()
        }));
        run.failures.push(FailedFeed {
            url: "https://b/rss".to_string(),
            reason: "server responded with HTTP 404 Not Found".to_string(),
        });
        let report = RunReport {
            output_path: PathBuf::from("data/2025-05-08.json"),
            run,
        };

        assert_eq!(
            report.render(false),
            "Successfully saved 1 entries to data/2025-05-08.json\n\
             Found 1 entries from 1 source(s).\n"
        );

        assert_eq!(
            report.render(true),
            "Fetched 1 entries from https://a/rss\n\
             \n\
             The following feeds could not be processed:\n  \
             - https://b/rss: server responded with HTTP 404 Not Found\n\
             Successfully saved 1 entries to data/2025-05-08.json\n\
             Found 1 entries from 1 source(s).\n"
        );
    }

    #[test]
    fn test_render_empty_report() {
        let report = RunReport {
            output_path: PathBuf::from("data/2025-05-08.json"),
            run: RunResult::default(),
        };
        assert_eq!(
            report.render(false),
            "No entries found in any feeds.\n\
             Wrote empty entry list to data/2025-05-08.json\n"
        );
    }
}
