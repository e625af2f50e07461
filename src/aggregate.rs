//! Merging per-feed outcomes into the result of a run.
//!
//! Records are concatenated in feed-list order, then entry order within each
//! feed. Nothing is deduplicated, sorted or filtered. Failed feeds add no
//! records and are kept aside for reporting.

use crate::error::FeedError;
use crate::models::NewsRecord;
use crate::utils::source_domain;
use std::collections::HashSet;

/// Result of processing a single feed URL.
#[derive(Debug)]
pub struct FeedOutcome {
    pub url: String,
    pub result: Result<Vec<NewsRecord>, FeedError>,
}

/// A feed that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFeed {
    pub url: String,
    pub reason: String,
}

/// All records gathered in one run.
#[derive(Debug, Default)]
pub struct RunResult {
    pub records: Vec<NewsRecord>,
    /// Entries kept per successfully fetched feed, in feed-list order.
    pub fetched: Vec<(String, usize)>,
    pub failures: Vec<FailedFeed>,
}

impl RunResult {
    /// Merge outcomes, which must already be in feed-list order.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = FeedOutcome>) -> Self {
        let mut run = Self::default();
        for outcome in outcomes {
            run.push(outcome);
        }
        run
    }

    pub fn push(&mut self, outcome: FeedOutcome) {
        match outcome.result {
            Ok(records) => {
                self.fetched.push((outcome.url, records.len()));
                self.records.extend(records);
            }
            Err(e) => self.failures.push(FailedFeed {
                url: outcome.url,
                reason: e.to_string(),
            }),
        }
    }

    /// Number of distinct hosts among the record links.
    pub fn source_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.has_link())
            .filter_map(|r| source_domain(&r.link))
            .collect::<HashSet<_>>()
            .len()
    }

    /// One-line description such as `Found 12 entries from 2 source(s).`
    pub fn summary(&self) -> String {
        if self.records.is_empty() {
            return "No entries found.".to_string();
        }
        format!(
            "Found {} entries from {} source(s).",
            self.records.len(),
            self.source_count()
        )
    }
}
