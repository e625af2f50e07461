//! Data models for feed entries and their normalized representation.
//!
//! - [`RawEntry`]: the fields pulled out of one `<item>`/`<entry>`, each optional
//! - [`NewsRecord`]: the canonical four-field record written to disk
//!
//! Normalization never fails: a missing or blank field is replaced with its
//! placeholder string, so every [`NewsRecord`] carries all four fields.

use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No title";
pub const NO_LINK: &str = "No link";
pub const NO_DATE: &str = "No date";
pub const NO_SUMMARY: &str = "No summary";

/// One feed entry as extracted by the parser.
///
/// Values are the element text with surrounding whitespace trimmed. The
/// publication date is kept exactly as the feed wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
}

/// A normalized news entry.
///
/// Field order here is the key order in the output JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsRecord {
    pub title: String,
    pub link: String,
    /// Feed-supplied date text, not reparsed.
    pub published: String,
    pub summary: String,
}

impl NewsRecord {
    /// Map a [`RawEntry`] onto the four output fields, substituting
    /// placeholders for absent or empty values.
    pub fn from_raw(raw: RawEntry) -> Self {
        Self {
            title: or_placeholder(raw.title, NO_TITLE),
            link: or_placeholder(raw.link, NO_LINK),
            published: or_placeholder(raw.published, NO_DATE),
            summary: or_placeholder(raw.summary, NO_SUMMARY),
        }
    }

    /// Whether `link` holds a real value rather than the placeholder.
    pub fn has_link(&self) -> bool {
        self.link != NO_LINK
    }
}

impl From<RawEntry> for NewsRecord {
    fn from(raw: RawEntry) -> Self {
        Self::from_raw(raw)
    }
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder.to_string(),
    }
}
