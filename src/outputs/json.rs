//! JSON output for a run.
//!
//! One file per day, named after the run date:
//! ```text
//! data_dir/
//! ├── 2025-05-07.json
//! └── 2025-05-08.json
//! ```
//!
//! Re-running on the same day replaces that day's file.

use crate::error::{Result, ScraperError};
use crate::models::NewsRecord;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

const INDENT: &[u8] = b"    ";

/// File name for a run on `date`, e.g. `2025-05-08.json`.
pub fn output_filename(date: NaiveDate) -> String {
    format!("{}.json", date.format("%Y-%m-%d"))
}

/// Serialize records as an indented JSON array. Non-ASCII text is written
/// as UTF-8, not escaped.
pub fn to_pretty_json(records: &[NewsRecord]) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut ser)?;
    Ok(out)
}

/// Write `records` to `{data_dir}/{date}.json`, creating `data_dir` if needed.
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns [`ScraperError::StorageWriteFailure`] if the directory cannot be
/// created or the file cannot be written.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display(), %date))]
pub async fn write_entries(
    records: &[NewsRecord],
    data_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)
        .await
        .map_err(|source| ScraperError::StorageWriteFailure {
            path: data_dir.to_path_buf(),
            source,
        })?;
    debug!("Output directory ready");

    let path = data_dir.join(output_filename(date));
    let json = to_pretty_json(records)?;
    debug!(bytes = json.len(), path = %path.display(), "Writing JSON");

    fs::write(&path, json)
        .await
        .map_err(|source| ScraperError::StorageWriteFailure {
            path: path.clone(),
            source,
        })?;

    info!(count = records.len(), path = %path.display(), "Saved entries");
    Ok(path)
}
