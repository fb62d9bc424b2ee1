//! Google Takeout `watch-history.json` loading.
//!
//! The export is a single JSON array. Only `time` and `titleUrl` matter
//! here; every other field (`header`, `subtitles`, `products`, ...) is
//! ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

/// Error types for reading the watch history export.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// I/O error when reading the file
    #[error("Error reading history file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON, or not an array of objects
    #[error("Invalid JSON in watch history file at line {line}, column {column}: {source}")]
    JsonParse {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for HistoryError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonParse {
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// One watch event.
///
/// A missing `titleUrl` means the video was removed or made private after it
/// was watched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl WatchEntry {
    pub fn new(title_url: Option<&str>, time: Option<&str>) -> Self {
        Self {
            title: None,
            title_url: title_url.map(str::to_string),
            time: time.map(str::to_string),
        }
    }
}

/// Parse watch history JSON held in memory.
pub fn parse_watch_history(content: &str) -> Result<Vec<WatchEntry>, HistoryError> {
    Ok(serde_json::from_str(content)?)
}

/// Read and parse the whole history file.
pub fn load_watch_history(path: impl AsRef<Path>) -> Result<Vec<WatchEntry>, HistoryError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| {
        error!("Error reading history file: {}", source);
        HistoryError::Io {
            path: path.display().to_string(),
            source,
        }
    })?;

    let entries = parse_watch_history(&content).inspect_err(|e| {
        error!("Invalid JSON in watch history file: {}", e);
    })?;

    info!("Loaded {} entries from history file", entries.len());
    Ok(entries)
}
