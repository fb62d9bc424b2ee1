//! Turns raw watch entries into the list of video ids to look up.

use crate::api::youtube::VideoId;
use crate::io::WatchEntry;
use tracing::warn;

/// Inclusive start / optional end bound on entry timestamps.
///
/// Bounds are compared as strings; Takeout timestamps are zero-padded
/// ISO 8601, so lexical order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub start: String,
    pub end: Option<String>,
}

impl DateWindow {
    pub fn new(start: impl Into<String>, end: Option<String>) -> Self {
        Self {
            start: start.into(),
            end,
        }
    }

    pub fn contains(&self, time: &str) -> bool {
        if time < self.start.as_str() {
            return false;
        }
        match &self.end {
            Some(end) => time <= end.as_str(),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub video_ids: Vec<VideoId>,
    pub deleted_count: usize,
    pub skipped_count: usize,
}

/// Walk the history in order.
///
/// Entries without `titleUrl` count as deleted, entries outside the window
/// as skipped. An id of the wrong length is logged and dropped without
/// touching either counter.
pub fn extract_video_ids(entries: &[WatchEntry], window: &DateWindow) -> Extraction {
    let mut extraction = Extraction::default();

    for entry in entries {
        let Some(url) = entry.title_url.as_deref() else {
            extraction.deleted_count += 1;
            continue;
        };

        let time = entry.time.as_deref().unwrap_or("");
        if !window.contains(time) {
            extraction.skipped_count += 1;
            continue;
        }

        match VideoId::from_title_url(url) {
            Ok(id) => extraction.video_ids.push(id),
            Err(candidate) => warn!("Invalid video ID extracted: {}", candidate),
        }
    }

    extraction
}
