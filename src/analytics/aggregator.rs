//! Watch time aggregation: load, extract, fetch in batches, sum.

use super::extractor::{extract_video_ids, Extraction};
use crate::api::fetcher::MetadataFetcher;
use crate::api::rate_limit::{Clock, TokioClock};
use crate::api::youtube::{VideoLookup, YoutubeDataApi};
use crate::config::{Config, ConfigError};
use crate::io::{load_watch_history, HistoryError, WatchEntry};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SECONDS_IN_YEAR: u64 = 31_536_000;
pub const SECONDS_IN_MONTH: u64 = 2_592_000;
pub const SECONDS_IN_DAY: u64 = 86_400;
pub const SECONDS_IN_HOUR: u64 = 3600;
pub const SECONDS_IN_MINUTE: u64 = 60;

/// Failures that abort a run
#[derive(Error, Debug)]
pub enum CalculationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WatchTimeStats {
    pub total_seconds: u64,
    /// Every entry in the history file, valid or not
    pub total_videos: usize,
    pub deleted_videos: usize,
    pub skipped_videos: usize,
}

/// Total watch time expressed in several units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBreakdown {
    pub seconds: f64,
    pub minutes: f64,
    pub hours: f64,
    pub days: f64,
    pub months: f64,
    pub years: f64,
    pub formatted: String,
}

impl WatchTimeStats {
    /// `total - deleted - skipped`. Entries dropped for a malformed id are
    /// still counted here.
    pub fn processed_videos(&self) -> usize {
        self.total_videos
            .saturating_sub(self.deleted_videos)
            .saturating_sub(self.skipped_videos)
    }

    pub fn format_time(&self) -> TimeBreakdown {
        let seconds = self.total_seconds as f64;
        TimeBreakdown {
            seconds,
            minutes: seconds / SECONDS_IN_MINUTE as f64,
            hours: seconds / SECONDS_IN_HOUR as f64,
            days: seconds / SECONDS_IN_DAY as f64,
            months: seconds / SECONDS_IN_MONTH as f64,
            years: seconds / SECONDS_IN_YEAR as f64,
            formatted: format_duration(self.total_seconds),
        }
    }
}

/// `H:MM:SS`, prefixed with `N day(s), ` once past 24 hours.
pub fn format_duration(total_seconds: u64) -> String {
    let days = total_seconds / SECONDS_IN_DAY;
    let rest = total_seconds % SECONDS_IN_DAY;
    let clock = format!(
        "{}:{:02}:{:02}",
        rest / SECONDS_IN_HOUR,
        rest % SECONDS_IN_HOUR / SECONDS_IN_MINUTE,
        rest % SECONDS_IN_MINUTE
    );

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

pub struct WatchTimeCalculator<L, C = TokioClock> {
    config: Config,
    fetcher: MetadataFetcher<L, C>,
}

impl WatchTimeCalculator<YoutubeDataApi, TokioClock> {
    /// Validate `config` and set up the real API client.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let api = YoutubeDataApi::new(config.api_url.clone(), config.api_key.clone())
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::from_parts(config, api, TokioClock))
    }
}

impl<L: VideoLookup, C: Clock> WatchTimeCalculator<L, C> {
    /// Validate `config` and use the given lookup and clock.
    pub fn with_lookup(config: Config, lookup: L, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, lookup, clock))
    }

    fn from_parts(config: Config, lookup: L, clock: C) -> Self {
        let fetcher = MetadataFetcher::with_clock(
            lookup,
            clock,
            config.rate_limit_delay,
            config.max_duration,
        );
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured history file and aggregate it.
    pub async fn calculate_watch_time(&mut self) -> Result<WatchTimeStats, CalculationError> {
        let entries = load_watch_history(&self.config.history_file)?;
        Ok(self.aggregate(&entries).await)
    }

    pub async fn aggregate(&mut self, entries: &[WatchEntry]) -> WatchTimeStats {
        let Extraction {
            video_ids,
            deleted_count,
            skipped_count,
        } = extract_video_ids(entries, &self.config.date_window());

        info!("Extracted {} valid video IDs", video_ids.len());
        info!(
            "Deleted videos: {}, Skipped videos: {}",
            deleted_count, skipped_count
        );

        let mut stats = WatchTimeStats {
            total_seconds: 0,
            total_videos: entries.len(),
            deleted_videos: deleted_count,
            skipped_videos: skipped_count,
        };

        if video_ids.is_empty() {
            warn!("No valid video IDs found");
            return stats;
        }

        let batch_size = self.config.batch_size.max(1);
        let batch_count = video_ids.len().div_ceil(batch_size);
        let mut processed_videos = 0;

        for (index, batch) in video_ids.chunks(batch_size).enumerate() {
            let durations = self.fetcher.fetch_video_durations(batch).await;
            debug!(
                batch = index + 1,
                of = batch_count,
                requested = batch.len(),
                returned = durations.len(),
                "Processed batch"
            );
            stats.total_seconds = durations
                .iter()
                .fold(stats.total_seconds, |total, d| total.saturating_add(*d));
            processed_videos += durations.len();
        }

        info!("Processed {} videos successfully", processed_videos);
        stats
    }
}
