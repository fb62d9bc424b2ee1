//! Run configuration.
//!
//! [`Config`] is assembled once (CLI flags, prompts, then the defaults file)
//! and is not changed afterwards.

pub mod file;

use crate::analytics::DateWindow;
use crate::api::youtube::{ApiKey, VIDEOS_ENDPOINT};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use file::{AppConfig, ConfigManager};

pub const DEFAULT_START_DATE: &str = "2000-01-01T00:00:00Z";
pub const DEFAULT_HISTORY_FILE: &str = "watch-history.json";
pub const DEFAULT_MAX_DURATION: u64 = 5400;
pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_millis(100);
/// Upper bound imposed by the Data API on ids per `videos` request
pub const MAX_BATCH_SIZE: usize = 50;
/// Cap used when the user asks for no cap at all
pub const UNCAPPED_MAX_DURATION: u64 = 999_999;
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Valid YouTube API key is required")]
    MissingApiKey,

    #[error("API key is still the placeholder 'YOUR_API_KEY'")]
    PlaceholderApiKey,

    #[error("History file not found: {}", .0.display())]
    HistoryFileNotFound(PathBuf),

    #[error("Invalid start date format: '{0}'. Use ISO 8601 format (e.g., '2000-01-01T00:00:00Z')")]
    InvalidStartDate(String),

    #[error("Invalid end date format: '{0}'. Use ISO 8601 format (e.g., '2024-12-31T23:59:59Z')")]
    InvalidEndDate(String),

    #[error("Batch size must be between 1 and 50, got {0}")]
    InvalidBatchSize(usize),

    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to read config file {path}: {source}")]
    ReadConfigFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseConfigFile {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub history_file: PathBuf,
    /// Inclusive lower bound, ISO 8601
    pub start_date: String,
    /// Upper bound, ISO 8601; entries later than this are skipped
    pub end_date: Option<String>,
    /// Per-video cap in seconds
    pub max_duration: u64,
    pub batch_size: usize,
    pub api_url: String,
    pub rate_limit_delay: Duration,
}

impl Config {
    pub fn new(api_key: ApiKey, history_file: impl Into<PathBuf>) -> Self {
        Self {
            api_key,
            history_file: history_file.into(),
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: None,
            max_duration: DEFAULT_MAX_DURATION,
            batch_size: DEFAULT_BATCH_SIZE,
            api_url: VIDEOS_ENDPOINT.to_string(),
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY,
        }
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self
    }

    /// An empty string clears the end date.
    pub fn with_end_date(mut self, end_date: Option<String>) -> Self {
        self.end_date = end_date.filter(|d| !d.is_empty());
        self
    }

    pub fn with_max_duration(mut self, max_duration: u64) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn date_window(&self) -> DateWindow {
        DateWindow::new(self.start_date.clone(), self.end_date.clone())
    }

    /// Checks run before any processing starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_blank() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.api_key.as_str() == PLACEHOLDER_API_KEY {
            return Err(ConfigError::PlaceholderApiKey);
        }
        if !self.history_file.exists() {
            return Err(ConfigError::HistoryFileNotFound(self.history_file.clone()));
        }
        if !is_iso_date(&self.start_date) {
            return Err(ConfigError::InvalidStartDate(self.start_date.clone()));
        }
        if let Some(end) = &self.end_date {
            if !is_iso_date(end) {
                return Err(ConfigError::InvalidEndDate(end.clone()));
            }
        }
        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.f]`.
pub fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Validation for user input: empty means "use the default".
pub fn validate_date_format(value: &str) -> bool {
    value.is_empty() || is_iso_date(value)
}

/// Expand a bare `YYYY-MM-DD` to midnight UTC so it compares lexically
/// against Takeout timestamps.
pub fn format_date_for_api(value: &str) -> String {
    if value.is_empty() || value.contains('T') {
        return value.to_string();
    }
    if value.len() == 10 {
        return format!("{}T00:00:00Z", value);
    }
    value.to_string()
}
