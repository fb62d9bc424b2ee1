pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod io;
pub mod utils;

// Re-export the main error types for convenience
pub use analytics::{CalculationError, ExportError};
pub use api::duration::DurationError;
pub use api::youtube::FetchError;
pub use config::ConfigError;
pub use io::HistoryError;

// Re-export the pipeline entry points
pub use analytics::{save_results, WatchTimeCalculator, WatchTimeStats};
pub use api::duration::parse_duration_secs;
pub use api::fetcher::MetadataFetcher;
pub use config::Config;
