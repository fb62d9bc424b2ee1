//! Command line front end: argument parsing, prompting, result output.

pub mod args;
pub mod interactive;
pub mod report;

use crate::api::youtube::ApiKey;
use crate::config::{format_date_for_api, AppConfig, Config};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use args::Args;
pub use interactive::{find_history_files, interactive_setup, Prompter};
pub use report::print_results;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("YouTube API key is required. Use -k/--api-key or set YOUTUBE_API_KEY")]
    MissingApiKey,

    #[error("History file not found: '{0}'")]
    HistoryFileNotFound(String),

    #[error("Input closed before setup was complete")]
    InputClosed,

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to start a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: Config,
    pub output: Option<PathBuf>,
}

/// Build options from flags and the defaults file without asking anything.
pub fn resolve_non_interactive(args: &Args, defaults: &AppConfig) -> Result<RunOptions, CliError> {
    let api_key = args.api_key().ok_or(CliError::MissingApiKey)?;

    let config = Config::new(
        ApiKey::new(api_key.to_string()),
        args.history_file
            .clone()
            .unwrap_or_else(|| defaults.history_file.clone()),
    )
    .with_start_date(format_date_for_api(
        args.start_date().unwrap_or(defaults.start_date.as_str()),
    ))
    .with_end_date(Some(format_date_for_api(
        args.end_date().unwrap_or(defaults.end_date.as_str()),
    )))
    .with_max_duration(args.max_duration().unwrap_or(defaults.max_duration))
    .with_batch_size(args.batch_size().unwrap_or(defaults.batch_size))
    .with_api_url(defaults.api_url.clone())
    .with_rate_limit_delay(
        args.delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| defaults.rate_limit_delay()),
    );

    Ok(RunOptions {
        config,
        output: args.output.clone(),
    })
}
