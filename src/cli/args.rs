//! コマンドライン引数

use crate::config::API_KEY_ENV;
use clap::Parser;
use std::path::PathBuf;

/// Calculate total watch time from YouTube watch history
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "watchtime", version, about)]
pub struct Args {
    /// YouTube Data API v3 key
    #[arg(short = 'k', long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to the watch history JSON file
    #[arg(short = 'f', long)]
    pub history_file: Option<PathBuf>,

    /// Start date, YYYY-MM-DD or ISO 8601 (YYYY-MM-DDTHH:MM:SSZ)
    #[arg(short = 's', long)]
    pub start_date: Option<String>,

    /// End date, YYYY-MM-DD or ISO 8601 (YYYY-MM-DDTHH:MM:SSZ)
    #[arg(short = 'e', long)]
    pub end_date: Option<String>,

    /// Maximum duration of a video in seconds (caps long videos)
    #[arg(short = 'd', long)]
    pub max_duration: Option<u64>,

    /// Number of videos per API request (1-50)
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// Save results to a JSON file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Disable interactive prompts (use defaults for missing arguments)
    #[arg(long)]
    pub no_interactive: bool,

    /// Minimum delay between API calls in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Read defaults from this TOML file instead of the user config directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// The API key, treating an empty value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Zero means "not given", matching the interactive prompt.
    pub fn max_duration(&self) -> Option<u64> {
        self.max_duration.filter(|d| *d > 0)
    }

    pub fn batch_size(&self) -> Option<usize> {
        self.batch_size.filter(|b| *b > 0)
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref().filter(|d| !d.is_empty())
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref().filter(|d| !d.is_empty())
    }
}
