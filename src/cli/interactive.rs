//! 対話式セットアップ
//!
//! Asks for whatever the command line left out. Input and output are
//! generic so the whole dialogue can be driven from tests.

use super::args::Args;
use super::{CliError, RunOptions};
use crate::api::youtube::ApiKey;
use crate::config::{
    format_date_for_api, validate_date_format, AppConfig, Config, DEFAULT_START_DATE,
    MAX_BATCH_SIZE, UNCAPPED_MAX_DURATION,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names Google Takeout and common tooling use for the export
pub const COMMON_HISTORY_NAMES: [&str; 6] = [
    "watch-history.json",
    "watch_history.json",
    "youtube-history.json",
    "youtube_history.json",
    "takeout-history.json",
    "my-watch-history.json",
];

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: &str) -> Result<(), CliError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Print `question` and return the trimmed answer.
    pub fn ask(&mut self, question: &str) -> Result<String, CliError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Candidate history files in `dir`: well-known names first, then any other
/// `*.json` with "history" in its name.
pub fn find_history_files(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = COMMON_HISTORY_NAMES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.exists())
        .collect();

    let pattern = dir.join("*.json");
    let Some(pattern) = pattern.to_str() else {
        return found;
    };

    let mut others: Vec<PathBuf> = match glob::glob(pattern) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.to_lowercase().contains("history"))
            })
            .filter(|path| {
                !found
                    .iter()
                    .any(|known| known.file_name() == path.file_name())
            })
            .collect(),
        Err(e) => {
            debug!("Invalid glob pattern {}: {}", pattern, e);
            Vec::new()
        }
    };
    others.sort();
    found.extend(others);
    found
}

/// Fill in every missing option by asking the user.
pub fn interactive_setup<R: BufRead, W: Write>(
    args: &Args,
    defaults: &AppConfig,
    search_dir: &Path,
    prompter: &mut Prompter<R, W>,
) -> Result<RunOptions, CliError> {
    prompter.say("watchtime - YouTube Watch Time Calculator")?;
    prompter.say(&"=".repeat(40))?;
    prompter.say("Let's set up your analysis parameters!\n")?;

    let api_key = match args.api_key() {
        Some(key) => key.to_string(),
        None => ask_api_key(prompter)?,
    };

    let history_file = match &args.history_file {
        Some(path) => path.clone(),
        None => ask_history_file(search_dir, prompter)?,
    };

    let start_date = match args.start_date() {
        Some(date) => format_date_for_api(date),
        None => ask_start_date(defaults, prompter)?,
    };

    let end_date = match args.end_date() {
        Some(date) => format_date_for_api(date),
        None => ask_end_date(prompter)?,
    };

    let max_duration = match args.max_duration() {
        Some(max) => max,
        None => ask_max_duration(defaults, prompter)?,
    };

    let batch_size = match args.batch_size() {
        Some(size) => size,
        None => ask_batch_size(defaults, prompter)?,
    };

    let output = match &args.output {
        Some(path) => Some(path.clone()),
        None => ask_output(prompter)?,
    };

    prompter.say("\nConfiguration complete! Starting analysis...\n")?;

    let config = Config::new(ApiKey::new(api_key), history_file)
        .with_start_date(start_date)
        .with_end_date(Some(end_date))
        .with_max_duration(max_duration)
        .with_batch_size(batch_size)
        .with_api_url(defaults.api_url.clone())
        .with_rate_limit_delay(
            args.delay_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(|| defaults.rate_limit_delay()),
        );

    Ok(RunOptions { config, output })
}

fn ask_api_key<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<String, CliError> {
    prompter.say("First, you'll need a YouTube Data API v3 key.")?;
    prompter.say("   Get one at: https://console.cloud.google.com/")?;
    prompter.say("   (Enable YouTube Data API v3 and create an API key)")?;

    let key = prompter.ask("\nPlease enter your YouTube Data API v3 key: ")?;
    if key.is_empty() {
        return Err(CliError::MissingApiKey);
    }
    Ok(key)
}

fn ask_history_file<R: BufRead, W: Write>(
    search_dir: &Path,
    prompter: &mut Prompter<R, W>,
) -> Result<PathBuf, CliError> {
    prompter.say("\nNow please provide the path to your YouTube watch history file.")?;
    prompter.say("   (Download from Google Takeout -> YouTube -> watch-history.json)")?;

    let found = find_history_files(search_dir);

    if found.is_empty() {
        let answer = prompter.ask("Enter path to your watch-history.json file: ")?;
        let path = PathBuf::from(&answer);
        if answer.is_empty() || !path.exists() {
            return Err(CliError::HistoryFileNotFound(answer));
        }
        return Ok(path);
    }

    prompter.say(&format!(
        "\n   Found {} potential history file(s) in the current directory:",
        found.len()
    ))?;
    for (i, file) in found.iter().enumerate() {
        prompter.say(&format!("   {}. {}", i + 1, file.display()))?;
    }
    let custom = found.len() + 1;
    prompter.say(&format!("   {}. Enter custom path", custom))?;

    loop {
        let choice = prompter.ask(&format!("\nChoose an option (1-{}): ", custom))?;
        if choice.is_empty() {
            continue;
        }

        match choice.parse::<usize>() {
            Ok(n) if (1..custom).contains(&n) => return Ok(found[n - 1].clone()),
            Ok(n) if n == custom => {
                let answer = prompter.ask("Enter path to your history file: ")?;
                let path = PathBuf::from(&answer);
                if !answer.is_empty() && path.exists() {
                    return Ok(path);
                }
                prompter.say("File not found. Please try again.")?;
            }
            Ok(_) => prompter.say(&format!("Please enter a number between 1 and {}", custom))?,
            Err(_) => prompter.say("Please enter a valid number")?,
        }
    }
}

fn ask_start_date<R: BufRead, W: Write>(
    defaults: &AppConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<String, CliError> {
    prompter.say("\nAdd a date range for counting your watch time?")?;
    let answer = prompter.ask(
        "Enter start date (YYYY-MM-DD) or press Enter to start from the beginning: ",
    )?;

    let fallback = if defaults.start_date.is_empty() {
        DEFAULT_START_DATE.to_string()
    } else {
        defaults.start_date.clone()
    };

    if answer.is_empty() {
        return Ok(fallback);
    }
    if !validate_date_format(&answer) {
        prompter.say("Invalid date format. Using default (all time).")?;
        return Ok(fallback);
    }
    Ok(format_date_for_api(&answer))
}

fn ask_end_date<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<String, CliError> {
    let answer =
        prompter.ask("Enter end date (YYYY-MM-DD) or press Enter to use today's date: ")?;

    if answer.is_empty() {
        return Ok(String::new());
    }
    if !validate_date_format(&answer) {
        prompter.say("Invalid date format. Skipping end date filter.")?;
        return Ok(String::new());
    }
    Ok(format_date_for_api(&answer))
}

fn ask_max_duration<R: BufRead, W: Write>(
    defaults: &AppConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<u64, CliError> {
    prompter.say(
        "\nSetting a maximum video duration helps focus on shorter content and prevents livestreams from skewing results.",
    )?;

    loop {
        let answer = prompter.ask(&format!(
            "Enter maximum video duration in seconds or press Enter for default (default: {}): ",
            defaults.max_duration
        ))?;

        if answer.is_empty() {
            return Ok(defaults.max_duration);
        }

        match answer.parse::<i64>() {
            Ok(n) if n < 0 => prompter.say("Duration must be positive. Try again.")?,
            Ok(0) => return Ok(UNCAPPED_MAX_DURATION),
            Ok(n) => return Ok(n as u64),
            Err(_) => prompter.say("Please enter a valid number.")?,
        }
    }
}

fn ask_batch_size<R: BufRead, W: Write>(
    defaults: &AppConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<usize, CliError> {
    prompter.say("\nAPI batch size affects processing speed vs reliability.")?;
    prompter.say("   Larger = faster but more likely to hit rate limits")?;

    loop {
        let answer = prompter.ask(&format!(
            "Enter batch size or press Enter for default (default: {}, range: 1-{}): ",
            defaults.batch_size, MAX_BATCH_SIZE
        ))?;

        if answer.is_empty() {
            return Ok(defaults.batch_size);
        }

        match answer.parse::<usize>() {
            Ok(n) if (1..=MAX_BATCH_SIZE).contains(&n) => return Ok(n),
            Ok(_) => prompter.say(&format!(
                "Batch size must be between 1 and {}.",
                MAX_BATCH_SIZE
            ))?,
            Err(_) => prompter.say("Please enter a valid number.")?,
        }
    }
}

fn ask_output<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Option<PathBuf>, CliError> {
    prompter.say("\nWould you like to save the results to a file?")?;
    let answer =
        prompter.ask("Enter filename (e.g., 'my_results.json') or press Enter to skip: ")?;
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}
