//! 設定ファイル管理
//!
//! XDGディレクトリ上の `config.toml` からデフォルト値を読み込みます。
//! ファイルが無い場合は組み込みのデフォルトを使用します。

use super::{
    ConfigError, DEFAULT_BATCH_SIZE, DEFAULT_HISTORY_FILE, DEFAULT_MAX_DURATION,
    DEFAULT_RATE_LIMIT_DELAY, DEFAULT_START_DATE,
};
use crate::api::youtube::VIDEOS_ENDPOINT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// `config.toml` の内容。全項目省略可能
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history_file: PathBuf,
    pub start_date: String,
    /// 空文字列は終了日なし
    pub end_date: String,
    pub max_duration: u64,
    pub batch_size: usize,
    pub rate_limit_delay_ms: u64,
    pub api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: String::new(),
            max_duration: DEFAULT_MAX_DURATION,
            batch_size: DEFAULT_BATCH_SIZE,
            rate_limit_delay_ms: DEFAULT_RATE_LIMIT_DELAY.as_millis() as u64,
            api_url: VIDEOS_ENDPOINT.to_string(),
        }
    }
}

impl AppConfig {
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }
}

/// 設定管理マネージャー
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// XDGディレクトリの設定ファイルを使用
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// 明示的なパスを使用
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("dev", "sifyfy", "watchtime")?;
        let config_file = project_dirs.config_dir().join("config.toml");

        debug!("Config file path: {}", config_file.display());

        Some(config_file)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 設定を読み込み
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let Some(path) = self.config_path.as_deref() else {
            debug!("No config directory available, using default settings");
            return Ok(AppConfig::default());
        };

        if !path.exists() {
            debug!(
                "Config file not found, using default settings: {}",
                path.display()
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadConfigFile {
            path: path.display().to_string(),
            source,
        })?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ParseConfigFile {
                path: path.display().to_string(),
                source,
            })?;

        info!("Configuration loaded from: {}", path.display());

        Ok(config)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
