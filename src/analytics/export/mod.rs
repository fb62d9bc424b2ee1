use super::aggregator::{TimeBreakdown, WatchTimeStats};
use crate::config::Config;
use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

pub mod json_exporter;

pub use json_exporter::{save_results, JsonExporter};

/// エクスポートエラー
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File access error: {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 保存される結果ファイル全体
#[derive(Debug, Clone, Serialize)]
pub struct ResultsDocument {
    pub timestamp: String,
    pub time_stats: TimeBreakdown,
    pub video_stats: VideoStats,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoStats {
    pub total_videos: usize,
    pub deleted_videos: usize,
    pub skipped_videos: usize,
    pub processed_videos: usize,
}

/// 実行時に有効だったパラメータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameters {
    pub start_date: String,
    pub end_date: String,
    pub max_duration: u64,
    pub batch_size: usize,
    pub history_file: String,
}

impl ResultsDocument {
    pub fn new(stats: &WatchTimeStats, config: &Config, generated_at: DateTime<Local>) -> Self {
        Self {
            timestamp: generated_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            time_stats: stats.format_time(),
            video_stats: VideoStats {
                total_videos: stats.total_videos,
                deleted_videos: stats.deleted_videos,
                skipped_videos: stats.skipped_videos,
                processed_videos: stats.processed_videos(),
            },
            parameters: Parameters {
                start_date: config.start_date.clone(),
                end_date: config.end_date.clone().unwrap_or_default(),
                max_duration: config.max_duration,
                batch_size: config.batch_size,
                history_file: config.history_file.display().to_string(),
            },
        }
    }
}
