//! End-to-end pipeline tests against an in-memory API.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use watchtime::{
    api::rate_limit::Clock,
    api::youtube::{
        ApiKey, ContentDetails, FetchError, VideoId, VideoItem, VideoListResponse, VideoLookup,
    },
    CalculationError, Config, ConfigError, HistoryError, WatchTimeCalculator, WatchTimeStats,
};

/// Answers from a fixed id → duration table and records every request.
#[derive(Default)]
struct CatalogLookup {
    durations: HashMap<String, String>,
    failing_calls: Vec<usize>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl CatalogLookup {
    fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            durations: entries
                .iter()
                .map(|(id, d)| (id.to_string(), d.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    fn failing_on(mut self, calls: &[usize]) -> Self {
        self.failing_calls = calls.to_vec();
        self
    }
}

#[async_trait]
impl VideoLookup for CatalogLookup {
    async fn lookup(&self, ids: &[VideoId]) -> Result<VideoListResponse, FetchError> {
        let call_index = {
            let mut calls = self.calls.lock();
            calls.push(ids.iter().map(|id| id.0.clone()).collect());
            calls.len() - 1
        };

        if self.failing_calls.contains(&call_index) {
            return Err(FetchError::Api {
                code: 403,
                message: "quotaExceeded".to_string(),
            });
        }

        let items = ids
            .iter()
            .filter_map(|id| {
                self.durations.get(&id.0).map(|d| VideoItem {
                    id: Some(id.0.clone()),
                    content_details: Some(ContentDetails {
                        duration: Some(d.clone()),
                    }),
                })
            })
            .collect();

        Ok(VideoListResponse { items, error: None })
    }
}

/// Frozen clock: sleeping returns at once and is only recorded.
struct RecordingClock {
    start: Instant,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for RecordingClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            sleeps: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Clock for RecordingClock {
    fn now(&self) -> Instant {
        self.start
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}

fn history_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn config_for(file: &NamedTempFile) -> Config {
    Config::new(ApiKey::new("test-key".to_string()), file.path())
        .with_start_date("2024-01-01T00:00:00Z")
        .with_rate_limit_delay(Duration::ZERO)
}

fn video_id(n: usize) -> String {
    format!("vid{:08}", n)
}

fn history_of(count: usize) -> String {
    let entries: Vec<String> = (0..count)
        .map(|n| {
            format!(
                r#"{{"titleUrl": "https://www.youtube.com/watch?v={}", "time": "2024-05-01T00:00:00Z"}}"#,
                video_id(n)
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}

async fn run(
    config: Config,
    lookup: Arc<CatalogLookup>,
) -> Result<WatchTimeStats, CalculationError> {
    let mut calculator =
        WatchTimeCalculator::with_lookup(config, lookup, RecordingClock::default())?;
    calculator.calculate_watch_time().await
}

#[tokio::test]
async fn test_three_entry_history() {
    let file = history_file(
        r#"[
            {"title": "Watched a video that has been removed", "time": "2024-03-01T10:00:00Z"},
            {"titleUrl": "https://www.youtube.com/watch?v=oldoldoldol", "time": "2023-06-01T10:00:00Z"},
            {"titleUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ", "time": "2024-03-02T10:00:00Z"}
        ]"#,
    );
    let lookup = Arc::new(CatalogLookup::with(&[
        ("dQw4w9WgXcQ", "PT30M"),
        ("oldoldoldol", "PT10M"),
    ]));

    let stats = run(config_for(&file).with_max_duration(5400), lookup.clone())
        .await
        .unwrap();

    assert_eq!(
        stats,
        WatchTimeStats {
            total_seconds: 1800,
            total_videos: 3,
            deleted_videos: 1,
            skipped_videos: 1,
        }
    );
    assert_eq!(stats.processed_videos(), 1);
    assert_eq!(*lookup.calls.lock(), vec![vec!["dQw4w9WgXcQ".to_string()]]);
}

#[tokio::test]
async fn test_long_videos_are_capped() {
    let file = history_file(&history_of(2));
    let lookup = Arc::new(CatalogLookup::with(&[
        (video_id(0).as_str(), "PT5H"),
        (video_id(1).as_str(), "PT20M"),
    ]));

    let stats = run(config_for(&file).with_max_duration(3600), lookup)
        .await
        .unwrap();

    assert_eq!(stats.total_seconds, 3600 + 1200);
}

#[tokio::test]
async fn test_batch_invariant() {
    for (count, batch_size) in [(1, 50), (50, 50), (51, 50), (7, 3), (10, 1), (120, 25)] {
        let file = history_file(&history_of(count));
        let lookup = Arc::new(CatalogLookup::default());

        run(config_for(&file).with_batch_size(batch_size), lookup.clone())
            .await
            .unwrap();

        let calls = lookup.calls.lock();
        assert_eq!(calls.len(), count.div_ceil(batch_size), "{} / {}", count, batch_size);
        assert!(calls.iter().all(|batch| batch.len() <= batch_size));
        assert!(calls.iter().all(|batch| !batch.is_empty()));

        let sent: Vec<String> = calls.iter().flatten().cloned().collect();
        let expected: Vec<String> = (0..count).map(video_id).collect();
        assert_eq!(sent, expected);
    }
}

#[tokio::test]
async fn test_no_identifiers_skips_fetching() {
    let file = history_file(
        r#"[
            {"time": "2024-03-01T10:00:00Z"},
            {"titleUrl": "https://www.youtube.com/watch?v=tooshort", "time": "2024-03-01T10:00:00Z"}
        ]"#,
    );
    let lookup = Arc::new(CatalogLookup::default());

    let stats = run(config_for(&file), lookup.clone()).await.unwrap();

    assert_eq!(
        stats,
        WatchTimeStats {
            total_seconds: 0,
            total_videos: 2,
            deleted_videos: 1,
            skipped_videos: 0,
        }
    );
    // the malformed id still counts as processed
    assert_eq!(stats.processed_videos(), 1);
    assert!(lookup.calls.lock().is_empty());
}

#[tokio::test]
async fn test_failed_batch_contributes_zero() {
    let file = history_file(&history_of(6));
    let catalog: Vec<(String, &str)> = (0..6).map(|n| (video_id(n), "PT1M")).collect();
    let catalog: Vec<(&str, &str)> = catalog.iter().map(|(id, d)| (id.as_str(), *d)).collect();
    let lookup = Arc::new(CatalogLookup::with(&catalog).failing_on(&[1]));

    let stats = run(config_for(&file).with_batch_size(2), lookup.clone())
        .await
        .unwrap();

    assert_eq!(lookup.calls.lock().len(), 3);
    assert_eq!(stats.total_seconds, 4 * 60);
}

#[tokio::test]
async fn test_total_saturates_instead_of_overflowing() {
    let file = history_file(&history_of(2));
    let longest = format!("PT{}S", u64::MAX);
    let lookup = Arc::new(CatalogLookup::with(&[
        (video_id(0).as_str(), longest.as_str()),
        (video_id(1).as_str(), longest.as_str()),
    ]));

    let stats = run(config_for(&file).with_max_duration(u64::MAX), lookup)
        .await
        .unwrap();

    assert_eq!(stats.total_seconds, u64::MAX);
}

#[tokio::test]
async fn test_unknown_videos_are_dropped() {
    let file = history_file(&history_of(3));
    let lookup = Arc::new(CatalogLookup::with(&[(video_id(1).as_str(), "PT2M")]));

    let stats = run(config_for(&file), lookup).await.unwrap();

    assert_eq!(stats.total_seconds, 120);
    assert_eq!(stats.processed_videos(), 3);
}

#[tokio::test]
async fn test_end_date_filter() {
    let file = history_file(
        r#"[
            {"titleUrl": "https://www.youtube.com/watch?v=aaaaaaaaaaa", "time": "2024-02-10T00:00:00Z"},
            {"titleUrl": "https://www.youtube.com/watch?v=bbbbbbbbbbb", "time": "2024-03-10T00:00:00Z"}
        ]"#,
    );
    let lookup = Arc::new(CatalogLookup::with(&[
        ("aaaaaaaaaaa", "PT1H"),
        ("bbbbbbbbbbb", "PT1H"),
    ]));
    let config = config_for(&file).with_end_date(Some("2024-03-01T00:00:00Z".to_string()));

    let stats = run(config, lookup).await.unwrap();

    assert_eq!(stats.total_seconds, 3600);
    assert_eq!(stats.skipped_videos, 1);
}

#[test]
fn test_repeated_runs_are_identical() {
    let file = history_file(&history_of(9));
    let catalog: Vec<(String, String)> = (0..9)
        .map(|n| (video_id(n), format!("PT{}M{}S", n, n * 3)))
        .collect();
    let catalog: Vec<(&str, &str)> = catalog
        .iter()
        .map(|(id, d)| (id.as_str(), d.as_str()))
        .collect();
    let lookup = Arc::new(CatalogLookup::with(&catalog));

    let first =
        tokio_test::block_on(run(config_for(&file).with_batch_size(4), lookup.clone())).unwrap();
    let second = tokio_test::block_on(run(config_for(&file).with_batch_size(4), lookup)).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_batches_are_rate_limited() {
    let file = history_file(&history_of(5));
    let clock = Arc::new(RecordingClock::default());
    let config = config_for(&file)
        .with_batch_size(2)
        .with_rate_limit_delay(Duration::from_millis(100));
    let mut calculator =
        WatchTimeCalculator::with_lookup(config, Arc::new(CatalogLookup::default()), clock.clone())
            .unwrap();

    calculator.calculate_watch_time().await.unwrap();

    assert_eq!(
        *clock.sleeps.lock(),
        vec![Duration::from_millis(100), Duration::from_millis(100)]
    );
}

#[tokio::test]
async fn test_malformed_json_is_fatal() {
    let file = history_file(r#"[{"titleUrl": "https://www.youtube.com/watch?v=aaaaaaaaaaa""#);

    let result = run(config_for(&file), Arc::new(CatalogLookup::default())).await;

    assert!(matches!(
        result,
        Err(CalculationError::History(HistoryError::JsonParse { .. }))
    ));
}

#[test]
fn test_invalid_config_is_rejected_before_processing() {
    let file = history_file("[]");

    let result = WatchTimeCalculator::with_lookup(
        config_for(&file).with_start_date("01/01/2024"),
        Arc::new(CatalogLookup::default()),
        RecordingClock::default(),
    );
    assert!(matches!(result, Err(ConfigError::InvalidStartDate(_))));

    let result = WatchTimeCalculator::with_lookup(
        Config::new(ApiKey::new("k".to_string()), "/nonexistent/watch-history.json"),
        Arc::new(CatalogLookup::default()),
        RecordingClock::default(),
    );
    assert!(matches!(result, Err(ConfigError::HistoryFileNotFound(_))));
}
