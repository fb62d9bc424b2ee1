//! Batch duration lookup with per-video capping.

use super::duration::parse_duration_secs;
use super::rate_limit::{Clock, RateLimiter, TokioClock};
use super::youtube::{VideoId, VideoLookup};
use std::time::Duration;
use tracing::{error, warn};

pub struct MetadataFetcher<L, C = TokioClock> {
    lookup: L,
    clock: C,
    limiter: RateLimiter,
    max_duration: u64,
}

impl<L: VideoLookup> MetadataFetcher<L, TokioClock> {
    pub fn new(lookup: L, delay: Duration, max_duration: u64) -> Self {
        Self::with_clock(lookup, TokioClock, delay, max_duration)
    }
}

impl<L: VideoLookup, C: Clock> MetadataFetcher<L, C> {
    pub fn with_clock(lookup: L, clock: C, delay: Duration, max_duration: u64) -> Self {
        Self {
            lookup,
            clock,
            limiter: RateLimiter::new(delay),
            max_duration,
        }
    }

    pub fn max_duration(&self) -> u64 {
        self.max_duration
    }

    /// Capped duration, in seconds, for every video the API returned.
    ///
    /// A failed lookup yields an empty list for the whole batch. Videos the
    /// API does not return are simply absent from the result.
    pub async fn fetch_video_durations(&mut self, batch: &[VideoId]) -> Vec<u64> {
        if batch.is_empty() {
            return Vec::new();
        }

        self.limiter.wait(&self.clock).await;

        let response = match self.lookup.lookup(batch).await {
            Ok(response) => response,
            Err(e) => {
                error!(batch_size = batch.len(), error = %e, "API request failed");
                return Vec::new();
            }
        };

        response
            .items
            .iter()
            .map(|item| match item.duration() {
                Some(duration) => parse_duration_secs(duration).min(self.max_duration),
                None => {
                    warn!(
                        video_id = item.id.as_deref().unwrap_or("<unknown>"),
                        "Could not parse duration for video"
                    );
                    0
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rate_limit::ManualClock;
    use crate::api::youtube::{
        ContentDetails, FetchError, VideoItem, VideoListResponse,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Returns a canned result and records every request.
    struct StubLookup {
        result: fn() -> Result<VideoListResponse, FetchError>,
        calls: Mutex<Vec<Vec<VideoId>>>,
    }

    impl StubLookup {
        fn new(result: fn() -> Result<VideoListResponse, FetchError>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VideoLookup for StubLookup {
        async fn lookup(&self, ids: &[VideoId]) -> Result<VideoListResponse, FetchError> {
            self.calls.lock().push(ids.to_vec());
            (self.result)()
        }
    }

    fn item(duration: Option<&str>) -> VideoItem {
        VideoItem {
            id: Some("aaaaaaaaaaa".to_string()),
            content_details: Some(ContentDetails {
                duration: duration.map(str::to_string),
            }),
        }
    }

    fn ids(n: usize) -> Vec<VideoId> {
        (0..n).map(|i| VideoId(format!("video{:06}", i))).collect()
    }

    fn mixed_response() -> Result<VideoListResponse, FetchError> {
        Ok(VideoListResponse {
            items: vec![
                item(Some("PT4M")),
                item(Some("PT3H")),
                item(None),
                item(Some("garbage")),
            ],
            error: None,
        })
    }

    #[tokio::test]
    async fn test_durations_are_capped() {
        let mut fetcher = MetadataFetcher::with_clock(
            StubLookup::new(mixed_response),
            ManualClock::new(),
            Duration::ZERO,
            5400,
        );

        let durations = fetcher.fetch_video_durations(&ids(4)).await;

        assert_eq!(durations, vec![240, 5400, 0, 0]);
        assert!(durations.iter().all(|d| *d <= fetcher.max_duration()));
    }

    #[tokio::test]
    async fn test_missing_items_shrink_result() {
        let mut fetcher = MetadataFetcher::with_clock(
            StubLookup::new(|| {
                Ok(VideoListResponse {
                    items: vec![item(Some("PT1M"))],
                    error: None,
                })
            }),
            ManualClock::new(),
            Duration::ZERO,
            5400,
        );

        let durations = fetcher.fetch_video_durations(&ids(3)).await;

        assert_eq!(durations, vec![60]);
    }

    #[tokio::test]
    async fn test_failed_lookup_yields_empty_batch() {
        let mut fetcher = MetadataFetcher::with_clock(
            StubLookup::new(|| {
                Err(FetchError::Api {
                    code: 403,
                    message: "quotaExceeded".to_string(),
                })
            }),
            ManualClock::new(),
            Duration::ZERO,
            5400,
        );

        assert!(fetcher.fetch_video_durations(&ids(5)).await.is_empty());
    }

    #[tokio::test]
    async fn test_http_status_failure_yields_empty_batch() {
        let mut fetcher = MetadataFetcher::with_clock(
            StubLookup::new(|| Err(FetchError::Status { status: 503 })),
            ManualClock::new(),
            Duration::ZERO,
            5400,
        );

        assert!(fetcher.fetch_video_durations(&ids(2)).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_lookup() {
        let mut fetcher = MetadataFetcher::with_clock(
            StubLookup::new(mixed_response),
            ManualClock::new(),
            Duration::ZERO,
            5400,
        );

        assert!(fetcher.fetch_video_durations(&[]).await.is_empty());
        assert!(fetcher.lookup.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_batch_is_sent_in_one_request() {
        let mut fetcher = MetadataFetcher::with_clock(
            StubLookup::new(mixed_response),
            ManualClock::new(),
            Duration::ZERO,
            5400,
        );
        let batch = ids(7);

        fetcher.fetch_video_durations(&batch).await;

        assert_eq!(*fetcher.lookup.calls.lock(), vec![batch]);
    }

    #[tokio::test]
    async fn test_consecutive_batches_are_throttled() {
        let clock = Arc::new(ManualClock::new());
        let mut fetcher = MetadataFetcher::with_clock(
            StubLookup::new(mixed_response),
            clock.clone(),
            Duration::from_millis(100),
            5400,
        );

        fetcher.fetch_video_durations(&ids(1)).await;
        clock.advance(Duration::from_millis(40));
        fetcher.fetch_video_durations(&ids(1)).await;
        fetcher.fetch_video_durations(&ids(1)).await;

        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(60), Duration::from_millis(100)]
        );
    }
}
