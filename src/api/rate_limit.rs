//! Fixed-delay throttling between remote calls.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// Time source used by [`RateLimiter`]
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `tokio::time`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that only moves when told to. Sleeping advances it instantly and
/// records the requested duration.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct ManualClock {
    now: parking_lot::Mutex<Instant>,
    sleeps: parking_lot::Mutex<Vec<Duration>>,
}

#[cfg(any(test, feature = "testing"))]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: parking_lot::Mutex::new(Instant::now()),
            sleeps: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.advance(duration);
    }
}

#[async_trait]
impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

/// Enforces a minimum gap between consecutive calls.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_call: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Block until `delay` has passed since the previous call, then mark now
    /// as the time of this call.
    pub async fn wait<C: Clock + ?Sized>(&mut self, clock: &C) {
        if let Some(last) = self.last_call {
            let elapsed = clock.now().saturating_duration_since(last);
            if elapsed < self.delay {
                let remaining = self.delay - elapsed;
                debug!(remaining_ms = remaining.as_millis() as u64, "Rate limit wait");
                clock.sleep(remaining).await;
            }
        }
        self.last_call = Some(clock.now());
    }
}
