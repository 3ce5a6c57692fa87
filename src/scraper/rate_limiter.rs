//! Minimum-interval rate limiter.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Keeps a fixed gap between the end of one request and the start of the next.
///
/// Clones share the same clock. Calls through one limiter are serialized:
/// the lock is held while the wrapped operation runs.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimiterState>>,
}

#[derive(Debug)]
struct RateLimiterState {
    min_interval: Duration,
    last_finished: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `min_interval` - Minimum gap between the end of one call and the start of the next
    pub fn new(min_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimiterState {
                min_interval,
                last_finished: None,
            })),
        }
    }

    /// Run `operation` once the interval since the previous call has passed.
    pub async fn run<F, Fut, T>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut state = self.state.lock().await;

        if let Some(last) = state.last_finished {
            // Returns immediately when the deadline is already behind us
            tokio::time::sleep_until(last + state.min_interval).await;
        }

        let output = operation().await;
        state.last_finished = Some(Instant::now());
        output
    }
}
