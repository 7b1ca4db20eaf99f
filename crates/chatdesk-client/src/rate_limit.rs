//! Sliding-window request counter for client-side throttling.
//!
//! The window is advisory: it keeps a well-behaved client under the server
//! limit, while the server stays authoritative and may still answer 429.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use chatdesk_core::{ChatError, RateLimitSnapshot};

/// Length of the rolling window.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Timestamps of recent requests, oldest first.
#[derive(Debug)]
pub struct RateWindow {
    limit: u32,
    window: Duration,
    requests: VecDeque<Instant>,
}

impl RateWindow {
    /// Window allowing `limit` requests per minute.
    pub fn new(limit: u32) -> Self {
        Self::with_window(limit, RATE_WINDOW)
    }

    /// Window allowing `limit` requests per `window`.
    pub fn with_window(limit: u32, window: Duration) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            window,
            requests: VecDeque::with_capacity(limit as usize),
        }
    }

    /// Drop requests that have left the window.
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.requests.front() {
            if oldest + self.window <= now {
                self.requests.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until the oldest recorded request leaves the window.
    fn reset_in(&self, now: Instant) -> Duration {
        self.requests
            .front()
            .map(|&oldest| (oldest + self.window).saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Fail if another request would exceed the limit.
    pub fn check(&mut self) -> Result<(), ChatError> {
        let now = Instant::now();
        self.prune(now);

        if self.requests.len() as u32 >= self.limit {
            let retry_after_secs = ceil_secs(self.reset_in(now)).max(1);
            debug!(
                limit = self.limit,
                retry_after_secs, "Local rate limit reached"
            );
            return Err(ChatError::RateLimited { retry_after_secs });
        }
        Ok(())
    }

    /// Record a request issued now.
    pub fn record(&mut self) {
        let now = Instant::now();
        self.prune(now);
        self.requests.push_back(now);
    }

    /// Check and record in one step.
    pub fn acquire(&mut self) -> Result<(), ChatError> {
        self.check()?;
        self.record();
        Ok(())
    }

    /// Requests recorded in the current window.
    pub fn len(&mut self) -> usize {
        self.prune(Instant::now());
        self.requests.len()
    }

    /// Current state for display.
    pub fn snapshot(&mut self) -> RateLimitSnapshot {
        let now = Instant::now();
        self.prune(now);
        RateLimitSnapshot {
            limit: self.limit,
            remaining: self.limit.saturating_sub(self.requests.len() as u32),
            reset_in_secs: ceil_secs(self.reset_in(now)),
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
