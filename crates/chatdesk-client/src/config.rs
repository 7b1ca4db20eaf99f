//! Client configuration.

use std::time::Duration;

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the chatbot API, including the `/api` prefix.
    pub base_url: String,

    /// Timeout for a single HTTP attempt.
    pub timeout: Duration,

    /// Total attempts for retryable failures (first try included).
    pub max_attempts: u32,

    /// Delay before the first retry; doubles on every further retry.
    pub base_delay: Duration,

    /// Messages allowed per rolling minute before sends fail locally.
    pub requests_per_minute: u32,

    /// How long a send may run before the typing indicator shows.
    pub typing_delay: Duration,

    /// Interval between background health checks.
    pub health_interval: Duration,

    /// Interval between rate-limit snapshot refreshes.
    pub rate_limit_refresh: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001/api".to_string(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            requests_per_minute: 60,
            typing_delay: Duration::from_millis(500),
            health_interval: Duration::from_secs(30),
            rate_limit_refresh: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
