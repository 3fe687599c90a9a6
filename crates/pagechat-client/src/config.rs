//! Client configuration.

use pagechat_core::defaults::{DEFAULT_API_URL, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_SECS};

/// Configuration for the pagechat client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (no trailing slash required).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Document-status poll period in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `PAGECHAT_API_URL` | `http://localhost:8001` | Backend base URL |
    /// | `PAGECHAT_TIMEOUT` | `300` | Request timeout in seconds |
    /// | `PAGECHAT_POLL_INTERVAL_MS` | `3000` | Status poll period |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PAGECHAT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_seconds = std::env::var("PAGECHAT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let poll_interval_ms = std::env::var("PAGECHAT_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        Self {
            base_url,
            timeout_seconds,
            poll_interval_ms,
        }
    }

    /// Set the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the status poll period.
    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_base_url("http://backend:9000")
            .with_timeout(30)
            .with_poll_interval(500);
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.poll_interval_ms, 500);
    }
}
