//! Client configuration.
//!
//! Configuration is a plain value passed at construction. Defaults cover
//! the common case of a client running on the device's LAN; environment
//! variables can override individual fields for tooling.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed discovery endpoint, reachable over plain HTTP on the local
/// network. Returns the device's API domain, HTTPS port and version.
pub const DISCOVERY_URL: &str = "http://mafreebox.freebox.fr/api_version";

/// Default timeout for discovery, authorize and session calls (seconds).
///
/// The authorization poll loop is deliberately not bounded by this; it
/// ends only on a terminal status or caller cancellation.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default delay between authorization status polls (seconds).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Resolved API base URL, e.g. `https://x.fbxos.fr:443/api/v8`.
    /// When absent the client discovers it via [`DISCOVERY_URL`].
    pub base_url: Option<String>,

    /// URL of the api_version discovery endpoint.
    pub discovery_url: String,

    /// Timeout applied to each discovery, authorize and session call.
    pub request_timeout_secs: u64,

    /// Delay between authorization status polls.
    pub poll_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            discovery_url: DISCOVERY_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at an already-known API base URL, skipping
    /// discovery.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration overrides from environment variables.
    ///
    /// Recognized variables: `FREEBOX_BASE_URL`, `FREEBOX_DISCOVERY_URL`,
    /// `FREEBOX_REQUEST_TIMEOUT_SECS`, `FREEBOX_POLL_INTERVAL_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("FREEBOX_BASE_URL") {
            config.base_url = Some(base_url);
        }
        if let Ok(discovery_url) = std::env::var("FREEBOX_DISCOVERY_URL") {
            config.discovery_url = discovery_url;
        }
        if let Ok(timeout) = std::env::var("FREEBOX_REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                config.request_timeout_secs = timeout;
            }
        }
        if let Ok(interval) = std::env::var("FREEBOX_POLL_INTERVAL_SECS") {
            if let Ok(interval) = interval.parse() {
                config.poll_interval_secs = interval;
            }
        }

        config
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_none());
        assert_eq!(config.discovery_url, DISCOVERY_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_with_base_url_skips_discovery() {
        let config = ClientConfig::with_base_url("https://x.fbxos.fr:443/api/v8");
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://x.fbxos.fr:443/api/v8")
        );
        assert_eq!(config.discovery_url, DISCOVERY_URL);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"poll_interval_secs": 2}"#).unwrap();
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }
}
