// ── Shared HTTP transport configuration ──

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// Per-request deadline applied to every backend call. Both backends sit
/// behind slow multi-tenant HTTP APIs, so the ceiling is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Transport settings shared by both backend clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Bounded timeout for each request. On expiry the call surfaces
    /// [`Error::Timeout`](crate::Error::Timeout) — no retry.
    pub timeout: Duration,
    /// Accept self-signed certificates (lab / on-prem PostgREST setups).
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Override the request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The deadline in whole seconds, for error attribution.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    /// Build a `reqwest::Client` with these settings.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with default headers attached to every
    /// request (auth headers live here so endpoint code stays clean).
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_fifteen_seconds() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout_secs(), 15);
    }

    #[test]
    fn with_timeout_overrides() {
        let config = TransportConfig::default().with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout_secs(), 3);
    }

    #[test]
    fn builds_client() {
        let config = TransportConfig::default();
        assert!(config.build_client().is_ok());
    }
}
