//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Live feed configuration
    pub feed: FeedConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Chain id transactions are signed for
    pub chain_id: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            feed: FeedConfig::default(),
            timeouts: TimeoutConfig::default(),
            chain_id: "civic-chain".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id.trim().is_empty() {
            return Err(ConfigError::Invalid("chain_id cannot be empty".into()));
        }
        if self.http.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_bytes cannot be 0".into(),
            ));
        }
        if self.feed.queue_capacity == 0 {
            return Err(ConfigError::InvalidLimit(
                "feed queue_capacity cannot be 0".into(),
            ));
        }
        if self.timeouts.submission.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "submission timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8888)
    pub port: u16,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8888,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Live feed configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Per-subscriber queue bound; the oldest event is dropped on overflow
    pub queue_capacity: usize,
    /// Recent events replayed to a new subscriber
    pub backlog: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            backlog: 50,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Limit on a single host submission
    #[serde(with = "humantime_serde")]
    pub submission: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            submission: Duration::from_secs(10),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
