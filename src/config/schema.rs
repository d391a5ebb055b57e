//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream WebSocket endpoint for the duplex relay.
    pub upstream: UpstreamConfig,

    /// Quote proxy settings (upstream URL, deadline, retry policy).
    pub quote: QuoteConfig,

    /// Timeout configuration for the HTTP layer.
    pub timeouts: TimeoutConfig,

    /// Rate limiting for the quote API.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream WebSocket endpoint for the duplex relay.
///
/// The URL is optional: the server starts without it, but every relay
/// session is then refused with a policy-violation close (see
/// [`crate::relay`]). An empty string is treated the same as absent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Private RPC WebSocket URL (e.g., "wss://rpc.example.com/?api-key=...").
    pub rpc_ws_url: Option<String>,
}

/// Quote proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Upstream quote endpoint URL. The inbound query string is appended
    /// unchanged.
    pub upstream_url: String,

    /// Wall-clock bound for one inbound request, across all attempts,
    /// in seconds.
    pub deadline_secs: u64,

    /// Maximum number of attempts per inbound request.
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            upstream_url: "https://lite-api.jup.ag/swap/v1/quote".to_string(),
            deadline_secs: 10,
            max_attempts: 2,
            retry_delay_ms: 200,
        }
    }
}

/// Timeout configuration for plain HTTP requests.
///
/// Does not apply to WebSocket sessions, which live as long as both
/// connections remain open.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rate limiting configuration for the quote API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per second per IP.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 100,
            burst_size: 50,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_from_empty_toml() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.upstream.rpc_ws_url.is_none());
        assert_eq!(config.quote.deadline_secs, 10);
        assert_eq!(config.quote.max_attempts, 2);
        assert_eq!(config.quote.retry_delay_ms, 200);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            rpc_ws_url = "wss://rpc.example.com/ws"

            [quote]
            upstream_url = "http://127.0.0.1:9000/quote"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.upstream.rpc_ws_url.as_deref(),
            Some("wss://rpc.example.com/ws")
        );
        assert_eq!(config.quote.upstream_url, "http://127.0.0.1:9000/quote");
        assert_eq!(config.quote.max_attempts, 2);
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
