//! Configuration validation.
//!
//! Serde handles syntactic validation; this module performs the semantic
//! checks: URLs must parse with the right scheme, the retry policy must
//! allow at least one attempt, addresses must be bindable.
//!
//! Returns all validation errors, not just the first. Validation is a pure
//! function over the config and runs before the config is accepted into the
//! system.
//!
//! Note that a missing (or empty) upstream WebSocket URL is *not* a
//! validation error: the server starts without it and refuses relay
//! sessions individually.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidUpstreamWsUrl(String),
    InvalidQuoteUrl(String),
    ZeroAttempts,
    ZeroDeadline,
    InvalidMetricsAddress(String),
    InvalidRateLimit(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address is not a socket address: {}", addr)
            }
            ValidationError::InvalidUpstreamWsUrl(url) => {
                write!(f, "upstream.rpc_ws_url is not a ws:// or wss:// URL: {}", url)
            }
            ValidationError::InvalidQuoteUrl(url) => {
                write!(f, "quote.upstream_url is not an http:// or https:// URL: {}", url)
            }
            ValidationError::ZeroAttempts => write!(f, "quote.max_attempts must be at least 1"),
            ValidationError::ZeroDeadline => write!(f, "quote.deadline_secs must be at least 1"),
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address is not a socket address: {}", addr)
            }
            ValidationError::InvalidRateLimit(msg) => write!(f, "rate_limit: {}", msg),
        }
    }
}

/// Validate a configuration, collecting every semantic error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(url) = config.upstream.rpc_ws_url.as_deref() {
        if !url.is_empty() && !has_scheme(url, &["ws", "wss"]) {
            errors.push(ValidationError::InvalidUpstreamWsUrl(url.to_string()));
        }
    }

    if !has_scheme(&config.quote.upstream_url, &["http", "https"]) {
        errors.push(ValidationError::InvalidQuoteUrl(
            config.quote.upstream_url.clone(),
        ));
    }

    if config.quote.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }

    if config.quote.deadline_secs == 0 {
        errors.push(ValidationError::ZeroDeadline);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::InvalidRateLimit(
                "requests_per_second must be at least 1".to_string(),
            ));
        }
        if config.rate_limit.burst_size == 0 {
            errors.push(ValidationError::InvalidRateLimit(
                "burst_size must be at least 1".to_string(),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn has_scheme(raw: &str, schemes: &[&str]) -> bool {
    match Url::parse(raw) {
        Ok(url) => schemes.contains(&url.scheme()),
        Err(_) => false,
    }
}
