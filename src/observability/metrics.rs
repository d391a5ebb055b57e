//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_sessions_opened_total` (counter): sessions that reached open
//! - `relay_sessions_rejected_total` (counter): by reason
//! - `relay_frames_forwarded_total` (counter): by direction
//! - `quote_requests_total` (counter): by upstream status
//! - `quote_requests_exhausted_total` (counter): all attempts failed
//! - `requests_rate_limited_total` (counter)
//!
//! Updates are atomic increments; the exporter runs on its own bind
//! address and is scraped by Prometheus.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// Failure to install is logged, not fatal: the relay keeps serving
/// without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_session_opened() {
    counter!("relay_sessions_opened_total").increment(1);
}

pub fn record_session_rejected(reason: &'static str) {
    counter!("relay_sessions_rejected_total", "reason" => reason).increment(1);
}

pub fn record_frame_forwarded(direction: &'static str) {
    counter!("relay_frames_forwarded_total", "direction" => direction).increment(1);
}

pub fn record_quote_response(status: u16) {
    counter!("quote_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_quote_exhausted() {
    counter!("quote_requests_exhausted_total").increment(1);
}

pub fn record_rate_limited() {
    counter!("requests_rate_limited_total").increment(1);
}
