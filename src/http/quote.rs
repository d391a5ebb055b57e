//! Quote proxy endpoint.
//!
//! Forwards the inbound query string unchanged to the configured upstream
//! quote endpoint and returns the upstream response verbatim, shielding
//! the upstream address from browsers and sidestepping CORS.
//!
//! One deadline covers the whole request, across all attempts. Only
//! transport-level failures are retried; a non-success HTTP status from
//! upstream is a successful proxy operation and is passed through as-is.
//! When every attempt fails at the transport level the caller gets a 502
//! with a structured error body, never an exception.

use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use thiserror::Error;

use crate::http::request::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Error)]
enum QuoteError {
    /// Every attempt failed at the transport level.
    #[error("all upstream attempts failed: {0}")]
    Exhausted(String),

    /// The response arrived but its body could not be read.
    #[error("failed to read upstream response: {0}")]
    Read(#[from] reqwest::Error),
}

/// `GET /api/quote`: forward the query string to the upstream quote API.
pub async fn quote_proxy(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let url = match query.as_deref() {
        Some(q) if !q.is_empty() => format!("{}?{}", state.quote.upstream_url, q),
        _ => state.quote.upstream_url.clone(),
    };

    // One deadline for the entire operation. Dropping the timeout future
    // cancels it on every exit path, so no timer outlives the request.
    let deadline = Duration::from_secs(state.quote.deadline_secs);
    match tokio::time::timeout(deadline, forward(&state, &request_id, &url)).await {
        Ok(Ok((status, body))) => (status, Json(body)).into_response(),
        Ok(Err(e)) => {
            tracing::error!(request_id = %request_id, error = %e, "Quote proxy attempts exhausted");
            metrics::record_quote_exhausted();
            gateway_error(e.to_string())
        }
        Err(_) => {
            tracing::error!(
                request_id = %request_id,
                deadline_secs = state.quote.deadline_secs,
                "Quote proxy deadline exceeded"
            );
            metrics::record_quote_exhausted();
            gateway_error(format!(
                "deadline of {}s exceeded",
                state.quote.deadline_secs
            ))
        }
    }
}

/// Attempt loop plus response handling.
///
/// The loop retries transport failures only, with a fixed delay between
/// attempts. A body-read failure after a response arrived is not retried.
async fn forward(
    state: &AppState,
    request_id: &str,
    url: &str,
) -> Result<(StatusCode, Value), QuoteError> {
    let max_attempts = state.quote.max_attempts.max(1);
    let retry_delay = Duration::from_millis(state.quote.retry_delay_ms);

    let mut last_err: Option<reqwest::Error> = None;
    let mut response = None;
    for attempt in 1..=max_attempts {
        match state
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(res) => {
                response = Some(res);
                break;
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Quote upstream attempt failed"
                );
                last_err = Some(e);
                if attempt < max_attempts {
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    let Some(res) = response else {
        let message = last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no response from upstream".to_string());
        return Err(QuoteError::Exhausted(message));
    };

    // Statuses convert through u16 so the reqwest and axum http types
    // never have to agree on a version.
    let status =
        StatusCode::from_u16(res.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let text = res.text().await?;
    let body = parse_body(&text);

    if !status.is_success() {
        tracing::warn!(
            request_id = %request_id,
            status = %status,
            "Quote upstream returned non-success status"
        );
    }
    metrics::record_quote_response(status.as_u16());

    Ok((status, body))
}

/// Parse the upstream body as JSON; wrap raw text on failure rather than
/// failing the request.
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

fn gateway_error(message: String) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": "proxy error", "message": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_passes_through() {
        let body = parse_body(r#"{"outAmount":"1000"}"#);
        assert_eq!(body["outAmount"], "1000");
    }

    #[test]
    fn non_json_body_is_wrapped() {
        let body = parse_body("upstream said no");
        assert_eq!(body, json!({ "raw": "upstream said no" }));
    }

    #[test]
    fn empty_body_is_wrapped() {
        assert_eq!(parse_body(""), json!({ "raw": "" }));
    }
}
