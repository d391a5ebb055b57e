//! WebSocket relay endpoint.
//!
//! # Responsibilities
//! - Complete the upgrade handshake with the client
//! - Establish the WebSocket connection to the configured upstream
//! - Hand both handles to a relay session for duplex forwarding
//!
//! # Data Flow
//! ```text
//! Client ←── WebSocket frames ──→ Relay ←── WebSocket frames ──→ Upstream RPC
//! ```
//!
//! A missing upstream URL is fatal for the session: the client is closed
//! with a policy-violation code before any upstream connection attempt. A
//! failed upstream connection closes the client with the fixed
//! internal-error code instead.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio_tungstenite::connect_async;

use crate::config::UpstreamConfig;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::session::{self, RelaySession, UpstreamSocket};
use crate::relay::{
    frames, RelayError, CLOSE_NOT_CONFIGURED, CLOSE_UPSTREAM_ERROR, REASON_NOT_CONFIGURED,
    REASON_UPSTREAM_ERROR,
};

/// `GET /ws/rpc`: upgrade and start a relay session.
pub async fn rpc_relay(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| relay_socket(socket, state))
}

async fn relay_socket(client: WebSocket, state: AppState) {
    let session = Arc::new(RelaySession::new());

    match connect_upstream(&state.upstream).await {
        Ok(upstream) => {
            metrics::record_session_opened();
            session::run(session, client, upstream).await;
        }
        Err(RelayError::NotConfigured) => {
            tracing::error!(
                session_id = %session.id(),
                "Upstream RPC WebSocket URL not set; closing relay connection"
            );
            metrics::record_session_rejected("not_configured");
            close_client(client, CLOSE_NOT_CONFIGURED, REASON_NOT_CONFIGURED).await;
        }
        Err(e) => {
            tracing::error!(session_id = %session.id(), error = %e, "Upstream connection failed");
            metrics::record_session_rejected("upstream_connect");
            close_client(client, CLOSE_UPSTREAM_ERROR, REASON_UPSTREAM_ERROR).await;
        }
    }
}

/// Open the upstream connection named by configuration.
///
/// An absent or empty URL fails immediately, before any connection
/// attempt is made.
async fn connect_upstream(config: &UpstreamConfig) -> Result<UpstreamSocket, RelayError> {
    let url = config
        .rpc_ws_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(RelayError::NotConfigured)?;

    let (stream, _) = connect_async(url)
        .await
        .map_err(RelayError::UpstreamConnect)?;
    Ok(stream)
}

/// Best-effort close of the client connection. Never propagates errors.
async fn close_client(mut client: WebSocket, code: u16, reason: &str) {
    let _ = client
        .send(Message::Close(frames::close_with(code, reason)))
        .await;
}
