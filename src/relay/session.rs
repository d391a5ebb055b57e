//! Relay session lifecycle and duplex forwarding.
//!
//! A session pairs one client connection with exactly one upstream
//! connection and owns both handles. Its lifecycle is a small state
//! machine:
//!
//! ```text
//! connecting → open → closing → closed
//! ```
//!
//! `open` is entered once the upstream connection is established. Either
//! side may move the session to `closing`; the first one wins and later
//! transitions are no-ops. `closed` is reached when both forwarding tasks
//! have finished and both handles are released.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message as ClientMessage, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use crate::observability::metrics;
use crate::relay::frames::{self, ClientFrame};
use crate::relay::{CLOSE_UPSTREAM_ERROR, REASON_UPSTREAM_ERROR};

/// The upstream half of a session, as produced by `connect_async`.
pub type UpstreamSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

type ClientSink = SplitSink<WebSocket, ClientMessage>;
type ClientStream = SplitStream<WebSocket>;
type UpstreamSink = SplitSink<UpstreamSocket, UpstreamMessage>;
type UpstreamStream = SplitStream<UpstreamSocket>;

/// Lifecycle state of a relay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl SessionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SessionState::Connecting,
            1 => SessionState::Open,
            2 => SessionState::Closing,
            _ => SessionState::Closed,
        }
    }
}

/// One client connection paired with one upstream connection.
///
/// Shared by the two forwarding tasks; all state lives in a single atomic
/// word, so there is no locking between directions.
pub struct RelaySession {
    id: Uuid,
    state: AtomicU8,
}

impl RelaySession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: AtomicU8::new(SessionState::Connecting as u8),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether frames may still be forwarded.
    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    fn advance(&self, from: SessionState, to: SessionState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn mark_open(&self) {
        self.advance(SessionState::Connecting, SessionState::Open);
    }

    /// Move to `closing`. The first side to initiate wins; later calls are
    /// no-ops.
    fn begin_close(&self) {
        let _ = self.advance(SessionState::Open, SessionState::Closing)
            || self.advance(SessionState::Connecting, SessionState::Closing);
    }

    fn mark_closed(&self) {
        self.state.store(SessionState::Closed as u8, Ordering::Release);
    }
}

impl Default for RelaySession {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive one relay session to completion.
///
/// Spawns one task per forwarding direction and joins both. Returns once
/// both sides have closed and the session owns no more handles.
pub async fn run(session: Arc<RelaySession>, client: WebSocket, upstream: UpstreamSocket) {
    session.mark_open();
    tracing::debug!(session_id = %session.id(), "Relay session open");

    let (client_tx, client_rx) = client.split();
    let (upstream_tx, upstream_rx) = upstream.split();

    let c2u = tokio::spawn(forward_client_to_upstream(
        session.clone(),
        client_rx,
        upstream_tx,
    ));
    let u2c = tokio::spawn(forward_upstream_to_client(
        session.clone(),
        upstream_rx,
        client_tx,
    ));

    let _ = tokio::join!(c2u, u2c);

    session.mark_closed();
    tracing::debug!(session_id = %session.id(), "Relay session closed");
}

/// Client → upstream direction.
///
/// Frames are forwarded only while the session is open; frames arriving
/// after the upstream side closed are dropped, producing no error for the
/// client. Any client termination (orderly close, abrupt disconnect, or
/// transport error) ends with a best-effort close of the upstream side.
async fn forward_client_to_upstream(
    session: Arc<RelaySession>,
    mut client_rx: ClientStream,
    mut upstream_tx: UpstreamSink,
) {
    while let Some(msg) = client_rx.next().await {
        match msg {
            Ok(msg) => match frames::from_client(msg) {
                ClientFrame::Forward(frame) => {
                    if !session.is_open() {
                        continue;
                    }
                    if upstream_tx.send(frame).await.is_err() {
                        session.begin_close();
                    } else {
                        metrics::record_frame_forwarded("client_to_upstream");
                    }
                }
                ClientFrame::Close => {
                    session.begin_close();
                    tracing::debug!(session_id = %session.id(), "Client closed");
                    break;
                }
                ClientFrame::Ignore => {}
            },
            Err(e) => {
                session.begin_close();
                tracing::error!(session_id = %session.id(), error = %e, "Client transport error");
                break;
            }
        }
    }

    // Fire-and-forget: the upstream may already be gone, and double-close
    // is tolerated.
    let _ = upstream_tx.close().await;
}

/// Upstream → client direction.
///
/// An orderly upstream close is mirrored to the client with the same code
/// and reason. An upstream transport error closes the client with the
/// fixed internal-error code instead, decoupling the client from upstream
/// error detail.
async fn forward_upstream_to_client(
    session: Arc<RelaySession>,
    mut upstream_rx: UpstreamStream,
    mut client_tx: ClientSink,
) {
    let close_frame = loop {
        let Some(msg) = upstream_rx.next().await else {
            // Stream ended without a close handshake.
            session.begin_close();
            break frames::close_with(CLOSE_UPSTREAM_ERROR, REASON_UPSTREAM_ERROR);
        };
        match msg {
            Ok(UpstreamMessage::Close(frame)) => {
                session.begin_close();
                tracing::debug!(
                    session_id = %session.id(),
                    code = frame.as_ref().map(|f| u16::from(f.code)),
                    "Upstream closed"
                );
                break frames::mirror_close(frame);
            }
            Ok(msg) => {
                let Some(frame) = frames::from_upstream(msg) else {
                    continue;
                };
                if !session.is_open() {
                    continue;
                }
                if client_tx.send(frame).await.is_err() {
                    session.begin_close();
                } else {
                    metrics::record_frame_forwarded("upstream_to_client");
                }
            }
            Err(e) => {
                session.begin_close();
                tracing::error!(session_id = %session.id(), error = %e, "Upstream transport error");
                break frames::close_with(CLOSE_UPSTREAM_ERROR, REASON_UPSTREAM_ERROR);
            }
        }
    };

    // Fire-and-forget: the client may already be gone.
    let _ = client_tx.send(ClientMessage::Close(close_frame)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_connecting() {
        let session = RelaySession::new();
        assert_eq!(session.state(), SessionState::Connecting);
        assert!(!session.is_open());
    }

    #[test]
    fn open_then_close_then_closed() {
        let session = RelaySession::new();
        session.mark_open();
        assert!(session.is_open());

        session.begin_close();
        assert_eq!(session.state(), SessionState::Closing);
        assert!(!session.is_open());

        session.mark_closed();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn begin_close_is_idempotent() {
        let session = RelaySession::new();
        session.mark_open();
        session.begin_close();
        session.begin_close();
        assert_eq!(session.state(), SessionState::Closing);
    }

    #[test]
    fn cannot_reopen_after_close_started() {
        let session = RelaySession::new();
        session.begin_close();
        session.mark_open();
        assert_eq!(session.state(), SessionState::Closing);
    }
}
