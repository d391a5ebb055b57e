//! Frame conversion between the client and upstream WebSocket stacks.
//!
//! The client side speaks Axum's WebSocket types; the upstream side speaks
//! tokio-tungstenite's. Conversion is mechanical: Text and Binary payloads
//! pass through untouched, close frames keep their code and reason, and
//! Ping/Pong stay transport-level (both endpoints answer them on their own,
//! so they are never forwarded across).

use axum::extract::ws::{CloseFrame as ClientCloseFrame, Message as ClientMessage};
use tokio_tungstenite::tungstenite::protocol::CloseFrame as UpstreamCloseFrame;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;

/// Disposition of one client frame.
pub enum ClientFrame {
    /// Data frame to forward upstream.
    Forward(UpstreamMessage),
    /// The client initiated the close handshake.
    Close,
    /// Transport-level frame, not forwarded.
    Ignore,
}

/// Classify a frame received from the client.
pub fn from_client(msg: ClientMessage) -> ClientFrame {
    match msg {
        ClientMessage::Text(text) => {
            ClientFrame::Forward(UpstreamMessage::Text(text.as_str().into()))
        }
        ClientMessage::Binary(data) => ClientFrame::Forward(UpstreamMessage::Binary(data)),
        ClientMessage::Close(_) => ClientFrame::Close,
        ClientMessage::Ping(_) | ClientMessage::Pong(_) => ClientFrame::Ignore,
    }
}

/// Convert an upstream data frame for the client, if it is one.
///
/// Close frames are handled separately by the session so their code and
/// reason can be mirrored; everything that is not Text or Binary is dropped.
pub fn from_upstream(msg: UpstreamMessage) -> Option<ClientMessage> {
    match msg {
        UpstreamMessage::Text(text) => Some(ClientMessage::Text(text.as_str().into())),
        UpstreamMessage::Binary(data) => Some(ClientMessage::Binary(data)),
        _ => None,
    }
}

/// Mirror an upstream close frame onto the client connection, preserving
/// the upstream-supplied code and reason.
pub fn mirror_close(frame: Option<UpstreamCloseFrame>) -> Option<ClientCloseFrame> {
    frame.map(|f| ClientCloseFrame {
        code: f.code.into(),
        reason: f.reason.as_str().into(),
    })
}

/// Build the fixed close frame for a given code and reason.
pub fn close_with(code: u16, reason: &str) -> Option<ClientCloseFrame> {
    Some(ClientCloseFrame {
        code,
        reason: reason.into(),
    })
}
