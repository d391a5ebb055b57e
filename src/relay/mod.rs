//! Duplex relay subsystem.
//!
//! # Data Flow
//! ```text
//! Client WebSocket (accepted by http/websocket.rs)
//!     → session.rs (pair with one upstream connection)
//!     → frames.rs (frame conversion, no inspection or transformation)
//!     → Upstream WebSocket (tokio-tungstenite)
//!
//! Two forwarding directions run as independent tasks, joined on
//! session end. Closing either side initiates closing of the other.
//! ```
//!
//! # Design Decisions
//! - One task per direction instead of callback registration; the pair is
//!   joined when the session ends
//! - Frames are forwarded only while the peer is open; frames arriving
//!   after the peer closed are dropped, silently
//! - Close is fire-and-forget: close calls never propagate errors, and
//!   double-close is tolerated
//! - No reconnection and no buffering of undelivered frames; a failed
//!   session must be re-established by the caller

pub mod frames;
pub mod session;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

pub use session::{RelaySession, SessionState};

/// Close code sent to the client when no upstream URL is configured.
///
/// Policy violation rather than a transient failure: reconnecting will not
/// help until the operator fixes the configuration.
pub const CLOSE_NOT_CONFIGURED: u16 = 1008;

/// Close code sent to the client when the upstream side fails.
///
/// A fixed internal-error code; the upstream's own error detail is never
/// surfaced to the client.
pub const CLOSE_UPSTREAM_ERROR: u16 = 1011;

/// Reason string accompanying [`CLOSE_NOT_CONFIGURED`].
pub const REASON_NOT_CONFIGURED: &str = "relay not configured";

/// Reason string accompanying [`CLOSE_UPSTREAM_ERROR`].
pub const REASON_UPSTREAM_ERROR: &str = "upstream error";

/// Errors that prevent a relay session from reaching the open state.
///
/// Transport failures *after* establishment are handled inside the session
/// tasks (close the paired connection, log) and are not surfaced here:
/// there is no caller beyond the transport framework itself.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream WebSocket URL is absent or empty in configuration.
    #[error("upstream RPC WebSocket URL is not configured")]
    NotConfigured,

    /// The upstream connection could not be established.
    #[error("failed to connect to upstream: {0}")]
    UpstreamConnect(#[source] tungstenite::Error),
}
