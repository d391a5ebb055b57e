//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routing)
//!     → request.rs (add request ID)
//!     → websocket.rs (upgrade, hand off to relay session)
//!       or quote.rs (forward to quote upstream, bounded retry)
//!     → Send to client
//! ```

pub mod quote;
pub mod request;
pub mod server;
pub mod websocket;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
