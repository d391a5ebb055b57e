//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Serve until the shutdown signal fires
//!
//! # Routes
//! - `GET /ws/rpc`: WebSocket relay to the private RPC upstream
//! - `GET /api/quote`: quote proxy with bounded retry and deadline
//! - `GET /health`: liveness probe

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{QuoteConfig, RelayConfig, UpstreamConfig};
use crate::http::quote;
use crate::http::request::RequestIdLayer;
use crate::http::websocket;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamConfig,
    pub quote: QuoteConfig,
    pub http_client: reqwest::Client,
}

/// HTTP server hosting the relay and quote proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        // Shared outbound client: connection pooling across quote requests.
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build upstream HTTP client");

        let state = AppState {
            upstream: config.upstream.clone(),
            quote: config.quote.clone(),
            http_client,
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut quote_api = Router::new().route("/api/quote", get(quote::quote_proxy));
        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(config.rate_limit.clone()));
            quote_api = quote_api.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        Router::new()
            .route("/ws/rpc", get(websocket::rpc_relay))
            .route("/health", get(health))
            .merge(quote_api)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn wait_for_shutdown(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}

/// Liveness probe.
async fn health() -> impl IntoResponse {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "timestamp": timestamp })),
    )
}
