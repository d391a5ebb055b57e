//! RPC Relay Service
//!
//! Fronts a private RPC provider for browser clients.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  RPC RELAY                   │
//!                      │                                              │
//!   WebSocket client   │  ┌─────────┐    ┌─────────────────────┐      │
//!   ───────────────────┼─▶│  http   │───▶│   relay session     │──────┼──▶ Private RPC
//!                      │  │ server  │    │ (duplex forwarding) │      │    (WebSocket)
//!                      │  └────┬────┘    └─────────────────────┘      │
//!   GET /api/quote     │       │         ┌─────────────────────┐      │
//!   ───────────────────┼───────┴────────▶│    quote proxy      │──────┼──▶ Quote API
//!                      │                 │ (deadline + retry)  │      │    (HTTP)
//!                      │                 └─────────────────────┘      │
//!                      │                                              │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │          Cross-Cutting Concerns        │  │
//!                      │  │  config · observability · lifecycle    │  │
//!                      │  │  security (rate limit) · request IDs   │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rpc_relay::config::{loader, RelayConfig};
use rpc_relay::lifecycle::{signals, Shutdown};
use rpc_relay::observability::{logging, metrics};
use rpc_relay::HttpServer;

#[derive(Parser)]
#[command(name = "rpc-relay")]
#[command(about = "WebSocket and quote relay fronting a private RPC provider", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => RelayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!("rpc-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_ws_configured = config.upstream.rpc_ws_url.as_deref().is_some_and(|u| !u.is_empty()),
        quote_upstream = %config.quote.upstream_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
