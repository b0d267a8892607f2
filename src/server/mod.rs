//! Inbound HTTP boundary.
//!
//! A thin JSON shell over [`crate::orchestrator::Compressor`]: validates the
//! payload, applies defaults, and maps failures onto status codes. Parsing
//! and vault persistence stay with the caller.

pub mod api;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::client::CompletionBackend;
use crate::depth::CompressionDepth;

pub use api::{ApiError, AppState, CompressPayload, CompressResponse, SharedState, api_router};

/// Configuration for the HTTP server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dev_mode: bool,
    pub default_depth: CompressionDepth,
    pub default_server: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3142,
            dev_mode: false,
            default_depth: CompressionDepth::default(),
            default_server: crate::orchestrator::DEFAULT_SERVER,
        }
    }
}

/// Build the application router.
pub fn build_router(state: SharedState, dev_mode: bool) -> Router {
    let app = api_router().with_state(state);
    if dev_mode {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the server and block until Ctrl+C.
pub async fn start_server(config: ServerConfig, backend: Arc<dyn CompletionBackend>) -> Result<()> {
    let mut state = AppState::new(backend);
    state.default_depth = config.default_depth;
    state.default_server = config.default_server;

    let app = build_router(Arc::new(state), config.dev_mode);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, dev = config.dev_mode, "Server listening");
    println!("Crumb running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}
