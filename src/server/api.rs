use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::CompletionBackend;
use crate::depth::CompressionDepth;
use crate::errors::CompressError;
use crate::orchestrator::{CompressionRequest, Compressor};

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub compressor: Compressor<Arc<dyn CompletionBackend>>,
    /// Depth used when the payload omits one
    pub default_depth: CompressionDepth,
    /// Server used when the payload omits one
    pub default_server: usize,
}

impl AppState {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            compressor: Compressor::new(backend),
            default_depth: CompressionDepth::default(),
            default_server: crate::orchestrator::DEFAULT_SERVER,
        }
    }
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressPayload {
    pub conversation: Option<String>,
    pub server: Option<usize>,
    pub depth: Option<String>,
    pub existing_crumb: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    pub crumb_file: String,
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<CompressError> for ApiError {
    fn from(err: CompressError) -> Self {
        if err.is_validation() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/compress", post(compress))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

/// Turn a payload into a validated request, applying defaults.
fn build_request(state: &AppState, payload: CompressPayload) -> Result<CompressionRequest, ApiError> {
    let depth = match payload.depth.as_deref().map(str::trim) {
        None | Some("") => state.default_depth,
        Some(raw) => raw
            .parse::<CompressionDepth>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };

    let request = CompressionRequest::new(payload.conversation.unwrap_or_default())
        .with_depth(depth)
        .with_server(payload.server.unwrap_or(state.default_server))
        .with_existing_crumb(payload.existing_crumb);

    request.validate()?;
    Ok(request)
}

async fn compress(
    State(state): State<SharedState>,
    payload: Result<Json<CompressPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let request = build_request(&state, payload)?;

    let crumb_file = state.compressor.compress(&request).await.map_err(|e| {
        warn!(error = %e, server = request.server, "Compression failed");
        ApiError::from(e)
    })?;

    info!(chars = crumb_file.len(), "Compression succeeded");
    Ok(Json(CompressResponse { crumb_file }))
}
