//! HTTP front end for the transpiler.
//!
//! Endpoints:
//! - GET  /health     - Health check
//! - POST /transpile  - Transpile `{"input": "..."}` into the full report
//! - GET  /*          - Highlighting front end from the static directory

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::debug;

use crate::transpiler::{SignalTranspiler, TranspilerOutput, MATCHERS};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub transpiler: Arc<SignalTranspiler>,
}

impl AppState {
    pub fn new(transpiler: SignalTranspiler) -> Self {
        Self {
            transpiler: Arc::new(transpiler),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TranspileRequest {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub matcher_count: usize,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        matcher_count: MATCHERS.len(),
    })
}

async fn transpile(
    State(state): State<AppState>,
    Json(req): Json<TranspileRequest>,
) -> Json<TranspilerOutput> {
    debug!(bytes = req.input.len(), "transpile request");
    Json(state.transpiler.transpile(&req.input))
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/transpile", post(transpile))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
