//! Observability HTTP Routes
//!
//! Welcome, liveness and version endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};

use crate::api::{Envelope, LogParams};

use super::server::AppState;

/// Package version reported by `/health` and `/versions`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `/versions` payload
#[derive(Debug, Serialize)]
pub struct VersionPayload {
    pub version: String,
}

/// Create observability routes
pub fn observability_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .route("/versions", get(versions_handler))
        .with_state(state)
}

async fn root_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
) -> Envelope<()> {
    state.apply_log_level(params.log_lvl.as_deref());
    Envelope::message("Welcome to salesdb. GET /columns, GET /get_data or POST /filter_data.")
}

async fn ping_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
) -> &'static str {
    state.apply_log_level(params.log_lvl.as_deref());
    debug!("pong");
    "pong"
}

/// Health check handler
async fn health_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
) -> impl IntoResponse {
    state.apply_log_level(params.log_lvl.as_deref());
    let response = HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn versions_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
) -> Envelope<VersionPayload> {
    state.apply_log_level(params.log_lvl.as_deref());
    info!(version = VERSION, "version requested");
    Envelope::ok(
        "versions",
        VersionPayload {
            version: VERSION.to_string(),
        },
    )
}
