//! Dataset HTTP Routes
//!
//! Column discovery and row queries. Dataset work is blocking file IO, so
//! it runs on tokio's blocking pool; queries that outlive the configured
//! timeout are cancelled and answer with the rows gathered so far. A request
//! whose connection goes away cancels its scan as well.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info, info_span};
use uuid::Uuid;

use crate::api::{ColumnsPayload, ErrorKind, FilterRequest, LogParams, QueryResult, RowsPayload};
use crate::dataset::CancelFlag;

use super::server::AppState;

/// Create dataset routes
pub fn dataset_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/columns", get(columns_handler))
        .route("/get_data", get(get_data_handler))
        .route("/filter_data", post(filter_data_handler))
        .with_state(state)
}

async fn columns_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
) -> QueryResult<ColumnsPayload> {
    state.apply_log_level(params.log_lvl.as_deref());

    let api = state.api.clone();
    match tokio::task::spawn_blocking(move || api.discover_columns()).await {
        Ok(result) => result,
        Err(e) => worker_failure(e),
    }
}

async fn get_data_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
) -> QueryResult<RowsPayload> {
    state.apply_log_level(params.log_lvl.as_deref());
    info!("get data request");
    run_query(&state, None).await
}

async fn filter_data_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
    Json(request): Json<FilterRequest>,
) -> QueryResult<RowsPayload> {
    state.apply_log_level(params.log_lvl.as_deref());
    info!(query = request.query().unwrap_or_default(), "filter data request");
    run_query(&state, request.query).await
}

/// Run a query on the blocking pool, cancelling it on timeout
///
/// The scan is also cancelled if this future is dropped before it finishes,
/// which is what happens when the client disconnects.
async fn run_query(state: &AppState, predicate: Option<String>) -> QueryResult<RowsPayload> {
    let cancel = CancelFlag::new();
    let _guard = cancel.guard();
    let api = state.api.clone();
    let worker_cancel = cancel.clone();
    let request_id = Uuid::new_v4();
    let mut task = tokio::task::spawn_blocking(move || {
        let span = info_span!("query", %request_id);
        let _entered = span.enter();
        api.query(predicate.as_deref(), &worker_cancel)
    });

    let joined = match state.query_timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                cancel.cancel();
                task.await
            }
        },
        None => task.await,
    };

    match joined {
        Ok(result) => result,
        Err(e) => worker_failure(e),
    }
}

fn worker_failure<T>(err: tokio::task::JoinError) -> QueryResult<T> {
    error!(error = %err, "dataset worker failed");
    QueryResult::failure(ErrorKind::Internal, "dataset worker failed")
}
