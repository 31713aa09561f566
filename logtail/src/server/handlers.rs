//! HTTP route handlers for the log tail server.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use super::metrics::Metrics;
use super::request::TailParams;
use super::response::TailResponse;
use super::stream::stream_response;
use crate::LogFile;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub log: Arc<LogFile>,
    pub metrics: Arc<Metrics>,
    /// Cancelled on server shutdown; every live stream holds a child token.
    pub shutdown: CancellationToken,
}

/// Handle GET on the streaming endpoint (`/stream_logs` by default).
///
/// Opens a follower at the current end of the log before answering, so an
/// unreadable log surfaces as a 500 to this client only. On success the
/// body carries every line appended from now on, one frame per line.
pub async fn handle_stream_logs(State(state): State<AppState>) -> Result<Response, ApiError> {
    let follower = state.log.follow().await?;
    Ok(stream_response(
        follower,
        state.shutdown.child_token(),
        state.metrics.clone(),
    ))
}

/// Handle GET /api/v1/tail
///
/// Returns the last `lines` complete lines of the log (default 10).
pub async fn handle_tail(
    State(state): State<AppState>,
    Query(params): Query<TailParams>,
) -> Result<Json<TailResponse>, ApiError> {
    let lines = state.log.tail(params.lines()).await?;
    state.metrics.tail_lines_served.inc_by(lines.len() as u64);
    Ok(Json(TailResponse::success(lines)))
}

/// Handle GET /metrics
pub async fn handle_metrics(State(state): State<AppState>) -> String {
    state.metrics.encode()
}

/// Handle GET /-/healthy
pub async fn handle_healthy() -> StatusCode {
    StatusCode::OK
}

/// Handle GET /-/ready
///
/// Ready once the log file exists and streams can be opened.
pub async fn handle_ready(State(state): State<AppState>) -> StatusCode {
    match tokio::fs::metadata(state.log.path()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
