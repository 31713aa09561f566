//! Request metrics and logging.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::metrics::{HttpLabels, HttpLabelsWithStatus, HttpMethod, Metrics};

/// Records request count and time-to-response for every routed request.
pub(super) async fn track_requests(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = HttpMethod::from(request.method());
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    tracing::debug!(?method, %endpoint, status, ?elapsed, "handled request");

    metrics
        .http_response_seconds
        .get_or_create(&HttpLabels {
            method: method.clone(),
            endpoint: endpoint.clone(),
        })
        .observe(elapsed.as_secs_f64());
    metrics
        .http_requests
        .get_or_create(&HttpLabelsWithStatus {
            method,
            endpoint,
            status,
        })
        .inc();

    response
}
