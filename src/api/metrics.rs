//! HTTP instrumentation
//!
//! Counts handled API requests by route and response status, and serves the
//! registry at `/metrics`.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::{Encoder, TextEncoder};

use crate::error::AppError;
use crate::metrics::{REGISTRY, record_request};

/// Middleware recording every matched API request with its final status.
///
/// Install with `route_layer` so only routed requests are counted and the
/// route template, not the raw URI, becomes the `endpoint` label. Rejections
/// and handler errors are counted with the status they were answered with.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    record_request(method.as_str(), &endpoint, response.status().as_u16());

    response
}

async fn render_metrics() -> Result<Response, AppError> {
    let encoder = TextEncoder::new();
    let body = encoder
        .encode_to_string(&REGISTRY.gather())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("encoding metrics: {e}")))?;

    Ok(([(header::CONTENT_TYPE, encoder.format_type().to_owned())], body).into_response())
}

/// Router exposing `GET /metrics` in Prometheus text format
pub fn metrics_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(render_metrics))
}
