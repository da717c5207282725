use axum::http::StatusCode;

use crate::services::metrics;

/// GET /metrics: Prometheus scrape endpoint (internal only).
pub async fn metrics_handler() -> Result<String, StatusCode> {
    metrics::render().map_err(|e| {
        tracing::error!("Failed to render metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
