//! Prometheus metrics endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::metrics;
use crate::server::AppState;

/// GET /metrics - Prometheus metrics endpoint
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    update_metrics_from_state(&state).await;

    match metrics::encode_metrics() {
        Ok(output) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode Prometheus metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(axum::http::header::CONTENT_TYPE, "text/plain")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Refresh gauges from storage before encoding. A failed count leaves the
/// gauge at its previous value.
async fn update_metrics_from_state(state: &AppState) {
    match state.storage.override_count().await {
        Ok(count) => metrics::ACTIVE_OVERRIDES.set(count as i64),
        Err(e) => tracing::warn!(error = %e, "Failed to refresh active override gauge"),
    }

    match state.storage.audit_count().await {
        Ok(count) => metrics::AUDIT_RECORDS.set(count as i64),
        Err(e) => tracing::warn!(error = %e, "Failed to refresh audit record gauge"),
    }
}
