use axum::{
    routing::{get, put},
    Router,
};

use crate::server::AppState;

use super::email_templates::{
    list_email_templates, revert_email_template, update_email_template,
};
use super::health::{health, stats};
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Admin email template endpoints
        .nest(
            "/api/v1/admin",
            Router::new()
                .route("/email-templates", get(list_email_templates))
                .route(
                    "/email-templates/{id}",
                    put(update_email_template).delete(revert_email_template),
                ),
        )
}
