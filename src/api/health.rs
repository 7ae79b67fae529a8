//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage: StorageHealthResponse,
    pub templates: TemplateHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct StorageHealthResponse {
    pub backend: String,
    pub connected: bool,
}

#[derive(Debug, Serialize)]
pub struct TemplateHealthResponse {
    pub known_templates: usize,
    pub active_overrides: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub templates: TemplateStats,
    pub audit: AuditStats,
}

#[derive(Debug, Serialize)]
pub struct TemplateStats {
    pub known_templates: usize,
    pub active_overrides: usize,
}

#[derive(Debug, Serialize)]
pub struct AuditStats {
    pub total_records: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.storage.ping().await.is_ok();
    let active_overrides = state.storage.override_count().await.unwrap_or(0);

    let status = if connected { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        storage: StorageHealthResponse {
            backend: state.storage.backend_kind().to_string(),
            connected,
        },
        templates: TemplateHealthResponse {
            known_templates: state.email_templates.template_ids().len(),
            active_overrides,
        },
    })
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let known_templates = state.email_templates.template_ids().len();
    let active_overrides = state.storage.override_count().await?;
    let total_records = state.storage.audit_count().await?;

    Ok(Json(StatsResponse {
        templates: TemplateStats {
            known_templates,
            active_overrides,
        },
        audit: AuditStats { total_records },
    }))
}
