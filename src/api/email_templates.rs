//! Admin email template endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::Actor;
use crate::email_templates::{EmailTemplate, ServiceError, UpdateEmailTemplateRequest};
use crate::error::AppError;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct EmailTemplateListResponse {
    pub email_templates: Vec<EmailTemplate>,
}

#[derive(Debug, Serialize)]
pub struct EmailTemplateResponse {
    pub email_template: EmailTemplate,
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorsResponse {
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error_type: &'static str,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            // Same response as an unrouted path: the admin surface must not
            // be enumerable by non-admins.
            ServiceError::AccessDenied => StatusCode::NOT_FOUND.into_response(),
            ServiceError::NotFound(id) => {
                tracing::debug!(template_id = %id, "Unknown email template requested");
                (
                    StatusCode::NOT_FOUND,
                    Json(NotFoundResponse {
                        error_type: "not_found",
                    }),
                )
                    .into_response()
            }
            // A rejected edit is a normal outcome for the admin UI, not an
            // HTTP error: 200 with the field-labeled messages.
            ServiceError::ValidationFailed(errors) => {
                (StatusCode::OK, Json(ValidationErrorsResponse { errors })).into_response()
            }
            ServiceError::Storage(err) => AppError::Storage(err).into_response(),
            ServiceError::MissingDefault(key) => {
                AppError::Internal(format!("No usable default for key: {}", key)).into_response()
            }
        }
    }
}

/// GET /api/v1/admin/email-templates - List all email templates
#[tracing::instrument(name = "http.list_email_templates", skip(state, actor), fields(actor = %actor.id))]
pub async fn list_email_templates(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<EmailTemplateListResponse>, ServiceError> {
    let email_templates = state.email_templates.list(&actor).await?;

    Ok(Json(EmailTemplateListResponse { email_templates }))
}

/// PUT /api/v1/admin/email-templates/{id} - Edit subject and body
#[tracing::instrument(
    name = "http.update_email_template",
    skip(state, actor, request),
    fields(actor = %actor.id)
)]
pub async fn update_email_template(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(request): Json<UpdateEmailTemplateRequest>,
) -> Result<Json<EmailTemplateResponse>, ServiceError> {
    let email_template = state.email_templates.update(&actor, &id, request).await?;

    Ok(Json(EmailTemplateResponse { email_template }))
}

/// DELETE /api/v1/admin/email-templates/{id} - Revert to shipped defaults
#[tracing::instrument(
    name = "http.revert_email_template",
    skip(state, actor),
    fields(actor = %actor.id)
)]
pub async fn revert_email_template(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<EmailTemplateResponse>, ServiceError> {
    let email_template = state.email_templates.revert(&actor, &id).await?;

    Ok(Json(EmailTemplateResponse { email_template }))
}
