//! Axum extractor turning a Bearer token into an [`Actor`].
//!
//! The extractor requires the admin role, and rejections intentionally
//! surface as a bare 404 (via `AppError::Auth`): callers without a valid
//! admin token get the exact response an unknown route produces, so the
//! admin surface cannot be enumerated. Running in request-parts position
//! also means the check fires before any request body is read.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::error::AppError;
use crate::server::AppState;

use super::{Actor, Claims};

/// Extract the bearer token from the Authorization header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;

        let claims: Claims = state.jwt_validator.validate(token)?;

        let actor = Actor::from_claims(&claims);
        if !actor.is_admin() {
            return Err(AppError::Auth("Admin role required".to_string()));
        }

        Ok(actor)
    }
}
