//! API layer - HTTP endpoint handlers organized by domain.

mod email_templates;
mod health;
mod metrics;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use email_templates::{
    list_email_templates, revert_email_template, update_email_template, EmailTemplateListResponse,
    EmailTemplateResponse, NotFoundResponse, ValidationErrorsResponse,
};
pub use health::{health, stats};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
