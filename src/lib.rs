// Infrastructure layer (shared components)
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;

// Domain layer (business logic)
pub mod audit;
pub mod email_templates;
pub mod i18n;
pub mod storage;

// Application layer
pub mod api;
pub mod server;
