//! Admin email template management.
//!
//! This module provides:
//! - The `EmailTemplate` view (subject + body sharing one id)
//! - `EmailTemplateService` with list / update / revert operations
//! - Placeholder-safe editing: overrides must keep the default's `%{name}` set
//!
//! Defaults come from the compiled-in catalog (`crate::i18n`); edits become
//! override rows plus audit records, committed atomically through
//! `crate::storage`.

mod service;
mod types;

pub use service::{EmailTemplateService, ServiceError};
pub use types::{
    body_key, subject_key, title_from_id, EmailTemplate, UpdateEmailTemplateRequest, BODY_SUFFIX,
    SUBJECT_SUFFIX,
};
