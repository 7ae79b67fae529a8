//! View and request types for admin email template management.

use serde::{Deserialize, Serialize};

use crate::i18n::TranslationValue;

/// Catalog key suffix holding a template's subject default.
pub const SUBJECT_SUFFIX: &str = "subject_template";

/// Catalog key suffix holding a template's body default.
pub const BODY_SUFFIX: &str = "text_body_template";

/// The catalog key carrying the subject of a template id.
pub fn subject_key(id: &str) -> String {
    format!("{}.{}", id, SUBJECT_SUFFIX)
}

/// The catalog key carrying the body of a template id.
pub fn body_key(id: &str) -> String {
    format!("{}.{}", id, BODY_SUFFIX)
}

/// Display title derived from the last id segment: underscores become
/// spaces, every word is capitalized.
///
/// `user_notifications.admin_login` -> `Admin Login`
pub fn title_from_id(id: &str) -> String {
    let last = id.rsplit('.').next().unwrap_or(id);

    last.split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Admin-facing view of one email template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Dotted template identifier
    pub id: String,

    /// Human-readable title derived from the id
    pub title: String,

    /// Effective subject; plural subjects serialize as an object of forms
    pub subject: TranslationValue,

    /// Effective plain-text body
    pub body: String,

    /// Whether an override exists that a revert would remove
    pub can_revert: bool,
}

/// Body of an update request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmailTemplateRequest {
    pub subject: String,
    pub body: String,
}
