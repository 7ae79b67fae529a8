//! Append-only audit trail for admin changes.
//!
//! Every mutation an admin makes to site text produces one record per field
//! actually changed. Records are written in the same storage commit as the
//! change itself and are never updated or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action kinds the trail records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// An admin changed a piece of site text.
    ChangeSiteText,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ChangeSiteText => "change_site_text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "change_site_text" => Some(AuditAction::ChangeSiteText),
            _ => None,
        }
    }
}

/// One recorded change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record identifier
    pub id: Uuid,

    /// What kind of change this is
    pub action: AuditAction,

    /// The translation key that was changed
    pub subject: String,

    /// Effective value before the change
    pub previous_value: Option<String>,

    /// Effective value after the change
    pub new_value: Option<String>,

    /// Admin user id that made the change
    pub actor: String,

    /// When the change was recorded
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build a site-text change record for the given key.
    pub fn change_site_text(
        subject: &str,
        previous_value: Option<String>,
        new_value: Option<String>,
        actor: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: AuditAction::ChangeSiteText,
            subject: subject.to_string(),
            previous_value,
            new_value,
            actor: actor.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_site_text_record() {
        let record = AuditRecord::change_site_text(
            "user_notifications.admin_login.subject_template",
            Some("old subject".to_string()),
            Some("new subject".to_string()),
            "admin-1",
        );

        assert_eq!(record.action, AuditAction::ChangeSiteText);
        assert_eq!(record.subject, "user_notifications.admin_login.subject_template");
        assert_eq!(record.previous_value.as_deref(), Some("old subject"));
        assert_eq!(record.new_value.as_deref(), Some("new subject"));
        assert_eq!(record.actor, "admin-1");
    }

    #[test]
    fn test_action_round_trips_as_snake_case() {
        let json = serde_json::to_string(&AuditAction::ChangeSiteText).unwrap();
        assert_eq!(json, "\"change_site_text\"");

        assert_eq!(
            AuditAction::parse("change_site_text"),
            Some(AuditAction::ChangeSiteText)
        );
        assert_eq!(AuditAction::parse("something_else"), None);
    }
}
