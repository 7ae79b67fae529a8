//! Admin operations on email templates: list, update, revert.

use std::sync::Arc;

use thiserror::Error;

use crate::audit::AuditRecord;
use crate::auth::Actor;
use crate::i18n::{check_placeholders, TranslationValue, Translations};
use crate::metrics::{
    EMAIL_TEMPLATE_REVERTS_TOTAL, EMAIL_TEMPLATE_UPDATES_TOTAL,
    EMAIL_TEMPLATE_VALIDATION_FAILURES_TOTAL,
};
use crate::storage::{StorageError, WriteBatch};

use super::types::{
    body_key, subject_key, title_from_id, EmailTemplate, UpdateEmailTemplateRequest, SUBJECT_SUFFIX,
};

/// Errors from the admin template service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller is not an admin. Surfaces as a bare 404.
    #[error("Access denied")]
    AccessDenied,

    /// Unknown template id
    #[error("Email template not found: {0}")]
    NotFound(String),

    /// Field-labeled validation messages; nothing was written.
    #[error("Validation failed")]
    ValidationFailed(Vec<String>),

    /// Storage operation failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The catalog has no usable default for a key it promised
    #[error("No usable default for key: {0}")]
    MissingDefault(String),
}

/// List, update and revert email templates on behalf of an admin.
///
/// Every operation takes the calling [`Actor`] explicitly and re-checks the
/// admin role, so the access gate holds even when the service is driven
/// outside HTTP. Edits target a single locale, fixed at construction.
pub struct EmailTemplateService {
    translations: Arc<Translations>,
    locale: String,
}

impl EmailTemplateService {
    pub fn new(translations: Arc<Translations>, locale: &str) -> Self {
        Self {
            translations,
            locale: locale.to_string(),
        }
    }

    /// Template ids known to the catalog, in sorted order.
    ///
    /// An id is known when the catalog carries a subject default and a
    /// plain-text body default for it.
    pub fn template_ids(&self) -> Vec<String> {
        let suffix = format!(".{}", SUBJECT_SUFFIX);

        let mut ids: Vec<String> = self
            .translations
            .catalog()
            .default_keys()
            .iter()
            .filter_map(|key| key.strip_suffix(suffix.as_str()))
            .filter(|id| self.is_known(id))
            .map(str::to_string)
            .collect();
        ids.sort_unstable();

        ids
    }

    pub fn is_known(&self, id: &str) -> bool {
        let catalog = self.translations.catalog();
        let locale = catalog.default_locale();

        let body_is_text = catalog
            .get(&body_key(id), locale)
            .is_some_and(|value| value.as_text().is_some());

        catalog.get(&subject_key(id), locale).is_some() && body_is_text
    }

    /// All templates with their effective values.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<EmailTemplate>, ServiceError> {
        require_admin(actor)?;

        let mut templates = Vec::new();
        for id in self.template_ids() {
            templates.push(self.load(&id).await?);
        }

        Ok(templates)
    }

    /// Apply an edit to subject and body.
    ///
    /// Placeholders of each submitted field must exactly match the shipped
    /// default's. A plural subject cannot be replaced by a flat string, so
    /// that field is skipped without an error. Any validation failure leaves
    /// storage and audit trail untouched; otherwise each field that actually
    /// changed is written together with its audit record in one commit.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateEmailTemplateRequest,
    ) -> Result<EmailTemplate, ServiceError> {
        require_admin(actor)?;

        if !self.is_known(id) {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        let subject_key = subject_key(id);
        let body_key = body_key(id);

        let mut errors = Vec::new();
        let mut subject_pending = None;
        let mut body_pending = None;

        let default_subject = self
            .translations
            .default_value(&subject_key, &self.locale)
            .cloned()
            .ok_or_else(|| ServiceError::MissingDefault(subject_key.clone()))?;

        match default_subject {
            TranslationValue::Plural(_) => {
                tracing::debug!(template_id = %id, "Subject has plural forms, field skipped");
            }
            TranslationValue::Text(default_text) => {
                match check_placeholders(&default_text, &request.subject) {
                    Ok(()) => {
                        let current = self.effective_text(&subject_key).await?;
                        if request.subject != current {
                            subject_pending = Some(PendingWrite {
                                key: subject_key.clone(),
                                previous: current,
                                new: request.subject.clone(),
                            });
                        }
                    }
                    Err(mismatch) => errors.push(format!("<b>Subject</b>: {}", mismatch)),
                }
            }
        }

        let default_body = self
            .translations
            .default_value(&body_key, &self.locale)
            .and_then(|value| value.as_text().map(str::to_string))
            .ok_or_else(|| ServiceError::MissingDefault(body_key.clone()))?;

        match check_placeholders(&default_body, &request.body) {
            Ok(()) => {
                let current = self.effective_text(&body_key).await?;
                if request.body != current {
                    body_pending = Some(PendingWrite {
                        key: body_key.clone(),
                        previous: current,
                        new: request.body.clone(),
                    });
                }
            }
            Err(mismatch) => errors.push(format!("<b>Body</b>: {}", mismatch)),
        }

        if !errors.is_empty() {
            EMAIL_TEMPLATE_VALIDATION_FAILURES_TOTAL.inc();
            tracing::debug!(
                template_id = %id,
                actor = %actor.id,
                errors = errors.len(),
                "Email template update rejected by validation"
            );
            return Err(ServiceError::ValidationFailed(errors));
        }

        let mut batch = WriteBatch::default();
        for pending in [subject_pending, body_pending].into_iter().flatten() {
            batch.upsert(&pending.key, &self.locale, &pending.new);
            batch.record(AuditRecord::change_site_text(
                &pending.key,
                Some(pending.previous),
                Some(pending.new),
                &actor.id,
            ));
        }

        if !batch.is_empty() {
            self.translations.apply(batch).await?;
            EMAIL_TEMPLATE_UPDATES_TOTAL.inc();
            tracing::info!(template_id = %id, actor = %actor.id, "Email template updated");
        }

        self.load(id).await
    }

    /// Remove every override of the template, restoring shipped defaults.
    pub async fn revert(&self, actor: &Actor, id: &str) -> Result<EmailTemplate, ServiceError> {
        require_admin(actor)?;

        if !self.is_known(id) {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        let mut batch = WriteBatch::default();
        for key in [subject_key(id), body_key(id)] {
            let stored = self.translations.override_value(&key, &self.locale).await?;
            if let Some(override_value) = stored {
                let restored = self
                    .translations
                    .default_value(&key, &self.locale)
                    .and_then(|value| value.as_text().map(str::to_string));

                batch.delete(&key, &self.locale);
                batch.record(AuditRecord::change_site_text(
                    &key,
                    Some(override_value),
                    restored,
                    &actor.id,
                ));
            }
        }

        if !batch.is_empty() {
            self.translations.apply(batch).await?;
            EMAIL_TEMPLATE_REVERTS_TOTAL.inc();
            tracing::info!(template_id = %id, actor = %actor.id, "Email template reverted to defaults");
        }

        self.load(id).await
    }

    /// Effective view of one template.
    async fn load(&self, id: &str) -> Result<EmailTemplate, ServiceError> {
        let subject_key = subject_key(id);
        let body_key = body_key(id);

        let subject = self
            .translations
            .effective(&subject_key, &self.locale)
            .await?
            .ok_or_else(|| ServiceError::MissingDefault(subject_key.clone()))?;

        let body = self
            .translations
            .effective(&body_key, &self.locale)
            .await?
            .and_then(|value| value.as_text().map(str::to_string))
            .ok_or_else(|| ServiceError::MissingDefault(body_key.clone()))?;

        let can_revert = self.translations.has_override(&subject_key, &self.locale).await?
            || self.translations.has_override(&body_key, &self.locale).await?;

        Ok(EmailTemplate {
            id: id.to_string(),
            title: title_from_id(id),
            subject,
            body,
            can_revert,
        })
    }

    async fn effective_text(&self, key: &str) -> Result<String, ServiceError> {
        self.translations
            .effective(key, &self.locale)
            .await?
            .and_then(|value| value.as_text().map(str::to_string))
            .ok_or_else(|| ServiceError::MissingDefault(key.to_string()))
    }
}

fn require_admin(actor: &Actor) -> Result<(), ServiceError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::AccessDenied)
    }
}

struct PendingWrite {
    key: String,
    previous: String,
    new: String,
}

#[cfg(test)]
mod tests {
    use crate::i18n::Catalog;
    use crate::storage::MemoryStorage;

    use super::*;

    fn service() -> EmailTemplateService {
        let catalog = Catalog::builtin().unwrap();
        let translations = Arc::new(Translations::new(catalog, Arc::new(MemoryStorage::new())));
        EmailTemplateService::new(translations, "en")
    }

    fn admin() -> Actor {
        Actor {
            id: "admin-1".to_string(),
            admin: true,
        }
    }

    fn regular_user() -> Actor {
        Actor {
            id: "user-7".to_string(),
            admin: false,
        }
    }

    #[test]
    fn test_template_ids_sorted_and_known() {
        let service = service();
        let ids = service.template_ids();

        assert!(ids.contains(&"user_notifications.admin_login".to_string()));
        assert!(ids.contains(&"system_messages.pending_users_reminder".to_string()));

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        assert!(service.is_known("user_notifications.admin_login"));
        assert!(!service.is_known("non_existent_template"));
    }

    #[tokio::test]
    async fn test_non_admin_is_denied() {
        let service = service();
        let user = regular_user();

        assert!(matches!(
            service.list(&user).await,
            Err(ServiceError::AccessDenied)
        ));

        let request = UpdateEmailTemplateRequest {
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(matches!(
            service.update(&user, "user_notifications.admin_login", request).await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(
            service.revert(&user, "user_notifications.admin_login").await,
            Err(ServiceError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = service();

        let request = UpdateEmailTemplateRequest {
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(matches!(
            service.update(&admin(), "non_existent_template", request).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.revert(&admin(), "non_existent_template").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_validation_error_is_field_labeled() {
        let service = service();

        // Default subject placeholders: site_name, location.
        let request = UpdateEmailTemplateRequest {
            subject: "New login from %{location} at %{when}".to_string(),
            body: "Someone logged into %{site_name} from %{location}.\n".to_string(),
        };

        let err = service
            .update(&admin(), "user_notifications.admin_login", request)
            .await
            .unwrap_err();

        match err {
            ServiceError::ValidationFailed(messages) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].starts_with("<b>Subject</b>: "));
                assert!(messages[0].contains("site_name"));
                assert!(messages[0].contains("when"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identical_update_writes_nothing() {
        let service = service();
        let current = service.list(&admin()).await.unwrap();
        let template = current
            .iter()
            .find(|t| t.id == "user_notifications.admin_login")
            .unwrap();

        let request = UpdateEmailTemplateRequest {
            subject: template.subject.as_text().unwrap().to_string(),
            body: template.body.clone(),
        };

        let updated = service
            .update(&admin(), "user_notifications.admin_login", request)
            .await
            .unwrap();

        assert!(!updated.can_revert);
    }
}
