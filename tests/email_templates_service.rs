//! Cross-component tests for the email template service
//!
//! These tests drive the service layer directly against the builtin catalog
//! and an in-memory storage backend, verifying access control, validation,
//! audit trail wiring and default restoration without server startup.

use std::sync::Arc;

use ara_email_template_service::audit::AuditAction;
use ara_email_template_service::auth::Actor;
use ara_email_template_service::email_templates::{
    body_key, subject_key, EmailTemplateService, ServiceError, UpdateEmailTemplateRequest,
};
use ara_email_template_service::i18n::{Catalog, Translations};
use ara_email_template_service::storage::{MemoryStorage, TemplateStorage};

const ADMIN_LOGIN: &str = "user_notifications.admin_login";
const PENDING_USERS: &str = "system_messages.pending_users_reminder";

/// Create a service wired to the builtin catalog and fresh memory storage
fn create_test_environment() -> TestEnvironment {
    let storage = Arc::new(MemoryStorage::new());
    let catalog = Catalog::builtin().expect("builtin catalog must parse");
    let translations = Arc::new(Translations::new(catalog, storage.clone()));
    let service = EmailTemplateService::new(translations.clone(), "en");

    TestEnvironment {
        storage,
        translations,
        service,
    }
}

struct TestEnvironment {
    storage: Arc<MemoryStorage>,
    translations: Arc<Translations>,
    service: EmailTemplateService,
}

fn admin() -> Actor {
    Actor {
        id: "admin-1".to_string(),
        admin: true,
    }
}

fn regular_user() -> Actor {
    Actor {
        id: "user-42".to_string(),
        admin: false,
    }
}

/// Shipped default for a key, as plain text.
fn default_text(env: &TestEnvironment, key: &str) -> String {
    env.translations
        .default_value(key, "en")
        .and_then(|value| value.as_text())
        .expect("catalog default must be plain text")
        .to_string()
}

// =============================================================================
// Access Gate Tests
// =============================================================================

mod access_gate_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_admin_cannot_list() {
        let env = create_test_environment();

        let result = env.service.list(&regular_user()).await;

        assert!(matches!(result, Err(ServiceError::AccessDenied)));
    }

    #[tokio::test]
    async fn test_non_admin_update_leaves_no_trace() {
        let env = create_test_environment();

        // A request that would be perfectly valid coming from an admin.
        let request = UpdateEmailTemplateRequest {
            subject: "[%{site_name}] Admin login alert from %{location}".to_string(),
            body: default_text(&env, &body_key(ADMIN_LOGIN)),
        };

        let result = env.service.update(&regular_user(), ADMIN_LOGIN, request).await;

        assert!(matches!(result, Err(ServiceError::AccessDenied)));
        assert_eq!(env.storage.override_count().await.unwrap(), 0);
        assert_eq!(env.storage.audit_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_revert_existing_override() {
        let env = create_test_environment();

        let request = UpdateEmailTemplateRequest {
            subject: "[%{site_name}] Admin login alert from %{location}".to_string(),
            body: default_text(&env, &body_key(ADMIN_LOGIN)),
        };
        env.service.update(&admin(), ADMIN_LOGIN, request).await.unwrap();

        let result = env.service.revert(&regular_user(), ADMIN_LOGIN).await;

        assert!(matches!(result, Err(ServiceError::AccessDenied)));
        assert!(env
            .translations
            .has_override(&subject_key(ADMIN_LOGIN), "en")
            .await
            .unwrap());
    }
}

// =============================================================================
// Update Tests
// =============================================================================

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_update_records_audit_trail() {
        let env = create_test_environment();
        let default_subject = default_text(&env, &subject_key(ADMIN_LOGIN));

        let new_subject = "[%{site_name}] Admin login alert from %{location}".to_string();
        let new_body =
            "We noticed a new admin login from %{location}. If this was not you, secure your \
             account on %{site_name} right away."
                .to_string();

        let template = env
            .service
            .update(
                &admin(),
                ADMIN_LOGIN,
                UpdateEmailTemplateRequest {
                    subject: new_subject.clone(),
                    body: new_body.clone(),
                },
            )
            .await
            .unwrap();

        assert!(template.can_revert);
        assert_eq!(template.subject.as_text(), Some(new_subject.as_str()));
        assert_eq!(template.body, new_body);

        // One record per changed field, both from the same commit.
        assert_eq!(env.storage.audit_count().await.unwrap(), 2);

        let subject_trail = env
            .storage
            .audit_records(&subject_key(ADMIN_LOGIN))
            .await
            .unwrap();
        assert_eq!(subject_trail.len(), 1);
        assert_eq!(subject_trail[0].action, AuditAction::ChangeSiteText);
        assert_eq!(subject_trail[0].actor, "admin-1");
        assert_eq!(subject_trail[0].previous_value, Some(default_subject));
        assert_eq!(subject_trail[0].new_value, Some(new_subject));
    }

    #[tokio::test]
    async fn test_placeholder_mismatch_rejects_whole_edit() {
        let env = create_test_environment();

        // Subject drops %{location} and invents %{when}; the body change on
        // its own would be fine.
        let result = env
            .service
            .update(
                &admin(),
                ADMIN_LOGIN,
                UpdateEmailTemplateRequest {
                    subject: "New admin login at %{when} on %{site_name}".to_string(),
                    body: "We noticed a new admin login from %{location}. If this was not you, \
                           secure your account on %{site_name} right away."
                        .to_string(),
                },
            )
            .await;

        match result {
            Err(ServiceError::ValidationFailed(messages)) => {
                assert_eq!(messages.len(), 1);
                assert_eq!(
                    messages[0],
                    "<b>Subject</b>: invalid interpolation keys: location, when"
                );
            }
            other => panic!("expected validation failure, got {:?}", other),
        }

        // The valid body field must not have been written either.
        assert_eq!(env.storage.override_count().await.unwrap(), 0);
        assert_eq!(env.storage.audit_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_both_fields_invalid_reports_two_errors() {
        let env = create_test_environment();

        let result = env
            .service
            .update(
                &admin(),
                ADMIN_LOGIN,
                UpdateEmailTemplateRequest {
                    subject: "New admin login at %{when} on %{site_name}".to_string(),
                    body: "Someone logged in.".to_string(),
                },
            )
            .await;

        match result {
            Err(ServiceError::ValidationFailed(messages)) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(
                    messages[0],
                    "<b>Subject</b>: invalid interpolation keys: location, when"
                );
                assert_eq!(
                    messages[1],
                    "<b>Body</b>: invalid interpolation keys: location, site_name"
                );
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_is_visible_immediately() {
        let env = create_test_environment();
        let new_subject = "[%{site_name}] Someone signed in from %{location}".to_string();

        env.service
            .update(
                &admin(),
                ADMIN_LOGIN,
                UpdateEmailTemplateRequest {
                    subject: new_subject.clone(),
                    body: default_text(&env, &body_key(ADMIN_LOGIN)),
                },
            )
            .await
            .unwrap();

        let templates = env.service.list(&admin()).await.unwrap();
        let template = templates.iter().find(|t| t.id == ADMIN_LOGIN).unwrap();

        assert_eq!(template.subject.as_text(), Some(new_subject.as_str()));
        assert!(template.can_revert);
    }

    #[tokio::test]
    async fn test_second_update_layers_on_first() {
        let env = create_test_environment();
        let body = default_text(&env, &body_key(ADMIN_LOGIN));

        let first = "[%{site_name}] Admin sign-in from %{location}".to_string();
        let second = "[%{site_name}] Admin sign-in seen at %{location}".to_string();

        env.service
            .update(
                &admin(),
                ADMIN_LOGIN,
                UpdateEmailTemplateRequest {
                    subject: first.clone(),
                    body: body.clone(),
                },
            )
            .await
            .unwrap();

        let template = env
            .service
            .update(
                &admin(),
                ADMIN_LOGIN,
                UpdateEmailTemplateRequest {
                    subject: second.clone(),
                    body,
                },
            )
            .await
            .unwrap();

        assert_eq!(template.subject.as_text(), Some(second.as_str()));

        // Newest first, each carrying the value it replaced.
        let trail = env
            .storage
            .audit_records(&subject_key(ADMIN_LOGIN))
            .await
            .unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].previous_value, Some(first.clone()));
        assert_eq!(trail[0].new_value, Some(second));
        assert_eq!(trail[1].new_value, Some(first));
    }
}

// =============================================================================
// Plural Subject Tests
// =============================================================================

mod plural_subject_tests {
    use super::*;

    #[tokio::test]
    async fn test_plural_subject_field_is_skipped() {
        let env = create_test_environment();

        let new_body = "You have pending signups on %{site_name}. Review them at %{review_link} \
                        when you get a chance."
            .to_string();

        let template = env
            .service
            .update(
                &admin(),
                PENDING_USERS,
                UpdateEmailTemplateRequest {
                    // Would fail placeholder checks against either plural form;
                    // the field is ignored instead.
                    subject: "all pending users".to_string(),
                    body: new_body.clone(),
                },
            )
            .await
            .unwrap();

        assert!(template.subject.is_plural());
        assert_eq!(template.body, new_body);
        assert!(template.can_revert);

        // Only the body change was recorded.
        assert_eq!(env.storage.audit_count().await.unwrap(), 1);
        let trail = env
            .storage
            .audit_records(&body_key(PENDING_USERS))
            .await
            .unwrap();
        assert_eq!(trail.len(), 1);
    }

    #[tokio::test]
    async fn test_plural_subject_does_not_mask_body_errors() {
        let env = create_test_environment();

        let result = env
            .service
            .update(
                &admin(),
                PENDING_USERS,
                UpdateEmailTemplateRequest {
                    subject: "all pending users".to_string(),
                    body: "You have pending signups on %{site_name}.".to_string(),
                },
            )
            .await;

        match result {
            Err(ServiceError::ValidationFailed(messages)) => {
                assert_eq!(messages.len(), 1);
                assert_eq!(
                    messages[0],
                    "<b>Body</b>: invalid interpolation keys: review_link"
                );
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}

// =============================================================================
// Revert Tests
// =============================================================================

mod revert_tests {
    use super::*;

    #[tokio::test]
    async fn test_revert_restores_defaults() {
        let env = create_test_environment();
        let default_subject = default_text(&env, &subject_key(ADMIN_LOGIN));
        let default_body = default_text(&env, &body_key(ADMIN_LOGIN));

        let override_subject = "[%{site_name}] Admin login alert from %{location}".to_string();
        env.service
            .update(
                &admin(),
                ADMIN_LOGIN,
                UpdateEmailTemplateRequest {
                    subject: override_subject.clone(),
                    body: "We noticed a new admin login from %{location}. If this was not you, \
                           secure your account on %{site_name} right away."
                        .to_string(),
                },
            )
            .await
            .unwrap();

        let template = env.service.revert(&admin(), ADMIN_LOGIN).await.unwrap();

        assert!(!template.can_revert);
        assert_eq!(template.subject.as_text(), Some(default_subject.as_str()));
        assert_eq!(template.body, default_body);
        assert_eq!(env.storage.override_count().await.unwrap(), 0);

        // Two update records plus two revert records.
        assert_eq!(env.storage.audit_count().await.unwrap(), 4);

        let trail = env
            .storage
            .audit_records(&subject_key(ADMIN_LOGIN))
            .await
            .unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].previous_value, Some(override_subject));
        assert_eq!(trail[0].new_value, Some(default_subject));
    }

    #[tokio::test]
    async fn test_revert_without_override_is_noop() {
        let env = create_test_environment();

        let template = env.service.revert(&admin(), ADMIN_LOGIN).await.unwrap();

        assert!(!template.can_revert);
        assert_eq!(env.storage.audit_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revert_unknown_template() {
        let env = create_test_environment();

        let result = env.service.revert(&admin(), "non_existent_template").await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}

// =============================================================================
// Resolution Tests
// =============================================================================

mod resolution_tests {
    use super::*;

    #[tokio::test]
    async fn test_all_known_templates_resolve() {
        let env = create_test_environment();

        let templates = env.service.list(&admin()).await.unwrap();

        assert_eq!(templates.len(), 8);
        for template in &templates {
            assert!(!template.title.is_empty());
            assert!(!template.body.is_empty());
            assert!(!template.can_revert);
        }

        let ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_unknown_template_update_is_not_found() {
        let env = create_test_environment();

        let result = env
            .service
            .update(
                &admin(),
                "non_existent_template",
                UpdateEmailTemplateRequest {
                    subject: "anything".to_string(),
                    body: "anything".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(env.storage.override_count().await.unwrap(), 0);
    }
}
