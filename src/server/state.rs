use std::sync::Arc;
use std::time::Instant;

use crate::auth::JwtValidator;
use crate::config::Settings;
use crate::email_templates::EmailTemplateService;
use crate::i18n::{Catalog, CatalogError, Translations};
use crate::storage::TemplateStorage;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub jwt_validator: Arc<JwtValidator>,
    pub storage: Arc<dyn TemplateStorage>,
    pub translations: Arc<Translations>,
    pub email_templates: Arc<EmailTemplateService>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        settings: Settings,
        storage: Arc<dyn TemplateStorage>,
    ) -> Result<Self, CatalogError> {
        let jwt_validator = Arc::new(JwtValidator::new(&settings.jwt));

        let catalog = Catalog::builtin()?;
        let translations = Arc::new(Translations::new(catalog, storage.clone()));
        let email_templates = Arc::new(EmailTemplateService::new(
            translations.clone(),
            &settings.i18n.default_locale,
        ));

        Ok(Self {
            settings: Arc::new(settings),
            jwt_validator,
            storage,
            translations,
            email_templates,
            start_time: Instant::now(),
        })
    }
}
