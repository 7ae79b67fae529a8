//! Shipped translation catalog.
//!
//! The catalog is the read-only baseline: every key the service knows about
//! ships with a default value, compiled into the binary from
//! `locales/<locale>.json`. Overrides layered on top of it live in storage
//! and never add new keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plural categories a plural-form value may carry.
///
/// The set follows CLDR; `other` is the required fallback form.
pub const PLURAL_FORM_KEYS: &[&str] = &["zero", "one", "two", "few", "many", "other"];

// Mail bodies render as plain text and never carry plural forms; a plural
// value under such a key is rejected when the catalog loads.
const BODY_TEMPLATE_SUFFIX: &str = ".text_body_template";

/// Catalog-specific error type
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse translation catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid plural value for '{key}': {reason}")]
    InvalidPlural { key: String, reason: String },
}

/// A single catalog value: plain text or a plural-form table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationValue {
    /// A single translated string.
    Text(String),

    /// Plural forms keyed by CLDR category (`one`, `other`, ...).
    Plural(BTreeMap<String, String>),
}

impl TranslationValue {
    /// The text content, if this is a plain string value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TranslationValue::Text(text) => Some(text),
            TranslationValue::Plural(_) => None,
        }
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, TranslationValue::Plural(_))
    }
}

/// Immutable translation defaults, keyed by locale and dotted key.
#[derive(Debug, Clone)]
pub struct Catalog {
    locales: BTreeMap<String, BTreeMap<String, TranslationValue>>,
    default_locale: String,
}

impl Catalog {
    /// Build the catalog that ships with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let entries: BTreeMap<String, TranslationValue> =
            serde_json::from_str(include_str!("../../locales/en.json"))?;

        let mut locales = BTreeMap::new();
        locales.insert("en".to_string(), entries);

        Self::from_locales(locales, "en")
    }

    /// Build a catalog from explicit per-locale entries.
    pub fn from_locales(
        locales: BTreeMap<String, BTreeMap<String, TranslationValue>>,
        default_locale: &str,
    ) -> Result<Self, CatalogError> {
        for entries in locales.values() {
            for (key, value) in entries {
                validate_value(key, value)?;
            }
        }

        Ok(Self {
            locales,
            default_locale: default_locale.to_string(),
        })
    }

    /// Register the entries for an additional locale.
    pub fn add_locale(
        &mut self,
        locale: &str,
        entries: BTreeMap<String, TranslationValue>,
    ) -> Result<(), CatalogError> {
        for (key, value) in &entries {
            validate_value(key, value)?;
        }

        self.locales.insert(locale.to_string(), entries);
        Ok(())
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Look up a key, falling back to the default locale when the requested
    /// locale has no entry.
    pub fn get(&self, key: &str, locale: &str) -> Option<&TranslationValue> {
        self.locales
            .get(locale)
            .and_then(|entries| entries.get(key))
            .or_else(|| {
                self.locales
                    .get(&self.default_locale)
                    .and_then(|entries| entries.get(key))
            })
    }

    /// Whether the key exists in the default locale.
    pub fn contains(&self, key: &str) -> bool {
        self.locales
            .get(&self.default_locale)
            .is_some_and(|entries| entries.contains_key(key))
    }

    /// All keys of the default locale, in sorted order.
    pub fn default_keys(&self) -> Vec<&str> {
        self.locales
            .get(&self.default_locale)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

fn validate_value(key: &str, value: &TranslationValue) -> Result<(), CatalogError> {
    let forms = match value {
        TranslationValue::Text(_) => return Ok(()),
        TranslationValue::Plural(forms) => forms,
    };

    if key.ends_with(BODY_TEMPLATE_SUFFIX) {
        return Err(CatalogError::InvalidPlural {
            key: key.to_string(),
            reason: "body templates must be plain text".to_string(),
        });
    }

    if !forms.contains_key("other") {
        return Err(CatalogError::InvalidPlural {
            key: key.to_string(),
            reason: "missing required 'other' form".to_string(),
        });
    }

    for form in forms.keys() {
        if !PLURAL_FORM_KEYS.contains(&form.as_str()) {
            return Err(CatalogError::InvalidPlural {
                key: key.to_string(),
                reason: format!("unknown plural form '{}'", form),
            });
        }
    }

    Ok(())
}
