//! Locale-aware site text with admin overrides.
//!
//! This module provides:
//! - The compiled-in translation catalog (`Catalog`, `TranslationValue`)
//! - `%{name}` placeholder extraction and validation
//! - The `Translations` store layering stored overrides over the catalog

mod catalog;
mod interpolation;
mod store;

pub use catalog::{Catalog, CatalogError, TranslationValue, PLURAL_FORM_KEYS};
pub use interpolation::{check_placeholders, placeholders, PlaceholderMismatch};
pub use store::Translations;
