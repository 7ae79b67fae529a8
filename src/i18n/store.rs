//! Translation store: catalog defaults with stored overrides on top.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::storage::{StorageError, TemplateStorage, WriteBatch};

use super::catalog::{Catalog, TranslationValue};

/// Locale-aware translation lookup.
///
/// Resolution order for a (key, locale) pair: stored override first, then
/// the compiled-in catalog (which itself falls back to the default locale).
/// Resolved override lookups are cached per (key, locale); [`apply`]
/// invalidates the touched entries in the same call that commits a write,
/// so a read issued after `apply` returns always sees the new value. A read
/// that overlaps a commit discards its result instead of caching it.
///
/// [`apply`]: Translations::apply
pub struct Translations {
    catalog: Catalog,
    storage: Arc<dyn TemplateStorage>,
    // (key, locale) -> override value; None caches a known miss.
    cache: DashMap<(String, String), Option<String>>,
    // Bumped by `apply` before it evicts. A reader snapshots this before
    // going to storage; a changed value means a commit landed mid-read and
    // the fetched result may predate it.
    generation: AtomicU64,
}

impl Translations {
    pub fn new(catalog: Catalog, storage: Arc<dyn TemplateStorage>) -> Self {
        Self {
            catalog,
            storage,
            cache: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn default_locale(&self) -> &str {
        self.catalog.default_locale()
    }

    /// The shipped default for a key, ignoring overrides.
    pub fn default_value(&self, key: &str, locale: &str) -> Option<&TranslationValue> {
        self.catalog.get(key, locale)
    }

    /// Effective value: override if present, otherwise the shipped default.
    pub async fn effective(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<Option<TranslationValue>, StorageError> {
        let stored = self.override_value(key, locale).await?;

        Ok(match stored {
            Some(text) => Some(TranslationValue::Text(text)),
            None => self.catalog.get(key, locale).cloned(),
        })
    }

    /// Current override for (key, locale), if any. Cached.
    pub async fn override_value(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<Option<String>, StorageError> {
        let cache_key = (key.to_string(), locale.to_string());

        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached.value().clone());
        }

        let generation = self.generation.load(Ordering::Acquire);
        let stored = self.storage.override_value(key, locale).await?;

        // The entry guard holds the map shard, so a concurrent eviction
        // either runs after this insert (and removes it) or has already
        // bumped the generation, in which case the result is stale and
        // must not be cached.
        let entry = self.cache.entry(cache_key);
        if self.generation.load(Ordering::Acquire) == generation {
            entry.insert(stored.clone());
        }

        Ok(stored)
    }

    pub async fn has_override(&self, key: &str, locale: &str) -> Result<bool, StorageError> {
        Ok(self.override_value(key, locale).await?.is_some())
    }

    /// Commit a batch, then drop the affected cache entries before returning.
    pub async fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        let touched: Vec<(String, String)> =
            batch.overrides.iter().map(|write| write.target()).collect();

        self.storage.commit(batch).await?;

        // Bump before evicting so readers that fetched from storage ahead
        // of this commit skip their cache fill.
        self.generation.fetch_add(1, Ordering::AcqRel);
        for target in touched {
            self.cache.remove(&target);
        }

        Ok(())
    }
}
