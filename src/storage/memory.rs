//! In-memory storage backend.
//!
//! The default backend for development and tests. Overrides live in a
//! `DashMap`; the audit trail is an append-only vector.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::audit::AuditRecord;

use super::{OverrideWrite, StorageError, TemplateStorage, WriteBatch};

pub struct MemoryStorage {
    overrides: DashMap<(String, String), String>,
    audit: RwLock<Vec<AuditRecord>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            overrides: DashMap::new(),
            audit: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TemplateStorage for MemoryStorage {
    fn backend_kind(&self) -> &'static str {
        "memory"
    }

    async fn override_value(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<Option<String>, StorageError> {
        Ok(self
            .overrides
            .get(&(key.to_string(), locale.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn override_count(&self) -> Result<usize, StorageError> {
        Ok(self.overrides.len())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError> {
        // The audit lock is held across the whole batch: readers observe
        // either none or all of a commit.
        let mut audit = self.audit.write().await;

        for write in batch.overrides {
            match write {
                OverrideWrite::Upsert { key, locale, value } => {
                    self.overrides.insert((key, locale), value);
                }
                OverrideWrite::Delete { key, locale } => {
                    self.overrides.remove(&(key, locale));
                }
            }
        }

        audit.extend(batch.audit);
        Ok(())
    }

    async fn audit_records(&self, subject: &str) -> Result<Vec<AuditRecord>, StorageError> {
        let audit = self.audit.read().await;

        let mut records: Vec<AuditRecord> = audit
            .iter()
            .filter(|record| record.subject == subject)
            .cloned()
            .collect();
        records.reverse();

        Ok(records)
    }

    async fn audit_count(&self) -> Result<usize, StorageError> {
        Ok(self.audit.read().await.len())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
