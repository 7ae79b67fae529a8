//! Storage backends for translation overrides and the audit trail.
//!
//! This module defines the abstraction layer for override storage, allowing
//! different implementations (memory, PostgreSQL) to be used interchangeably.
//! All writes of one admin operation travel in a [`WriteBatch`] and are
//! committed as a unit.

mod memory;
mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::audit::AuditRecord;
use crate::config::{DatabaseConfig, StorageConfig};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
}

/// A single override mutation within a batch.
#[derive(Debug, Clone)]
pub enum OverrideWrite {
    /// Create or replace the override for (key, locale).
    Upsert {
        key: String,
        locale: String,
        value: String,
    },

    /// Remove the override for (key, locale). Absent rows are a no-op.
    Delete { key: String, locale: String },
}

impl OverrideWrite {
    /// The (key, locale) pair this write touches.
    pub fn target(&self) -> (String, String) {
        match self {
            OverrideWrite::Upsert { key, locale, .. } | OverrideWrite::Delete { key, locale } => {
                (key.clone(), locale.clone())
            }
        }
    }
}

/// All writes of one admin operation, committed together.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    /// Override rows to create, replace, or remove
    pub overrides: Vec<OverrideWrite>,

    /// Audit records describing the changes
    pub audit: Vec<AuditRecord>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.audit.is_empty()
    }

    pub fn upsert(&mut self, key: &str, locale: &str, value: &str) {
        self.overrides.push(OverrideWrite::Upsert {
            key: key.to_string(),
            locale: locale.to_string(),
            value: value.to_string(),
        });
    }

    pub fn delete(&mut self, key: &str, locale: &str) {
        self.overrides.push(OverrideWrite::Delete {
            key: key.to_string(),
            locale: locale.to_string(),
        });
    }

    pub fn record(&mut self, record: AuditRecord) {
        self.audit.push(record);
    }
}

/// Backend trait for override and audit storage.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) as they are shared
/// across request handlers.
///
/// # Atomicity
///
/// [`commit`](TemplateStorage::commit) applies a whole batch or none of it.
/// The PostgreSQL backend wraps the batch in one transaction; the memory
/// backend applies it under a single lock.
#[async_trait]
pub trait TemplateStorage: Send + Sync {
    /// Backend type identifier for stats and logging.
    fn backend_kind(&self) -> &'static str;

    /// Current override value for (key, locale), if any.
    async fn override_value(&self, key: &str, locale: &str)
        -> Result<Option<String>, StorageError>;

    /// Number of override rows currently stored.
    async fn override_count(&self) -> Result<usize, StorageError>;

    /// Apply all writes of a batch as one unit.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError>;

    /// Audit records for a subject key, newest first.
    async fn audit_records(&self, subject: &str) -> Result<Vec<AuditRecord>, StorageError>;

    /// Total number of audit records.
    async fn audit_count(&self) -> Result<usize, StorageError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Create a storage backend based on configuration.
///
/// Returns the appropriate implementation based on the `backend` setting:
/// - `"postgres"`: connects a pool from the `database` settings
/// - `"memory"` (default): in-memory storage
pub async fn create_storage(
    storage: &StorageConfig,
    database: Option<&DatabaseConfig>,
) -> Result<Arc<dyn TemplateStorage>, StorageError> {
    match storage.backend.as_str() {
        "postgres" => {
            if let Some(config) = database {
                let backend = PostgresStorage::connect(config).await?;
                tracing::info!(backend = "postgres", "Created PostgreSQL template storage");
                Ok(Arc::new(backend))
            } else {
                tracing::warn!(
                    "PostgreSQL backend requested but no database configured, falling back to memory"
                );
                Ok(Arc::new(MemoryStorage::new()))
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Created memory template storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
