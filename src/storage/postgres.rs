//! PostgreSQL storage backend.
//!
//! Persistent implementation of the `TemplateStorage` trait.
//!
//! Table structure:
//! - `translation_overrides` - one row per (translation_key, locale)
//! - `audit_log` - append-only change records

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::audit::{AuditAction, AuditRecord};
use crate::config::DatabaseConfig;

use super::{OverrideWrite, StorageError, TemplateStorage, WriteBatch};

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connect a pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds as u64))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds as u64))
            .connect(&config.url)
            .await?;

        tracing::info!(
            pool_size = config.pool_size,
            "PostgreSQL connection pool created"
        );

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Wrap an existing pool. Callers are responsible for the schema.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the override and audit tables when they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS translation_overrides (
                translation_key TEXT NOT NULL,
                locale          TEXT NOT NULL,
                value           TEXT NOT NULL,
                updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (translation_key, locale)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id             UUID PRIMARY KEY,
                action         TEXT NOT NULL,
                subject        TEXT NOT NULL,
                previous_value TEXT,
                new_value      TEXT,
                actor          TEXT NOT NULL,
                created_at     TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_log_subject ON audit_log(subject)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl TemplateStorage for PostgresStorage {
    fn backend_kind(&self) -> &'static str {
        "postgres"
    }

    async fn override_value(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM translation_overrides WHERE translation_key = $1 AND locale = $2",
        )
        .bind(key)
        .bind(locale)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn override_count(&self) -> Result<usize, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM translation_overrides")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        for write in batch.overrides {
            match write {
                OverrideWrite::Upsert { key, locale, value } => {
                    sqlx::query(
                        r#"
                        INSERT INTO translation_overrides (translation_key, locale, value, updated_at)
                        VALUES ($1, $2, $3, NOW())
                        ON CONFLICT (translation_key, locale)
                        DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
                        "#,
                    )
                    .bind(&key)
                    .bind(&locale)
                    .bind(&value)
                    .execute(&mut *tx)
                    .await?;
                }
                OverrideWrite::Delete { key, locale } => {
                    sqlx::query(
                        "DELETE FROM translation_overrides WHERE translation_key = $1 AND locale = $2",
                    )
                    .bind(&key)
                    .bind(&locale)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        for record in &batch.audit {
            sqlx::query(
                r#"
                INSERT INTO audit_log (id, action, subject, previous_value, new_value, actor, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id)
            .bind(record.action.as_str())
            .bind(&record.subject)
            .bind(&record.previous_value)
            .bind(&record.new_value)
            .bind(&record.actor)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn audit_records(&self, subject: &str) -> Result<Vec<AuditRecord>, StorageError> {
        type Row = (
            Uuid,
            String,
            String,
            Option<String>,
            Option<String>,
            String,
            DateTime<Utc>,
        );

        let rows: Vec<Row> = sqlx::query_as(
            r#"
            SELECT id, action, subject, previous_value, new_value, actor, created_at
            FROM audit_log
            WHERE subject = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .into_iter()
            .filter_map(
                |(id, action, subject, previous_value, new_value, actor, created_at)| {
                    match AuditAction::parse(&action) {
                        Some(action) => Some(AuditRecord {
                            id,
                            action,
                            subject,
                            previous_value,
                            new_value,
                            actor,
                            created_at,
                        }),
                        None => {
                            tracing::warn!(
                                record_id = %id,
                                action = %action,
                                "Unknown audit action in storage, skipping"
                            );
                            None
                        }
                    }
                },
            )
            .collect();

        Ok(records)
    }

    async fn audit_count(&self) -> Result<usize, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
