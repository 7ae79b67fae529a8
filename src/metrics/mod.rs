//! Prometheus metrics for the email template service.
//!
//! This module provides metrics for monitoring the admin surface:
//! - Template edit metrics (updates, reverts, rejected validations)
//! - Override gauge (rows currently diverging from shipped defaults)
//! - Audit trail counter

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "ara";

lazy_static! {
    /// Total successful email template updates
    pub static ref EMAIL_TEMPLATE_UPDATES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_email_template_updates_total", METRIC_PREFIX),
        "Total successful email template updates"
    ).unwrap();

    /// Total email template reverts to shipped defaults
    pub static ref EMAIL_TEMPLATE_REVERTS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_email_template_reverts_total", METRIC_PREFIX),
        "Total email template reverts to shipped defaults"
    ).unwrap();

    /// Updates rejected by placeholder validation
    pub static ref EMAIL_TEMPLATE_VALIDATION_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_email_template_validation_failures_total", METRIC_PREFIX),
        "Total email template updates rejected by placeholder validation"
    ).unwrap();

    /// Override rows currently stored
    pub static ref ACTIVE_OVERRIDES: IntGauge = register_int_gauge!(
        format!("{}_active_overrides", METRIC_PREFIX),
        "Number of translation override rows currently stored"
    ).unwrap();

    /// Audit records written since the trail began
    pub static ref AUDIT_RECORDS: IntGauge = register_int_gauge!(
        format!("{}_audit_records", METRIC_PREFIX),
        "Total audit records in storage"
    ).unwrap();
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
