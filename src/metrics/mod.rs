//! Prometheus metrics for the mail service.
//!
//! This module provides metrics for monitoring the service:
//! - Template lifecycle metrics (create, edit, revert outcomes, stored versions)
//! - Provider metrics (requests by operation and outcome, latency)
//! - Email metrics (sent, opened, clicked)

mod helpers;

pub use helpers::{encode_metrics, EmailMetrics, ProviderMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "ara_mail";

lazy_static! {
    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Template lifecycle operations by operation and outcome
    pub static ref TEMPLATE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_operations_total", METRIC_PREFIX),
        "Total template lifecycle operations",
        &["operation", "outcome"]
    ).unwrap();

    /// Number of template versions held in the store
    pub static ref TEMPLATE_VERSIONS_STORED: IntGauge = register_int_gauge!(
        format!("{}_template_versions_stored", METRIC_PREFIX),
        "Number of template versions held in the store"
    ).unwrap();

    // ============================================================================
    // Provider Metrics
    // ============================================================================

    /// Provider API requests by operation and outcome
    pub static ref PROVIDER_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_provider_requests_total", METRIC_PREFIX),
        "Total email provider API requests",
        &["operation", "outcome"]
    ).unwrap();

    /// Provider API latency by operation
    pub static ref PROVIDER_REQUEST_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_provider_request_latency_seconds", METRIC_PREFIX),
        "Email provider API latency in seconds",
        &["operation"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    // ============================================================================
    // Email Metrics
    // ============================================================================

    /// Emails submitted to the provider
    pub static ref EMAILS_SENT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_sent_total", METRIC_PREFIX),
        "Total emails submitted to the provider"
    ).unwrap();

    /// Open events received from the provider
    pub static ref EMAIL_OPENS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_email_opens_total", METRIC_PREFIX),
        "Total email open events recorded"
    ).unwrap();

    /// Click events received from the provider
    pub static ref EMAIL_CLICKS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_email_clicks_total", METRIC_PREFIX),
        "Total email link click events recorded"
    ).unwrap();
}
