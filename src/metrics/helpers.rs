//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    EMAILS_SENT_TOTAL, EMAIL_CLICKS_TOTAL, EMAIL_OPENS_TOTAL, PROVIDER_REQUESTS_TOTAL,
    PROVIDER_REQUEST_LATENCY, TEMPLATE_OPERATIONS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Helper struct for recording template lifecycle metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    /// Record the outcome of a create/edit/revert
    pub fn record(operation: &str, success: bool) {
        TEMPLATE_OPERATIONS_TOTAL
            .with_label_values(&[operation, outcome(success)])
            .inc();
    }
}

/// Helper struct for recording provider API metrics
pub struct ProviderMetrics;

impl ProviderMetrics {
    /// Record a completed provider request
    pub fn record(operation: &str, success: bool, elapsed: Duration) {
        PROVIDER_REQUESTS_TOTAL
            .with_label_values(&[operation, outcome(success)])
            .inc();
        PROVIDER_REQUEST_LATENCY
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }
}

/// Helper struct for recording email metrics
pub struct EmailMetrics;

impl EmailMetrics {
    pub fn record_sent() {
        EMAILS_SENT_TOTAL.inc();
    }

    pub fn record_opened() {
        EMAIL_OPENS_TOTAL.inc();
    }

    pub fn record_clicked() {
        EMAIL_CLICKS_TOTAL.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_metrics_are_encoded() {
        TemplateMetrics::record("create", true);
        ProviderMetrics::record("create_template", false, Duration::from_millis(20));
        EmailMetrics::record_sent();

        let output = encode_metrics().unwrap();
        assert!(output.contains("ara_mail_template_operations_total"));
        assert!(output.contains("ara_mail_provider_requests_total"));
        assert!(output.contains("ara_mail_emails_sent_total"));
    }
}
