//! Transactional email provider integration.
//!
//! The service talks to the provider for three things: creating a hosted
//! template, replacing the content of a hosted template, and sending an email
//! rendered from a hosted template. [`EmailProvider`] abstracts those calls so
//! the Postmark HTTP client can be swapped for the in-memory backend in local
//! development and tests.

mod factory;
mod memory;
mod postmark;

pub use factory::create_provider;
pub use memory::{MemoryProvider, ProviderCall};
pub use postmark::PostmarkClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::TemplateType;

/// Errors returned by provider backends.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request never produced a response (connect failure, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("Provider rejected request (HTTP {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    /// HTTP client could not be configured
    #[error("Failed to build provider client: {0}")]
    Client(String),

    /// Failure injected into the memory backend
    #[error("Injected provider failure: {0}")]
    Injected(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Link tracking mode for outgoing email
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackLinks {
    None,
    #[default]
    HtmlAndText,
    HtmlOnly,
    TextOnly,
}

/// Content for a template created on the provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewProviderTemplate {
    pub name: String,
    pub alias: String,
    pub template_type: TemplateType,
    pub layout_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
}

/// Replacement content pushed onto an existing provider template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderTemplateEdit {
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
}

/// Template summary returned by the provider
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderTemplate {
    pub template_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// An email rendered by the provider from a hosted template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplatedEmail {
    pub from: String,
    pub to: String,
    pub template_id: i64,
    pub template_model: serde_json::Value,
    pub track_opens: bool,
    pub track_links: TrackLinks,
}

/// Provider acknowledgement of a submitted email
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendReceipt {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the transactional email provider.
///
/// Calls are awaited to completion and never retried; failures propagate to
/// the caller unchanged.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Backend identifier for logging
    fn backend_type(&self) -> &'static str;

    /// Create a hosted template. The returned `template_id` names the family.
    async fn create_template(
        &self,
        template: NewProviderTemplate,
    ) -> ProviderResult<ProviderTemplate>;

    /// Replace alias and content of an existing hosted template.
    async fn edit_template(
        &self,
        template_id: i64,
        edit: ProviderTemplateEdit,
    ) -> ProviderResult<ProviderTemplate>;

    /// Send an email rendered from a hosted template.
    async fn send_email_with_template(&self, email: TemplatedEmail) -> ProviderResult<SendReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_template_wire_format() {
        let body = NewProviderTemplate {
            name: "Welcome".to_string(),
            alias: "welcome-v1".to_string(),
            template_type: TemplateType::Standard,
            layout_template: None,
            subject: Some("Hi".to_string()),
            html_body: Some("<p>Hi</p>".to_string()),
            text_body: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["Name"], "Welcome");
        assert_eq!(value["Alias"], "welcome-v1");
        assert_eq!(value["TemplateType"], "Standard");
        assert_eq!(value["LayoutTemplate"], serde_json::Value::Null);
        assert_eq!(value["HtmlBody"], "<p>Hi</p>");
        assert!(value.get("TextBody").is_none());
        assert_eq!(value["Subject"], "Hi");
    }

    #[test]
    fn test_layout_wire_format_omits_subject() {
        let body = NewProviderTemplate {
            name: "Base Layout".to_string(),
            alias: "base-layout-v1".to_string(),
            template_type: TemplateType::Layout,
            layout_template: None,
            subject: None,
            html_body: Some("<html>{{{@content}}}</html>".to_string()),
            text_body: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["TemplateType"], "Layout");
        assert!(value.get("Subject").is_none());

        let edit = ProviderTemplateEdit {
            alias: "base-layout-v2".to_string(),
            subject: None,
            html_body: None,
            text_body: Some("{{{@content}}}".to_string()),
        };
        let value = serde_json::to_value(&edit).unwrap();
        assert!(value.get("Subject").is_none());
        assert_eq!(value["TextBody"], "{{{@content}}}");
    }

    #[test]
    fn test_send_receipt_decodes_message_id() {
        let receipt: SendReceipt = serde_json::from_value(json!({
            "To": "user@example.com",
            "SubmittedAt": "2024-01-01T00:00:00Z",
            "MessageID": "b7bc2f4a-e38e-4336-af7d-e6c392c2f817",
            "ErrorCode": 0,
            "Message": "OK"
        }))
        .unwrap();

        assert_eq!(receipt.message_id, "b7bc2f4a-e38e-4336-af7d-e6c392c2f817");
        assert_eq!(receipt.error_code, 0);
    }

    #[test]
    fn test_templated_email_wire_format() {
        let email = TemplatedEmail {
            from: "team@example.com".to_string(),
            to: "user@example.com".to_string(),
            template_id: 7,
            template_model: json!({"name": "Ada"}),
            track_opens: true,
            track_links: TrackLinks::HtmlAndText,
        };

        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(value["TemplateId"], 7);
        assert_eq!(value["TrackOpens"], true);
        assert_eq!(value["TrackLinks"], "HtmlAndText");
        assert_eq!(value["TemplateModel"]["name"], "Ada");
    }
}
