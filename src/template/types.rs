//! Template version types and request definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::provider::ProviderError;

use super::store::StoreError;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider request failed: {0}")]
    Provider(#[from] ProviderError),

    /// Version sequencing was asked for a family without history.
    #[error("Version sequencing precondition violated: {0}")]
    Sequencing(String),

    #[error("Template store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Provider-side template kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateType {
    #[default]
    Standard,
    Layout,
}

/// One immutable snapshot of a template's content.
///
/// Only `active` ever changes after creation; edits produce a new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersion {
    /// Provider-assigned family identifier, stable across versions
    pub template_id: i64,

    /// Unique identifier of this snapshot
    pub version_id: Uuid,

    /// Position within the family, starting at 1
    pub version_number: u32,

    /// Whether this is the live version of the family
    pub active: bool,

    /// External identifier derived from name and version number
    pub alias: String,

    pub created_at: DateTime<Utc>,

    pub name: String,

    #[serde(default)]
    pub template_type: TemplateType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_template: Option<String>,

    /// Absent for layouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
}

/// Request to create a new template family
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    /// Human-readable template name
    pub name: String,

    /// Template kind (optional, defaults to Standard)
    #[serde(default)]
    pub template_type: TemplateType,

    /// Alias of the layout to wrap this template in (optional)
    #[serde(default)]
    pub layout_template: Option<String>,

    /// Required for standard templates, not accepted by layouts
    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub html_body: Option<String>,

    #[serde(default)]
    pub text_body: Option<String>,
}

impl CreateTemplateRequest {
    /// Validate the request
    pub fn validate(&self) -> TemplateResult<()> {
        if self.name.trim().is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidArgument(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        if self.template_type == TemplateType::Layout && self.layout_template.is_some() {
            return Err(TemplateError::InvalidArgument(
                "A layout cannot itself use a layout template".to_string(),
            ));
        }

        validate_content(
            self.template_type,
            self.subject.as_deref(),
            &self.html_body,
            &self.text_body,
        )
    }
}

/// Request to edit the active version of a template family
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTemplateRequest {
    /// Template family to edit
    pub id: i64,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub html_body: Option<String>,

    #[serde(default)]
    pub text_body: Option<String>,
}

impl EditTemplateRequest {
    /// Validate the request against the kind of the family being edited
    pub fn validate(&self, template_type: TemplateType) -> TemplateResult<()> {
        validate_content(
            template_type,
            self.subject.as_deref(),
            &self.html_body,
            &self.text_body,
        )
    }
}

/// Request to make an earlier version the active one again
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertTemplateRequest {
    /// Template family to revert
    pub id: i64,

    /// Version to restore
    pub target_version_id: Uuid,
}

/// Response wrapping a single template version
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: TemplateVersion,
}

/// Response for listing template versions
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// List of template versions
    pub templates: Vec<TemplateVersion>,

    /// Total count
    pub total: usize,
}

fn validate_content(
    template_type: TemplateType,
    subject: Option<&str>,
    html_body: &Option<String>,
    text_body: &Option<String>,
) -> TemplateResult<()> {
    match (template_type, subject) {
        (TemplateType::Standard, None) => {
            return Err(TemplateError::InvalidArgument(
                "Subject is required for standard templates".to_string(),
            ));
        }
        (TemplateType::Standard, Some(subject)) if subject.trim().is_empty() => {
            return Err(TemplateError::InvalidArgument(
                "Subject must not be empty".to_string(),
            ));
        }
        (TemplateType::Layout, Some(_)) => {
            return Err(TemplateError::InvalidArgument(
                "Layouts do not have a subject".to_string(),
            ));
        }
        _ => {}
    }

    if html_body.is_none() && text_body.is_none() {
        return Err(TemplateError::InvalidArgument(
            "Either htmlBody or textBody is required".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request(name: &str) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: name.to_string(),
            template_type: TemplateType::Standard,
            layout_template: None,
            subject: Some("Hello".to_string()),
            html_body: Some("<p>Hi</p>".to_string()),
            text_body: None,
        }
    }

    #[test]
    fn test_create_request_validation_valid() {
        assert!(create_request("Welcome").validate().is_ok());
    }

    #[test]
    fn test_create_request_validation_empty_name() {
        assert!(matches!(
            create_request("  ").validate(),
            Err(TemplateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_create_request_requires_a_body() {
        let mut request = create_request("Welcome");
        request.html_body = None;

        assert!(matches!(
            request.validate(),
            Err(TemplateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_create_request_defaults_template_type() {
        let request: CreateTemplateRequest = serde_json::from_value(json!({
            "name": "Welcome",
            "subject": "Hi {{name}}",
            "textBody": "Hello"
        }))
        .unwrap();

        assert_eq!(request.template_type, TemplateType::Standard);
        assert!(request.layout_template.is_none());
    }

    #[test]
    fn test_create_standard_requires_subject() {
        let mut request = create_request("Welcome");
        request.subject = None;

        assert!(matches!(
            request.validate(),
            Err(TemplateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_create_layout_without_subject() {
        let request: CreateTemplateRequest = serde_json::from_value(json!({
            "name": "Base Layout",
            "templateType": "Layout",
            "htmlBody": "<html>{{{@content}}}</html>"
        }))
        .unwrap();

        assert_eq!(request.template_type, TemplateType::Layout);
        assert!(request.subject.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_layout_rejects_subject_and_nested_layout() {
        let mut request = create_request("Base Layout");
        request.template_type = TemplateType::Layout;
        assert!(matches!(
            request.validate(),
            Err(TemplateError::InvalidArgument(_))
        ));

        request.subject = None;
        request.layout_template = Some("outer".to_string());
        assert!(matches!(
            request.validate(),
            Err(TemplateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_edit_validation_follows_template_type() {
        let request = EditTemplateRequest {
            id: 1,
            subject: None,
            html_body: Some("<html>{{{@content}}}</html>".to_string()),
            text_body: None,
        };

        assert!(request.validate(TemplateType::Layout).is_ok());
        assert!(matches!(
            request.validate(TemplateType::Standard),
            Err(TemplateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_version_serializes_camel_case() {
        let version = TemplateVersion {
            template_id: 42,
            version_id: Uuid::nil(),
            version_number: 1,
            active: true,
            alias: "welcome-v1".to_string(),
            created_at: Utc::now(),
            name: "Welcome".to_string(),
            template_type: TemplateType::Standard,
            layout_template: None,
            subject: Some("Hi".to_string()),
            html_body: None,
            text_body: Some("Hello".to_string()),
        };

        let value = serde_json::to_value(&version).unwrap();
        assert_eq!(value["templateId"], 42);
        assert_eq!(value["versionNumber"], 1);
        assert_eq!(value["templateType"], "Standard");
        assert_eq!(value["textBody"], "Hello");
        assert!(value.get("htmlBody").is_none());
        assert_eq!(value["subject"], "Hi");
    }
}
