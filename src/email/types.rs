//! Email, click and webhook types

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::provider::{ProviderError, TrackLinks};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("{0}")]
    NotFound(String),

    #[error("Provider request failed: {0}")]
    Provider(#[from] ProviderError),
}

pub type EmailResult<T> = Result<T, EmailError>;

/// A submitted email and its engagement state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    /// Provider message id
    pub id: String,
    pub user_id: Uuid,
    pub template_id: i64,
    /// Template version that was active when the email was sent
    pub template_version_id: Uuid,
    pub track_opens: bool,
    #[serde(rename = "trackClicks")]
    pub track_links: TrackLinks,
    pub to: String,
    pub submitted: bool,
    pub submitted_at: Option<String>,
    pub error_code: i64,
    pub opened: bool,
    pub opened_at: Option<String>,
}

/// A tracked link click reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    pub id: Uuid,
    pub email_id: String,
    pub recipient: Option<String>,
    pub clicked_at: Option<String>,
    pub click_location: Option<String>,
    pub original_link: Option<String>,
    pub platform: Option<String>,
    pub user_agent: Option<String>,
    pub geo: Option<serde_json::Value>,
    pub client: Option<serde_json::Value>,
    pub os: Option<serde_json::Value>,
}

/// Request to send a templated email to a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub user_id: Uuid,
    pub template_id: i64,
    /// Variables rendered into the template (defaults to `{}`)
    #[serde(default)]
    pub template_model: Option<serde_json::Value>,
    #[serde(default)]
    pub track_opens: Option<bool>,
    #[serde(default)]
    pub track_clicks: Option<TrackLinks>,
}

/// Provider open webhook payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenEvent {
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(default)]
    pub received_at: Option<String>,
}

/// Provider click webhook payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClickEvent {
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub received_at: Option<String>,
    #[serde(default)]
    pub click_location: Option<String>,
    #[serde(default)]
    pub original_link: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub geo: Option<serde_json::Value>,
    #[serde(default)]
    pub client: Option<serde_json::Value>,
    #[serde(default, rename = "OS")]
    pub os: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub email: Email,
}

#[derive(Debug, Serialize)]
pub struct EmailListResponse {
    pub emails: Vec<Email>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ClickListResponse {
    pub clicks: Vec<Click>,
    pub total: usize,
}
