//! Sending templated email and recording provider engagement events.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::metrics::EmailMetrics;
use crate::provider::{EmailProvider, TemplatedEmail};
use crate::template::TemplateLifecycleManager;
use crate::user::UserStore;

use super::types::{
    Click, ClickEvent, Email, EmailError, EmailResult, OpenEvent, SendEmailRequest,
};

/// Email sender and event recorder.
///
/// Only reads template state: it asks the lifecycle manager which version is
/// active so each email records the version it was rendered from.
pub struct EmailService {
    users: Arc<UserStore>,
    templates: Arc<TemplateLifecycleManager>,
    provider: Arc<dyn EmailProvider>,
    from: String,
    emails: RwLock<Vec<Email>>,
    clicks: RwLock<Vec<Click>>,
}

impl EmailService {
    pub fn new(
        users: Arc<UserStore>,
        templates: Arc<TemplateLifecycleManager>,
        provider: Arc<dyn EmailProvider>,
        from: String,
    ) -> Self {
        Self {
            users,
            templates,
            provider,
            from,
            emails: RwLock::new(Vec::new()),
            clicks: RwLock::new(Vec::new()),
        }
    }

    /// Send a template to a user and record the submission.
    #[tracing::instrument(
        name = "email.send",
        skip(self, request),
        fields(user_id = %request.user_id, template_id = request.template_id)
    )]
    pub async fn send(&self, request: SendEmailRequest) -> EmailResult<Email> {
        let user = self.users.get(request.user_id).await.ok_or_else(|| {
            EmailError::NotFound(format!("no user found with id {}", request.user_id))
        })?;

        // Resolve the active version first so nothing is sent that cannot be recorded
        let version = self
            .templates
            .active_version(request.template_id)
            .await
            .map_err(|_| {
                EmailError::NotFound(format!(
                    "no active template found with id {}",
                    request.template_id
                ))
            })?;

        let track_opens = request.track_opens.unwrap_or(true);
        let track_links = request.track_clicks.unwrap_or_default();

        let receipt = self
            .provider
            .send_email_with_template(TemplatedEmail {
                from: self.from.clone(),
                to: user.email.clone(),
                template_id: request.template_id,
                template_model: request
                    .template_model
                    .unwrap_or_else(|| serde_json::json!({})),
                track_opens,
                track_links,
            })
            .await?;

        let email = Email {
            id: receipt.message_id,
            user_id: user.id,
            template_id: request.template_id,
            template_version_id: version.version_id,
            track_opens,
            track_links,
            to: user.email,
            submitted: true,
            submitted_at: receipt.submitted_at,
            error_code: receipt.error_code,
            opened: false,
            opened_at: None,
        };

        self.emails.write().await.push(email.clone());
        EmailMetrics::record_sent();

        tracing::info!(
            message_id = %email.id,
            template_version_id = %email.template_version_id,
            "Email submitted"
        );

        Ok(email)
    }

    pub async fn list(&self) -> Vec<Email> {
        self.emails.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> EmailResult<Email> {
        self.emails
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| EmailError::NotFound("Email not found".to_string()))
    }

    /// Clicks recorded for one email
    pub async fn clicks_for(&self, id: &str) -> EmailResult<Vec<Click>> {
        let email = self.get(id).await?;

        Ok(self
            .clicks
            .read()
            .await
            .iter()
            .filter(|c| c.email_id == email.id)
            .cloned()
            .collect())
    }

    /// Mark an email as opened.
    #[tracing::instrument(name = "email.open", skip(self, event), fields(message_id = %event.message_id))]
    pub async fn record_open(&self, event: OpenEvent) -> EmailResult<Email> {
        let mut emails = self.emails.write().await;
        let email = emails
            .iter_mut()
            .find(|e| e.id == event.message_id)
            .ok_or_else(|| EmailError::NotFound("No email found.".to_string()))?;

        email.opened = true;
        email.opened_at = event.received_at;
        EmailMetrics::record_opened();

        Ok(email.clone())
    }

    /// Store a link click against its email.
    #[tracing::instrument(name = "email.click", skip(self, event), fields(message_id = %event.message_id))]
    pub async fn record_click(&self, event: ClickEvent) -> EmailResult<Click> {
        let email = self
            .get(&event.message_id)
            .await
            .map_err(|_| EmailError::NotFound("No email found.".to_string()))?;

        let click = Click {
            id: Uuid::new_v4(),
            email_id: email.id,
            recipient: event.recipient,
            clicked_at: event.received_at,
            click_location: event.click_location,
            original_link: event.original_link,
            platform: event.platform,
            user_agent: event.user_agent,
            geo: event.geo,
            client: event.client,
            os: event.os,
        };

        self.clicks.write().await.push(click.clone());
        EmailMetrics::record_clicked();

        Ok(click)
    }
}
