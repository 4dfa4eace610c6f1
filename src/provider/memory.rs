//! In-process provider backend.
//!
//! Hands out sequential template ids and random message ids, keeps a log of
//! every call, and can be told to fail. Used for local development without
//! Postmark credentials and by the test suites.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    EmailProvider, NewProviderTemplate, ProviderError, ProviderResult, ProviderTemplate,
    ProviderTemplateEdit, SendReceipt, TemplatedEmail,
};

/// A call received by the memory backend
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    CreateTemplate(NewProviderTemplate),
    EditTemplate {
        template_id: i64,
        edit: ProviderTemplateEdit,
    },
    SendEmail(TemplatedEmail),
}

/// Memory provider backend.
pub struct MemoryProvider {
    next_template_id: AtomicI64,
    failing: AtomicBool,
    calls: Mutex<Vec<ProviderCall>>,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            next_template_id: AtomicI64::new(1),
            failing: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    fn check_failing(&self, operation: &str) -> ProviderResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Injected(format!("{} unavailable", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl EmailProvider for MemoryProvider {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn create_template(
        &self,
        template: NewProviderTemplate,
    ) -> ProviderResult<ProviderTemplate> {
        self.check_failing("create_template")?;

        let template_id = self.next_template_id.fetch_add(1, Ordering::SeqCst);
        let created = ProviderTemplate {
            template_id,
            name: Some(template.name.clone()),
            alias: Some(template.alias.clone()),
            active: true,
        };

        self.calls
            .lock()
            .await
            .push(ProviderCall::CreateTemplate(template));

        Ok(created)
    }

    async fn edit_template(
        &self,
        template_id: i64,
        edit: ProviderTemplateEdit,
    ) -> ProviderResult<ProviderTemplate> {
        self.check_failing("edit_template")?;

        let updated = ProviderTemplate {
            template_id,
            name: None,
            alias: Some(edit.alias.clone()),
            active: true,
        };

        self.calls
            .lock()
            .await
            .push(ProviderCall::EditTemplate { template_id, edit });

        Ok(updated)
    }

    async fn send_email_with_template(&self, email: TemplatedEmail) -> ProviderResult<SendReceipt> {
        self.check_failing("send_email")?;

        let receipt = SendReceipt {
            to: Some(email.to.clone()),
            submitted_at: Some(Utc::now().to_rfc3339()),
            message_id: Uuid::new_v4().to_string(),
            error_code: 0,
            message: Some("OK".to_string()),
        };

        self.calls.lock().await.push(ProviderCall::SendEmail(email));

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateType;

    fn new_template(name: &str) -> NewProviderTemplate {
        NewProviderTemplate {
            name: name.to_string(),
            alias: format!("{}-v1", name.to_lowercase()),
            template_type: TemplateType::Standard,
            layout_template: None,
            subject: Some("s".to_string()),
            html_body: None,
            text_body: Some("t".to_string()),
        }
    }

    #[tokio::test]
    async fn test_sequential_template_ids() {
        let provider = MemoryProvider::new();
        let a = provider.create_template(new_template("A")).await.unwrap();
        let b = provider.create_template(new_template("B")).await.unwrap();

        assert_eq!(a.template_id + 1, b.template_id);
        assert_eq!(provider.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_failure_injection_records_nothing() {
        let provider = MemoryProvider::new();
        provider.set_failing(true);

        assert!(matches!(
            provider.create_template(new_template("A")).await,
            Err(ProviderError::Injected(_))
        ));
        assert_eq!(provider.call_count().await, 0);

        provider.set_failing(false);
        assert!(provider.create_template(new_template("A")).await.is_ok());
    }
}
