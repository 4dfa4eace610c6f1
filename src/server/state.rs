use std::sync::Arc;

use crate::config::Settings;
use crate::email::EmailService;
use crate::provider::{create_provider, EmailProvider};
use crate::template::{create_template_store, TemplateLifecycleManager};
use crate::user::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub templates: Arc<TemplateLifecycleManager>,
    pub users: Arc<UserStore>,
    pub emails: Arc<EmailService>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let provider = create_provider(&settings.provider);
        Self::with_provider(settings, provider)
    }

    /// Build the state around an explicit provider backend.
    pub fn with_provider(settings: Settings, provider: Arc<dyn EmailProvider>) -> Self {
        let templates = Arc::new(TemplateLifecycleManager::new(
            create_template_store(),
            provider.clone(),
        ));
        let users = Arc::new(UserStore::new());
        let emails = Arc::new(EmailService::new(
            users.clone(),
            templates.clone(),
            provider,
            settings.provider.from.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            templates,
            users,
            emails,
        }
    }
}
