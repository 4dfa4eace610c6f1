//! Template version lifecycle: create, edit and revert.
//!
//! Each operation validates its preconditions before touching the provider,
//! so a rejected request issues no provider call and leaves the store as it
//! was. Edit and revert for one family run under a per-family mutex, which
//! keeps concurrent requests from both reading the same active version.
//!
//! A provider call that succeeds followed by a failing store write is not
//! rolled back; the provider then holds content the store does not mark as
//! active.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::metrics::TemplateMetrics;
use crate::provider::{EmailProvider, NewProviderTemplate, ProviderTemplateEdit};

use super::store::TemplateVersionStore;
use super::types::{
    CreateTemplateRequest, EditTemplateRequest, RevertTemplateRequest, TemplateError,
    TemplateResult, TemplateVersion,
};
use super::versioning::{build_alias, next_version};

/// Orchestrates template versions between the store and the provider.
pub struct TemplateLifecycleManager {
    store: Arc<dyn TemplateVersionStore>,
    provider: Arc<dyn EmailProvider>,
    family_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl TemplateLifecycleManager {
    pub fn new(store: Arc<dyn TemplateVersionStore>, provider: Arc<dyn EmailProvider>) -> Self {
        Self {
            store,
            provider,
            family_locks: DashMap::new(),
        }
    }

    /// All stored versions across every family
    pub async fn list(&self) -> Vec<TemplateVersion> {
        self.store.list().await
    }

    /// The live version of a family
    pub async fn active_version(&self, template_id: i64) -> TemplateResult<TemplateVersion> {
        self.store.find_active(template_id).await.ok_or_else(|| {
            TemplateError::NotFound(format!("no active version for template {}", template_id))
        })
    }

    /// Every version of a family; `NotFound` if the family does not exist
    pub async fn history(&self, template_id: i64) -> TemplateResult<Vec<TemplateVersion>> {
        let history = self.store.history(template_id).await;
        if history.is_empty() {
            return Err(TemplateError::NotFound(format!("template {}", template_id)));
        }
        Ok(history)
    }

    /// Create a new template family with its first, active version.
    #[tracing::instrument(name = "template.create", skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateTemplateRequest) -> TemplateResult<TemplateVersion> {
        let result = self.create_inner(request).await;
        TemplateMetrics::record("create", result.is_ok());
        result
    }

    async fn create_inner(&self, request: CreateTemplateRequest) -> TemplateResult<TemplateVersion> {
        request.validate()?;

        let alias = build_alias(&request.name, 1);

        let created = self
            .provider
            .create_template(NewProviderTemplate {
                name: request.name.clone(),
                alias: alias.clone(),
                template_type: request.template_type,
                layout_template: request.layout_template.clone(),
                subject: request.subject.clone(),
                html_body: request.html_body.clone(),
                text_body: request.text_body.clone(),
            })
            .await?;

        let version = TemplateVersion {
            template_id: created.template_id,
            version_id: Uuid::new_v4(),
            version_number: 1,
            active: true,
            alias,
            created_at: Utc::now(),
            name: request.name,
            template_type: request.template_type,
            layout_template: request.layout_template,
            subject: request.subject,
            html_body: request.html_body,
            text_body: request.text_body,
        };

        let stored = self.store.append(version).await?;

        tracing::info!(
            template_id = stored.template_id,
            version_id = %stored.version_id,
            alias = %stored.alias,
            "Template created"
        );

        Ok(stored)
    }

    /// Replace the active version of a family with a new version.
    #[tracing::instrument(name = "template.edit", skip(self, request), fields(template_id = request.id))]
    pub async fn edit(&self, request: EditTemplateRequest) -> TemplateResult<TemplateVersion> {
        let result = self.edit_inner(request).await;
        TemplateMetrics::record("edit", result.is_ok());
        result
    }

    async fn edit_inner(&self, request: EditTemplateRequest) -> TemplateResult<TemplateVersion> {
        let _guard = self.lock_family(request.id).await;

        let current = self.store.find_active(request.id).await.ok_or_else(|| {
            TemplateError::NotFound(format!("current template {} does not exist", request.id))
        })?;

        // Subject rules depend on the family's kind
        request.validate(current.template_type)?;

        let history = self.store.history(request.id).await;
        let version_number = next_version(&history)?;
        let alias = build_alias(&current.name, version_number);

        self.provider
            .edit_template(
                request.id,
                ProviderTemplateEdit {
                    alias: alias.clone(),
                    subject: request.subject.clone(),
                    html_body: request.html_body.clone(),
                    text_body: request.text_body.clone(),
                },
            )
            .await?;

        let next = TemplateVersion {
            template_id: request.id,
            version_id: Uuid::new_v4(),
            version_number,
            active: true,
            alias,
            created_at: Utc::now(),
            name: current.name,
            template_type: current.template_type,
            layout_template: current.layout_template,
            subject: request.subject,
            html_body: request.html_body,
            text_body: request.text_body,
        };

        let stored = self.store.supersede(current.version_id, next).await?;

        tracing::info!(
            template_id = stored.template_id,
            previous_version_id = %current.version_id,
            version_id = %stored.version_id,
            version_number = stored.version_number,
            "Template edited"
        );

        Ok(stored)
    }

    /// Make an earlier version of a family active again.
    ///
    /// No new version is created; the target keeps its number and id.
    #[tracing::instrument(
        name = "template.revert",
        skip(self, request),
        fields(template_id = request.id, target_version_id = %request.target_version_id)
    )]
    pub async fn revert(&self, request: RevertTemplateRequest) -> TemplateResult<TemplateVersion> {
        let result = self.revert_inner(request).await;
        TemplateMetrics::record("revert", result.is_ok());
        result
    }

    async fn revert_inner(&self, request: RevertTemplateRequest) -> TemplateResult<TemplateVersion> {
        let _guard = self.lock_family(request.id).await;

        let current = self.store.find_active(request.id).await.ok_or_else(|| {
            TemplateError::NotFound(format!("current template {} does not exist", request.id))
        })?;

        let target = self
            .store
            .find_by_version_id(request.target_version_id)
            .await
            .ok_or_else(|| {
                TemplateError::NotFound(format!(
                    "target template version {} does not exist",
                    request.target_version_id
                ))
            })?;

        if target.template_id != current.template_id {
            return Err(TemplateError::InvalidArgument(format!(
                "cannot revert to a version of a different template ({})",
                target.template_id
            )));
        }

        if target.version_id == current.version_id {
            return Err(TemplateError::InvalidArgument(
                "cannot revert to the version that is already active".to_string(),
            ));
        }

        self.provider
            .edit_template(
                request.id,
                ProviderTemplateEdit {
                    alias: build_alias(&target.name, target.version_number),
                    subject: target.subject.clone(),
                    html_body: target.html_body.clone(),
                    text_body: target.text_body.clone(),
                },
            )
            .await?;

        let restored = self
            .store
            .reactivate(current.version_id, target.version_id)
            .await?;

        tracing::info!(
            template_id = restored.template_id,
            previous_version_id = %current.version_id,
            version_id = %restored.version_id,
            version_number = restored.version_number,
            "Template reverted"
        );

        Ok(restored)
    }

    /// Acquire the mutex serializing writes to one family.
    async fn lock_family(&self, template_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .family_locks
            .entry(template_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemoryProvider, ProviderCall};
    use crate::template::{MemoryTemplateStore, TemplateType};

    fn setup() -> (TemplateLifecycleManager, Arc<MemoryProvider>) {
        let provider = Arc::new(MemoryProvider::new());
        let manager =
            TemplateLifecycleManager::new(Arc::new(MemoryTemplateStore::new()), provider.clone());
        (manager, provider)
    }

    fn create_request(name: &str) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: name.to_string(),
            template_type: TemplateType::Standard,
            layout_template: Some("base-layout".to_string()),
            subject: Some("Welcome {{name}}".to_string()),
            html_body: Some("<h1>Hi {{name}}</h1>".to_string()),
            text_body: Some("Hi {{name}}".to_string()),
        }
    }

    fn edit_request(id: i64, subject: &str) -> EditTemplateRequest {
        EditTemplateRequest {
            id,
            subject: Some(subject.to_string()),
            html_body: Some(format!("<p>{}</p>", subject)),
            text_body: None,
        }
    }

    #[tokio::test]
    async fn test_create_first_version() {
        let (manager, provider) = setup();
        let created = manager.create(create_request("Welcome")).await.unwrap();

        assert_eq!(created.version_number, 1);
        assert!(created.active);
        assert_eq!(created.alias, "welcome-v1");

        let active = manager.active_version(created.template_id).await.unwrap();
        assert_eq!(active, created);

        match &provider.calls().await[0] {
            ProviderCall::CreateTemplate(t) => {
                assert_eq!(t.alias, "welcome-v1");
                assert_eq!(t.layout_template.as_deref(), Some("base-layout"));
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_invalid_request_skips_provider() {
        let (manager, provider) = setup();
        let mut request = create_request("Welcome");
        request.subject = Some(String::new());

        assert!(matches!(
            manager.create(request).await,
            Err(TemplateError::InvalidArgument(_))
        ));
        assert_eq!(provider.call_count().await, 0);
        assert!(manager.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_edit_creates_next_version_and_carries_fields() {
        let (manager, provider) = setup();
        let v1 = manager.create(create_request("Weekly Digest")).await.unwrap();

        let v2 = manager
            .edit(edit_request(v1.template_id, "Second"))
            .await
            .unwrap();

        assert_eq!(v2.version_number, 2);
        assert_eq!(v2.alias, "weekly-digest-v2");
        assert_eq!(v2.name, "Weekly Digest");
        assert_eq!(v2.layout_template.as_deref(), Some("base-layout"));
        assert_eq!(v2.subject.as_deref(), Some("Second"));
        assert_ne!(v2.version_id, v1.version_id);

        let previous = manager
            .history(v1.template_id)
            .await
            .unwrap()
            .into_iter()
            .find(|v| v.version_id == v1.version_id)
            .unwrap();
        assert!(!previous.active);
        assert_eq!(previous.subject, v1.subject);
        assert_eq!(previous.html_body, v1.html_body);
        assert_eq!(previous.text_body, v1.text_body);

        assert!(matches!(
            &provider.calls().await[1],
            ProviderCall::EditTemplate { template_id, edit }
                if *template_id == v1.template_id && edit.alias == "weekly-digest-v2"
        ));
    }

    #[tokio::test]
    async fn test_layout_lifecycle_without_subject() {
        let (manager, provider) = setup();
        let layout = manager
            .create(CreateTemplateRequest {
                name: "Base Layout".to_string(),
                template_type: TemplateType::Layout,
                layout_template: None,
                subject: None,
                html_body: Some("<html>{{{@content}}}</html>".to_string()),
                text_body: None,
            })
            .await
            .unwrap();

        assert_eq!(layout.template_type, TemplateType::Layout);
        assert!(layout.subject.is_none());

        let v2 = manager
            .edit(EditTemplateRequest {
                id: layout.template_id,
                subject: None,
                html_body: Some("<body>{{{@content}}}</body>".to_string()),
                text_body: None,
            })
            .await
            .unwrap();
        assert_eq!(v2.template_type, TemplateType::Layout);
        assert_eq!(v2.alias, "base-layout-v2");

        // A standard-style edit carrying a subject is refused for a layout
        assert!(matches!(
            manager.edit(edit_request(layout.template_id, "Subject")).await,
            Err(TemplateError::InvalidArgument(_))
        ));

        let calls = provider.calls().await;
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[0],
            ProviderCall::CreateTemplate(t) if t.subject.is_none()
        ));
        assert!(matches!(
            &calls[1],
            ProviderCall::EditTemplate { edit, .. } if edit.subject.is_none()
        ));
    }

    #[tokio::test]
    async fn test_edit_unknown_template() {
        let (manager, provider) = setup();

        assert!(matches!(
            manager.edit(edit_request(999, "x")).await,
            Err(TemplateError::NotFound(_))
        ));
        assert_eq!(provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_edit_provider_failure_leaves_store_unchanged() {
        let (manager, provider) = setup();
        let v1 = manager.create(create_request("Welcome")).await.unwrap();

        provider.set_failing(true);
        assert!(matches!(
            manager.edit(edit_request(v1.template_id, "Nope")).await,
            Err(TemplateError::Provider(_))
        ));

        let history = manager.history(v1.template_id).await.unwrap();
        assert_eq!(history, vec![v1]);
    }

    #[tokio::test]
    async fn test_revert_reactivates_without_new_version() {
        let (manager, provider) = setup();
        let v1 = manager.create(create_request("Welcome")).await.unwrap();
        let v2 = manager.edit(edit_request(v1.template_id, "Second")).await.unwrap();

        let restored = manager
            .revert(RevertTemplateRequest {
                id: v1.template_id,
                target_version_id: v1.version_id,
            })
            .await
            .unwrap();

        assert_eq!(restored.version_id, v1.version_id);
        assert_eq!(restored.version_number, 1);
        assert!(restored.active);

        let history = manager.history(v1.template_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(!history.iter().find(|v| v.version_id == v2.version_id).unwrap().active);

        assert!(matches!(
            provider.calls().await.last(),
            Some(ProviderCall::EditTemplate { edit, .. })
                if edit.alias == "welcome-v1" && edit.subject == v1.subject
        ));
    }

    #[tokio::test]
    async fn test_edit_after_revert_continues_numbering() {
        let (manager, _) = setup();
        let v1 = manager.create(create_request("Welcome")).await.unwrap();
        manager.edit(edit_request(v1.template_id, "Second")).await.unwrap();
        manager
            .revert(RevertTemplateRequest {
                id: v1.template_id,
                target_version_id: v1.version_id,
            })
            .await
            .unwrap();

        let v3 = manager.edit(edit_request(v1.template_id, "Third")).await.unwrap();
        assert_eq!(v3.version_number, 3);
    }

    #[tokio::test]
    async fn test_revert_to_active_version_is_rejected() {
        let (manager, provider) = setup();
        let v1 = manager.create(create_request("Welcome")).await.unwrap();
        let calls_before = provider.call_count().await;

        assert!(matches!(
            manager
                .revert(RevertTemplateRequest {
                    id: v1.template_id,
                    target_version_id: v1.version_id,
                })
                .await,
            Err(TemplateError::InvalidArgument(_))
        ));
        assert_eq!(provider.call_count().await, calls_before);
        assert_eq!(manager.active_version(v1.template_id).await.unwrap(), v1);
    }

    #[tokio::test]
    async fn test_revert_to_other_family_is_rejected() {
        let (manager, provider) = setup();
        let a = manager.create(create_request("Welcome")).await.unwrap();
        let b = manager.create(create_request("Goodbye")).await.unwrap();
        let before = manager.list().await;
        let calls_before = provider.call_count().await;

        assert!(matches!(
            manager
                .revert(RevertTemplateRequest {
                    id: a.template_id,
                    target_version_id: b.version_id,
                })
                .await,
            Err(TemplateError::InvalidArgument(_))
        ));
        assert_eq!(manager.list().await, before);
        assert_eq!(provider.call_count().await, calls_before);
    }

    #[tokio::test]
    async fn test_revert_missing_target() {
        let (manager, _) = setup();
        let v1 = manager.create(create_request("Welcome")).await.unwrap();

        assert!(matches!(
            manager
                .revert(RevertTemplateRequest {
                    id: v1.template_id,
                    target_version_id: Uuid::new_v4(),
                })
                .await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_active_version_reads_are_stable() {
        let (manager, _) = setup();
        let v1 = manager.create(create_request("Welcome")).await.unwrap();

        let first = manager.active_version(v1.template_id).await.unwrap();
        let second = manager.active_version(v1.template_id).await.unwrap();
        assert_eq!(first, second);
    }
}
