//! In-memory template version store.
//!
//! Versions live in a single `Vec` guarded by an async `RwLock` and are found
//! by linear scan. Everything is lost on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::metrics::TEMPLATE_VERSIONS_STORED;

use super::store::{StoreError, StoreResult, TemplateVersionStore};
use super::types::TemplateVersion;

/// In-memory template version store.
#[derive(Default)]
pub struct MemoryTemplateStore {
    versions: RwLock<Vec<TemplateVersion>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_other_active(versions: &[TemplateVersion], template_id: i64, except: Option<Uuid>) -> bool {
    versions
        .iter()
        .any(|v| v.template_id == template_id && v.active && Some(v.version_id) != except)
}

fn position(versions: &[TemplateVersion], version_id: Uuid) -> StoreResult<usize> {
    versions
        .iter()
        .position(|v| v.version_id == version_id)
        .ok_or(StoreError::VersionNotFound(version_id))
}

#[async_trait]
impl TemplateVersionStore for MemoryTemplateStore {
    async fn list(&self) -> Vec<TemplateVersion> {
        self.versions.read().await.clone()
    }

    async fn find_active(&self, template_id: i64) -> Option<TemplateVersion> {
        self.versions
            .read()
            .await
            .iter()
            .find(|v| v.template_id == template_id && v.active)
            .cloned()
    }

    async fn find_by_version_id(&self, version_id: Uuid) -> Option<TemplateVersion> {
        self.versions
            .read()
            .await
            .iter()
            .find(|v| v.version_id == version_id)
            .cloned()
    }

    async fn history(&self, template_id: i64) -> Vec<TemplateVersion> {
        self.versions
            .read()
            .await
            .iter()
            .filter(|v| v.template_id == template_id)
            .cloned()
            .collect()
    }

    async fn append(&self, version: TemplateVersion) -> StoreResult<TemplateVersion> {
        let mut versions = self.versions.write().await;

        if versions.iter().any(|v| v.version_id == version.version_id) {
            return Err(StoreError::DuplicateVersion(version.version_id));
        }

        if version.active && has_other_active(&versions, version.template_id, None) {
            return Err(StoreError::ActiveConflict {
                template_id: version.template_id,
            });
        }

        versions.push(version.clone());
        TEMPLATE_VERSIONS_STORED.set(versions.len() as i64);

        tracing::debug!(
            template_id = version.template_id,
            version_id = %version.version_id,
            version_number = version.version_number,
            "Template version appended"
        );

        Ok(version)
    }

    async fn set_active(&self, version_id: Uuid, active: bool) -> StoreResult<TemplateVersion> {
        let mut versions = self.versions.write().await;
        let idx = position(&versions, version_id)?;
        let template_id = versions[idx].template_id;

        if active && has_other_active(&versions, template_id, Some(version_id)) {
            return Err(StoreError::ActiveConflict { template_id });
        }

        versions[idx].active = active;
        Ok(versions[idx].clone())
    }

    async fn supersede(
        &self,
        previous_version_id: Uuid,
        next: TemplateVersion,
    ) -> StoreResult<TemplateVersion> {
        let mut versions = self.versions.write().await;
        let prev_idx = position(&versions, previous_version_id)?;

        if versions.iter().any(|v| v.version_id == next.version_id) {
            return Err(StoreError::DuplicateVersion(next.version_id));
        }

        if next.active && has_other_active(&versions, next.template_id, Some(previous_version_id))
        {
            return Err(StoreError::ActiveConflict {
                template_id: next.template_id,
            });
        }

        versions[prev_idx].active = false;
        versions.push(next.clone());
        TEMPLATE_VERSIONS_STORED.set(versions.len() as i64);

        Ok(next)
    }

    async fn reactivate(
        &self,
        current_version_id: Uuid,
        target_version_id: Uuid,
    ) -> StoreResult<TemplateVersion> {
        let mut versions = self.versions.write().await;
        let current_idx = position(&versions, current_version_id)?;
        let target_idx = position(&versions, target_version_id)?;
        let template_id = versions[target_idx].template_id;

        if versions[current_idx].template_id != template_id
            || has_other_active(&versions, template_id, Some(current_version_id))
        {
            return Err(StoreError::ActiveConflict { template_id });
        }

        versions[current_idx].active = false;
        versions[target_idx].active = true;

        Ok(versions[target_idx].clone())
    }

    async fn count(&self) -> usize {
        self.versions.read().await.len()
    }
}
