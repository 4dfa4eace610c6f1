//! Storage abstraction for template versions.
//!
//! The store is an append-only log of [`TemplateVersion`] records. Records are
//! never removed; the only in-place change allowed is toggling `active`.
//! Every mutation refuses to leave a family with more than one active version.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::memory_store::MemoryTemplateStore;
use super::types::TemplateVersion;

/// Errors raised by template store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would leave two active versions in one family
    #[error("Template {template_id} already has an active version")]
    ActiveConflict { template_id: i64 },

    #[error("Template version not found: {0}")]
    VersionNotFound(Uuid),

    #[error("Template version already stored: {0}")]
    DuplicateVersion(Uuid),
}

/// Result type for store mutations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backend trait for template version storage.
///
/// Lookups on unknown identifiers return `None`; rejecting them is the
/// caller's job.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single store is shared by every
/// request handler.
#[async_trait]
pub trait TemplateVersionStore: Send + Sync {
    /// Every stored version, in insertion order.
    async fn list(&self) -> Vec<TemplateVersion>;

    /// The active version of a family, if any.
    async fn find_active(&self, template_id: i64) -> Option<TemplateVersion>;

    /// A specific version by its identifier.
    async fn find_by_version_id(&self, version_id: Uuid) -> Option<TemplateVersion>;

    /// Every version of a family, in insertion order.
    async fn history(&self, template_id: i64) -> Vec<TemplateVersion>;

    /// Append a new version.
    ///
    /// Fails with [`StoreError::ActiveConflict`] if the version is active and
    /// its family already has an active version.
    async fn append(&self, version: TemplateVersion) -> StoreResult<TemplateVersion>;

    /// Toggle the `active` flag of a stored version.
    async fn set_active(&self, version_id: Uuid, active: bool) -> StoreResult<TemplateVersion>;

    /// Deactivate `previous_version_id` and append `next` as one write.
    async fn supersede(
        &self,
        previous_version_id: Uuid,
        next: TemplateVersion,
    ) -> StoreResult<TemplateVersion>;

    /// Deactivate `current_version_id` and activate `target_version_id` as one write.
    async fn reactivate(
        &self,
        current_version_id: Uuid,
        target_version_id: Uuid,
    ) -> StoreResult<TemplateVersion>;

    /// Number of stored versions.
    async fn count(&self) -> usize;
}

/// Create the template store shared by the service.
pub fn create_template_store() -> Arc<dyn TemplateVersionStore> {
    tracing::info!(backend = "memory", "Creating memory template store");
    Arc::new(MemoryTemplateStore::new())
}
