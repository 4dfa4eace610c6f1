//! Versioned email templates.
//!
//! This module provides:
//! - Template version records and request types
//! - Alias and version number derivation
//! - An append-only version store enforcing one active version per family
//! - The lifecycle manager that creates, edits and reverts template families
//!   in step with the email provider
//!
//! # Example
//!
//! ```ignore
//! let manager = TemplateLifecycleManager::new(create_template_store(), provider);
//!
//! let v1 = manager.create(CreateTemplateRequest {
//!     name: "Weekly Digest".to_string(),
//!     template_type: TemplateType::Standard,
//!     layout_template: None,
//!     subject: Some("Your week".to_string()),
//!     html_body: Some("<p>{{summary}}</p>".to_string()),
//!     text_body: None,
//! }).await?;
//! assert_eq!(v1.alias, "weekly-digest-v1");
//!
//! let v2 = manager.edit(EditTemplateRequest {
//!     id: v1.template_id,
//!     subject: Some("Your week in review".to_string()),
//!     html_body: Some("<p>{{summary}}</p>".to_string()),
//!     text_body: None,
//! }).await?;
//! assert_eq!(v2.version_number, 2);
//! ```

mod lifecycle;
mod memory_store;
mod store;
mod types;
mod versioning;

pub use lifecycle::TemplateLifecycleManager;
pub use memory_store::MemoryTemplateStore;
pub use store::{create_template_store, StoreError, StoreResult, TemplateVersionStore};
pub use types::{
    CreateTemplateRequest, EditTemplateRequest, RevertTemplateRequest, TemplateError,
    TemplateListResponse, TemplateResponse, TemplateResult, TemplateType, TemplateVersion,
};
pub use versioning::{build_alias, next_version};
