use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Profile, Template, TemplateContent};

/// Errors from the external relational store. Messages are preserved
/// verbatim; the HTTP layer decides what reaches the client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store query error: {0}")]
    Query(String),
}

/// Persistence contract for templates and their single live content payload.
///
/// Every access is scoped to the owning `user_id`. Content writes are
/// full-replace: the store keeps no history and exposes no field-level
/// patch. Deleting a template discards its content (cascade).
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Insert a new template row. Fails with [`StoreError::UniqueViolation`]
    /// when `id` or `short_id` collides with an existing row.
    async fn insert_template(&self, template: &Template) -> Result<(), StoreError>;

    async fn get_template(&self, user_id: Uuid, id: Uuid) -> Result<Option<Template>, StoreError>;

    async fn get_template_by_short_id(
        &self,
        user_id: Uuid,
        short_id: &str,
    ) -> Result<Option<Template>, StoreError>;

    /// Owner's templates, newest first.
    async fn list_templates(&self, user_id: Uuid) -> Result<Vec<Template>, StoreError>;

    /// Returns `false` when no owned template matched.
    async fn rename_template(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<bool, StoreError>;

    /// Delete the template and its content. Returns `false` when no owned
    /// template matched.
    async fn delete_template(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;

    /// Overwrite the template's entire content payload and advance its
    /// `updated_at`. Returns `false` when no owned template matched.
    async fn replace_content(
        &self,
        user_id: Uuid,
        id: Uuid,
        content: &TemplateContent,
    ) -> Result<bool, StoreError>;

    async fn get_content(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<TemplateContent>, StoreError>;
}

/// Persistence contract for per-user settings flags.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Set `onboarding_done = true`, creating the profile row if missing.
    /// Idempotent; never clears the flag.
    async fn set_onboarding_done(&self, user_id: Uuid) -> Result<(), StoreError>;

    /// Set the request-logging flag, creating the profile row if missing.
    async fn set_log_requests(&self, user_id: Uuid, enabled: bool) -> Result<(), StoreError>;
}
