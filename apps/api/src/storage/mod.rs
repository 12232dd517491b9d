//! Storage collaborator seam.
//!
//! The resume store and the template catalog depend on this trait, not on
//! sqlx directly. `AppState` carries an `Arc<dyn ResumeStorage>`, so tests
//! swap in an in-memory backend without touching the store.

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{Resume, ResumeRow};
use crate::models::template::TemplateRow;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// CRUD surface the rest of the service needs from the hosted store.
/// Full-aggregate payloads only; partial/diff writes are not supported.
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    /// Most-recently-updated resume belonging to the identity, if any.
    async fn latest_resume_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ResumeRow>, StorageError>;

    /// Inserts a new resume row and returns it with its assigned id.
    async fn insert_resume(&self, user_id: Uuid, resume: &Resume)
        -> Result<ResumeRow, StorageError>;

    /// Overwrites an existing resume row keyed on its id.
    async fn update_resume(
        &self,
        id: Uuid,
        user_id: Uuid,
        resume: &Resume,
    ) -> Result<(), StorageError>;

    /// Active templates, ordered by name ascending.
    async fn list_active_templates(&self) -> Result<Vec<TemplateRow>, StorageError>;
}
