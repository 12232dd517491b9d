//! sqlx-backed `ResumeStorage` against the `resumes` and `resume_templates`
//! tables. `updated_at` is assigned server-side so "most recent" ordering is
//! consistent across clients.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{Resume, ResumeRow};
use crate::models::template::TemplateRow;
use crate::storage::{ResumeStorage, StorageError};

pub struct PgResumeStorage {
    pool: PgPool,
}

impl PgResumeStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// JSONB column values for one aggregate.
struct ResumeBlobs {
    personal_info: Value,
    experiences: Value,
    education: Value,
    skills: Value,
}

impl ResumeBlobs {
    fn encode(resume: &Resume) -> Result<Self, StorageError> {
        Ok(Self {
            personal_info: serde_json::to_value(&resume.personal_info)?,
            experiences: serde_json::to_value(&resume.experiences)?,
            education: serde_json::to_value(&resume.education)?,
            skills: serde_json::to_value(&resume.skills)?,
        })
    }
}

#[async_trait]
impl ResumeStorage for PgResumeStorage {
    async fn latest_resume_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ResumeRow>, StorageError> {
        let row: Option<ResumeRow> = sqlx::query_as(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_resume(
        &self,
        user_id: Uuid,
        resume: &Resume,
    ) -> Result<ResumeRow, StorageError> {
        let blobs = ResumeBlobs::encode(resume)?;
        let row: ResumeRow = sqlx::query_as(
            r#"
            INSERT INTO resumes
                (user_id, title, personal_info, experiences, education, skills,
                 template_id, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&resume.title)
        .bind(blobs.personal_info)
        .bind(blobs.experiences)
        .bind(blobs.education)
        .bind(blobs.skills)
        .bind(resume.template_id)
        .bind(resume.is_published)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_resume(
        &self,
        id: Uuid,
        user_id: Uuid,
        resume: &Resume,
    ) -> Result<(), StorageError> {
        let blobs = ResumeBlobs::encode(resume)?;
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET title = $1, personal_info = $2, experiences = $3, education = $4,
                skills = $5, template_id = $6, is_published = $7, updated_at = now()
            WHERE id = $8 AND user_id = $9
            "#,
        )
        .bind(&resume.title)
        .bind(blobs.personal_info)
        .bind(blobs.experiences)
        .bind(blobs.education)
        .bind(blobs.skills)
        .bind(resume.template_id)
        .bind(resume.is_published)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Database(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn list_active_templates(&self) -> Result<Vec<TemplateRow>, StorageError> {
        let templates: Vec<TemplateRow> =
            sqlx::query_as("SELECT * FROM resume_templates WHERE is_active = TRUE ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(templates)
    }
}
