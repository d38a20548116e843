use async_trait::async_trait;
use uuid::Uuid;

use crate::models::saved_job::{SavedJob, SavedJobWithJob};

#[async_trait]
pub trait SavedJobRepository: Send + Sync {
    async fn find_saved(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<SavedJob>, sqlx::Error>;
    async fn save_job(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob, sqlx::Error>;
    /// Returns false when there was nothing to remove.
    async fn unsave_job(&self, user_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error>;
    async fn saved_jobs_for_user(&self, user_id: Uuid)
        -> Result<Vec<SavedJobWithJob>, sqlx::Error>;
}
