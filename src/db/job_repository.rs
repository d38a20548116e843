use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::{CreateJobPayload, Job, JobQuery, JobStatus, JobWithRecruiter};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(
        &self,
        recruiter_id: Uuid,
        payload: &CreateJobPayload,
    ) -> Result<Job, sqlx::Error>;
    /// Returns the requested page plus the total count of matching rows.
    async fn list_jobs(&self, query: &JobQuery)
        -> Result<(Vec<JobWithRecruiter>, i64), sqlx::Error>;
    async fn find_job(&self, id: Uuid) -> Result<Option<JobWithRecruiter>, sqlx::Error>;
    /// Lookup without the recruiter join, used for ownership checks.
    async fn find_job_basic(&self, id: Uuid) -> Result<Option<Job>, sqlx::Error>;
    /// Other open postings sharing the location, excluding the job itself.
    async fn related_jobs(
        &self,
        location: &str,
        exclude: Uuid,
        limit: i64,
    ) -> Result<Vec<JobWithRecruiter>, sqlx::Error>;
    async fn jobs_by_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> Result<Vec<JobWithRecruiter>, sqlx::Error>;
    async fn set_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), sqlx::Error>;
    async fn delete_job(&self, id: Uuid) -> Result<(), sqlx::Error>;
}
