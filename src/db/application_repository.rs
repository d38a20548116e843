use async_trait::async_trait;
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationStatus, ApplicationWithCandidate, ApplicationWithJob,
};

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error>;
    async fn create_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
        resume_url: &str,
    ) -> Result<Application, sqlx::Error>;
    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithCandidate>, sqlx::Error>;
    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, sqlx::Error>;
    /// The application together with the recruiter owning its job, for
    /// authorization of status updates.
    async fn find_application_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<(Application, Uuid)>, sqlx::Error>;
    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), sqlx::Error>;
}
