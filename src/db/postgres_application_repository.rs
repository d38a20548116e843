use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    application::{
        Application, ApplicationStatus, ApplicationWithCandidate, ApplicationWithJob,
        CandidateSummary,
    },
    job::JobJoinRow,
};

use super::application_repository::ApplicationRepository;

#[derive(FromRow)]
struct ApplicationCandidateRow {
    id: Uuid,
    job_id: Uuid,
    candidate_id: Uuid,
    resume_url: String,
    status: ApplicationStatus,
    applied_at: OffsetDateTime,
    candidate_name: String,
    candidate_email: String,
}

impl From<ApplicationCandidateRow> for ApplicationWithCandidate {
    fn from(row: ApplicationCandidateRow) -> Self {
        ApplicationWithCandidate {
            application: Application {
                id: row.id,
                job_id: row.job_id,
                candidate_id: row.candidate_id,
                resume_url: row.resume_url,
                status: row.status,
                applied_at: row.applied_at,
            },
            candidate: CandidateSummary {
                name: row.candidate_name,
                email: row.candidate_email,
            },
        }
    }
}

/// Application columns are aliased so the job join keeps its own names.
#[derive(FromRow)]
struct ApplicationJobRow {
    application_id: Uuid,
    candidate_id: Uuid,
    resume_url: String,
    application_status: ApplicationStatus,
    applied_at: OffsetDateTime,
    #[sqlx(flatten)]
    job: JobJoinRow,
}

impl From<ApplicationJobRow> for ApplicationWithJob {
    fn from(row: ApplicationJobRow) -> Self {
        let application = Application {
            id: row.application_id,
            job_id: row.job.id,
            candidate_id: row.candidate_id,
            resume_url: row.resume_url,
            status: row.application_status,
            applied_at: row.applied_at,
        };
        ApplicationWithJob {
            application,
            job: row.job.into(),
        }
    }
}

pub struct PostgresApplicationRepository {
    pub pool: PgPool,
}

#[async_trait]
impl ApplicationRepository for PostgresApplicationRepository {
    async fn find_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, candidate_id, resume_url, status, applied_at
            FROM applications
            WHERE job_id = $1 AND candidate_id = $2
            "#,
        )
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
        resume_url: &str,
    ) -> Result<Application, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (job_id, candidate_id, resume_url)
            VALUES ($1, $2, $3)
            RETURNING id, job_id, candidate_id, resume_url, status, applied_at
            "#,
        )
        .bind(job_id)
        .bind(candidate_id)
        .bind(resume_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithCandidate>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ApplicationCandidateRow>(
            r#"
            SELECT a.id, a.job_id, a.candidate_id, a.resume_url, a.status, a.applied_at,
                   u.name AS candidate_name, u.email AS candidate_email
            FROM applications a
            JOIN users u ON u.id = a.candidate_id
            WHERE a.job_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ApplicationJobRow>(
            r#"
            SELECT a.id AS application_id, a.candidate_id, a.resume_url,
                   a.status AS application_status, a.applied_at,
                   j.id, j.title, j.description, j.requirements, j.location,
                   j.salary_range, j.job_type, j.experience_level, j.skills,
                   j.recruiter_id, j.status, j.created_at,
                   u.name AS recruiter_name,
                   c.name AS company_name, c.logo AS company_logo,
                   c.website AS company_website, c.about AS company_about
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN users u ON u.id = j.recruiter_id
            LEFT JOIN companies c ON c.id = u.company_id
            WHERE a.candidate_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_application_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<(Application, Uuid)>, sqlx::Error> {
        #[derive(FromRow)]
        struct Row {
            #[sqlx(flatten)]
            application: Application,
            job_recruiter_id: Uuid,
        }

        let row = sqlx::query_as::<_, Row>(
            r#"
            SELECT a.id, a.job_id, a.candidate_id, a.resume_url, a.status, a.applied_at,
                   j.recruiter_id AS job_recruiter_id
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| (r.application, r.job_recruiter_id)))
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
