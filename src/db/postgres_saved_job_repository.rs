use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    job::JobJoinRow,
    saved_job::{SavedJob, SavedJobWithJob},
};

use super::saved_job_repository::SavedJobRepository;

#[derive(FromRow)]
struct SavedJobRow {
    saved_id: Uuid,
    user_id: Uuid,
    saved_at: OffsetDateTime,
    #[sqlx(flatten)]
    job: JobJoinRow,
}

impl From<SavedJobRow> for SavedJobWithJob {
    fn from(row: SavedJobRow) -> Self {
        let saved = SavedJob {
            id: row.saved_id,
            user_id: row.user_id,
            job_id: row.job.id,
            saved_at: row.saved_at,
        };
        SavedJobWithJob {
            saved,
            job: row.job.into(),
        }
    }
}

pub struct PostgresSavedJobRepository {
    pub pool: PgPool,
}

#[async_trait]
impl SavedJobRepository for PostgresSavedJobRepository {
    async fn find_saved(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<SavedJob>, sqlx::Error> {
        sqlx::query_as::<_, SavedJob>(
            r#"
            SELECT id, user_id, job_id, saved_at
            FROM saved_jobs
            WHERE user_id = $1 AND job_id = $2
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_job(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob, sqlx::Error> {
        sqlx::query_as::<_, SavedJob>(
            r#"
            INSERT INTO saved_jobs (user_id, job_id)
            VALUES ($1, $2)
            RETURNING id, user_id, job_id, saved_at
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn unsave_job(&self, user_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn saved_jobs_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SavedJobWithJob>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SavedJobRow>(
            r#"
            SELECT s.id AS saved_id, s.user_id, s.saved_at,
                   j.id, j.title, j.description, j.requirements, j.location,
                   j.salary_range, j.job_type, j.experience_level, j.skills,
                   j.recruiter_id, j.status, j.created_at,
                   u.name AS recruiter_name,
                   c.name AS company_name, c.logo AS company_logo,
                   c.website AS company_website, c.about AS company_about
            FROM saved_jobs s
            JOIN jobs j ON j.id = s.job_id
            JOIN users u ON u.id = j.recruiter_id
            LEFT JOIN companies c ON c.id = u.company_id
            WHERE s.user_id = $1
            ORDER BY s.saved_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
