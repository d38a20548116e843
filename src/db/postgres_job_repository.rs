use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::job::{
    CreateJobPayload, Job, JobFilter, JobJoinRow, JobQuery, JobSort, JobStatus, JobWithRecruiter,
};

use super::job_repository::JobRepository;

/// Listing projection: every job joined with its recruiter and, where one
/// exists, the recruiter's company.
const JOB_JOIN_SELECT: &str = r#"
SELECT j.id, j.title, j.description, j.requirements, j.location,
       j.salary_range, j.job_type, j.experience_level, j.skills,
       j.recruiter_id, j.status, j.created_at,
       u.name AS recruiter_name,
       c.name AS company_name, c.logo AS company_logo,
       c.website AS company_website, c.about AS company_about
FROM jobs j
JOIN users u ON u.id = j.recruiter_id
LEFT JOIN companies c ON c.id = u.company_id
"#;

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(title) = &filter.title {
        builder
            .push(" AND j.title ILIKE ")
            .push_bind(format!("%{}%", title));
    }
    if let Some(location) = &filter.location {
        builder
            .push(" AND j.location ILIKE ")
            .push_bind(format!("%{}%", location));
    }
    if let Some(job_type) = &filter.job_type {
        builder.push(" AND j.job_type = ").push_bind(job_type.clone());
    }
    if let Some(level) = &filter.experience_level {
        builder
            .push(" AND j.experience_level = ")
            .push_bind(level.clone());
    }
}

pub struct PostgresJobRepository {
    pub pool: PgPool,
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create_job(
        &self,
        recruiter_id: Uuid,
        payload: &CreateJobPayload,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description, requirements, location,
                              salary_range, job_type, experience_level, skills, recruiter_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, requirements, location,
                      salary_range, job_type, experience_level, skills,
                      recruiter_id, status, created_at
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.requirements)
        .bind(&payload.location)
        .bind(&payload.salary_range)
        .bind(&payload.job_type)
        .bind(&payload.experience_level)
        .bind(&payload.skills)
        .bind(recruiter_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_jobs(
        &self,
        query: &JobQuery,
    ) -> Result<(Vec<JobWithRecruiter>, i64), sqlx::Error> {
        let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs j");
        push_filters(&mut count_builder, &query.filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new(JOB_JOIN_SELECT);
        push_filters(&mut builder, &query.filter);
        // Id as tie-break keeps pages stable when timestamps collide.
        builder.push(match query.sort {
            JobSort::Newest => " ORDER BY j.created_at DESC, j.id DESC",
            JobSort::Oldest => " ORDER BY j.created_at ASC, j.id ASC",
        });
        builder.push(" LIMIT ").push_bind(query.limit);
        builder.push(" OFFSET ").push_bind(query.offset());

        let rows: Vec<JobJoinRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobWithRecruiter>, sqlx::Error> {
        let row = sqlx::query_as::<_, JobJoinRow>(&format!("{JOB_JOIN_SELECT} WHERE j.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_job_basic(&self, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, requirements, location,
                   salary_range, job_type, experience_level, skills,
                   recruiter_id, status, created_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn related_jobs(
        &self,
        location: &str,
        exclude: Uuid,
        limit: i64,
    ) -> Result<Vec<JobWithRecruiter>, sqlx::Error> {
        let rows = sqlx::query_as::<_, JobJoinRow>(&format!(
            r#"
            {JOB_JOIN_SELECT}
            WHERE j.location = $1 AND j.id <> $2 AND j.status = 'open'
            ORDER BY j.created_at DESC, j.id DESC
            LIMIT $3
            "#
        ))
        .bind(location)
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn jobs_by_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> Result<Vec<JobWithRecruiter>, sqlx::Error> {
        let rows = sqlx::query_as::<_, JobJoinRow>(&format!(
            "{JOB_JOIN_SELECT} WHERE j.recruiter_id = $1 ORDER BY j.created_at DESC, j.id DESC"
        ))
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_job(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
