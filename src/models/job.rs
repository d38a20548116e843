use serde::{Deserialize, Serialize};
use sqlx::{prelude::Type, FromRow};
use uuid::Uuid;

/// Smallest page size the listing endpoint will accept.
pub const MIN_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
/// Upper bound on page size so a single request cannot drag the whole table.
pub const MAX_LIMIT: i64 = 100;

#[derive(Type, Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Closed,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub job_type: String,
    pub experience_level: Option<String>,
    /// Comma-joined list, mirrored as-is to clients.
    pub skills: Option<String>,
    pub recruiter_id: Uuid,
    pub status: JobStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub job_type: String,
    pub experience_level: Option<String>,
    pub skills: Option<String>,
}

/// Recruiter context attached to every listed job.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecruiterInfo {
    pub name: String,
    pub company: Option<CompanySummary>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompanySummary {
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobWithRecruiter {
    #[serde(flatten)]
    pub job: Job,
    pub recruiter: RecruiterInfo,
}

/// Flat row shape produced by the listing join; folded into
/// [`JobWithRecruiter`] before leaving the repository.
#[derive(Debug, FromRow)]
pub struct JobJoinRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub job_type: String,
    pub experience_level: Option<String>,
    pub skills: Option<String>,
    pub recruiter_id: Uuid,
    pub status: JobStatus,
    pub created_at: time::OffsetDateTime,
    pub recruiter_name: String,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub company_website: Option<String>,
    pub company_about: Option<String>,
}

impl From<JobJoinRow> for JobWithRecruiter {
    fn from(row: JobJoinRow) -> Self {
        let company = row.company_name.map(|name| CompanySummary {
            name,
            logo: row.company_logo,
            website: row.company_website,
            about: row.company_about,
        });
        JobWithRecruiter {
            job: Job {
                id: row.id,
                title: row.title,
                description: row.description,
                requirements: row.requirements,
                location: row.location,
                salary_range: row.salary_range,
                job_type: row.job_type,
                experience_level: row.experience_level,
                skills: row.skills,
                recruiter_id: row.recruiter_id,
                status: row.status,
                created_at: row.created_at,
            },
            recruiter: RecruiterInfo {
                name: row.recruiter_name,
                company,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobSort {
    #[default]
    Newest,
    Oldest,
}

impl JobSort {
    fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => JobSort::Oldest,
            _ => JobSort::Newest,
        }
    }
}

/// Optional listing filters. Absent fields impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
}

impl JobFilter {
    /// Matching policy: title/location by case-insensitive substring,
    /// job type and experience level by exact value.
    pub fn matches(&self, job: &Job) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };
        if let Some(title) = &self.title {
            if !contains(&job.title, title) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains(&job.location, location) {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if job.job_type != *job_type {
                return false;
            }
        }
        if let Some(level) = &self.experience_level {
            if job.experience_level.as_deref() != Some(level.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Raw query string of `GET /api/jobs`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsParams {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized listing request: filters plus clamped page/limit.
#[derive(Debug, Clone)]
pub struct JobQuery {
    pub filter: JobFilter,
    pub sort: JobSort,
    pub page: i64,
    pub limit: i64,
}

impl JobQuery {
    pub fn from_params(params: ListJobsParams) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        JobQuery {
            filter: JobFilter {
                title: non_empty(params.title),
                location: non_empty(params.location),
                job_type: non_empty(params.job_type),
                experience_level: non_empty(params.experience_level),
            },
            sort: JobSort::from_param(params.sort.as_deref()),
            page: params.page.unwrap_or(MIN_PAGE).max(MIN_PAGE),
            limit: params
                .limit
                .unwrap_or(DEFAULT_LIMIT)
                .clamp(MIN_PAGE, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Listing metadata returned alongside every page of jobs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        // Guard the ceiling division; callers normally pass a clamped limit.
        let limit = limit.max(MIN_PAGE);
        Pagination {
            total,
            current_page: page,
            total_pages: (total + limit - 1) / limit,
            limit,
        }
    }
}
