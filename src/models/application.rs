use serde::{Deserialize, Serialize};
use sqlx::{prelude::Type, FromRow};
use uuid::Uuid;

use super::job::JobWithRecruiter;

#[derive(Type, Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Rejected,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub resume_url: String,
    pub status: ApplicationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: time::OffsetDateTime,
}

/// Recruiter view of an application: who applied.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApplicationWithCandidate {
    #[serde(flatten)]
    pub application: Application,
    pub candidate: CandidateSummary,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CandidateSummary {
    pub name: String,
    pub email: String,
}

/// Candidate view of an application: which posting it targets.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: JobWithRecruiter,
}
