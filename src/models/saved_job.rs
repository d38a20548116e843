use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::job::JobWithRecruiter;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: time::OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SavedJobWithJob {
    #[serde(flatten)]
    pub saved: SavedJob,
    pub job: JobWithRecruiter,
}
