use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{responses::JsonResponse, state::AppState};

use super::auth::session::AuthSession;

fn session_user_id(session: &AuthSession) -> Result<Uuid, Response> {
    Uuid::parse_str(&session.0.id)
        .map_err(|_| JsonResponse::unauthorized("Invalid session").into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobRequest {
    pub job_id: Uuid,
}

pub async fn save_job(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<SaveJobRequest>,
) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.jobs.find_job_basic(payload.job_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return JsonResponse::not_found("Job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching job: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    }

    match state.saved_jobs.find_saved(user_id, payload.job_id).await {
        Ok(Some(_)) => return JsonResponse::bad_request("Job already saved").into_response(),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error checking saved job: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    }

    match state.saved_jobs.save_job(user_id, payload.job_id).await {
        Ok(saved) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Job saved successfully", "savedJob": saved })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("DB error saving job: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

pub async fn unsave_job(
    State(state): State<AppState>,
    session: AuthSession,
    Path(job_id): Path<Uuid>,
) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.saved_jobs.unsave_job(user_id, job_id).await {
        Ok(true) => JsonResponse::success("Job unsaved successfully").into_response(),
        Ok(false) => JsonResponse::not_found("Saved job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error unsaving job: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

/// The user's saved jobs, most recently saved first.
pub async fn list_saved_jobs(State(state): State<AppState>, session: AuthSession) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.saved_jobs.saved_jobs_for_user(user_id).await {
        Ok(saved) => Json(saved).into_response(),
        Err(e) => {
            tracing::error!("DB error listing saved jobs: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

/// Tells the job detail page whether the job is already bookmarked.
pub async fn check_saved(
    State(state): State<AppState>,
    session: AuthSession,
    Path(job_id): Path<Uuid>,
) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.saved_jobs.find_saved(user_id, job_id).await {
        Ok(saved) => Json(json!({ "isSaved": saved.is_some() })).into_response(),
        Err(e) => {
            tracing::error!("DB error checking saved job: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}
