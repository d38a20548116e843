use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    models::{
        application::ApplicationStatus,
        job::JobStatus,
        user::UserRole,
    },
    responses::JsonResponse,
    state::AppState,
};

use super::auth::session::AuthSession;

fn session_user_id(session: &AuthSession) -> Result<Uuid, Response> {
    Uuid::parse_str(&session.0.id)
        .map_err(|_| JsonResponse::unauthorized("Invalid session").into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: Uuid,
    pub resume_url: String,
}

/// `POST /api/applications`. One application per candidate per job; closed
/// postings no longer accept applications.
pub async fn apply(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<ApplyRequest>,
) -> Response {
    if session.0.role != UserRole::Candidate {
        return JsonResponse::forbidden("Only candidates can apply for jobs").into_response();
    }
    let candidate_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let resume_url = payload.resume_url.trim();
    if resume_url.is_empty() {
        return JsonResponse::bad_request("Resume is required").into_response();
    }

    let job = match state.jobs.find_job_basic(payload.job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => return JsonResponse::not_found("Job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching job: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };
    if job.status == JobStatus::Closed {
        return JsonResponse::bad_request("This job is no longer accepting applications")
            .into_response();
    }

    match state
        .applications
        .find_application(payload.job_id, candidate_id)
        .await
    {
        Ok(Some(_)) => {
            return JsonResponse::bad_request("You have already applied for this job")
                .into_response()
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error checking existing application: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    }

    match state
        .applications
        .create_application(payload.job_id, candidate_id, resume_url)
        .await
    {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(e) => {
            tracing::error!("DB error creating application: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

/// Candidate's own applications, each with its job attached.
pub async fn my_applications(State(state): State<AppState>, session: AuthSession) -> Response {
    let candidate_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .applications
        .applications_for_candidate(candidate_id)
        .await
    {
        Ok(applications) => Json(applications).into_response(),
        Err(e) => {
            tracing::error!("DB error listing applications: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

/// Tells the job detail page whether the current candidate already applied.
pub async fn check_application(
    State(state): State<AppState>,
    session: AuthSession,
    Path(job_id): Path<Uuid>,
) -> Response {
    let candidate_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .applications
        .find_application(job_id, candidate_id)
        .await
    {
        Ok(Some(application)) => Json(json!({
            "hasApplied": true,
            "status": application.status,
            "applicationId": application.id,
        }))
        .into_response(),
        Ok(None) => Json(json!({ "hasApplied": false })).into_response(),
        Err(e) => {
            tracing::error!("DB error checking application: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

/// Recruiter view of everyone who applied to one of their postings.
pub async fn applications_for_job(
    State(state): State<AppState>,
    session: AuthSession,
    Path(job_id): Path<Uuid>,
) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let job = match state.jobs.find_job_basic(job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => return JsonResponse::not_found("Job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching job: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };
    if job.recruiter_id != user_id {
        return JsonResponse::forbidden("Not authorized to view these applications")
            .into_response();
    }

    match state.applications.applications_for_job(job_id).await {
        Ok(applications) => Json(applications).into_response(),
        Err(e) => {
            tracing::error!("DB error listing applications for job: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

pub async fn update_status(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let (mut application, owner) = match state.applications.find_application_with_owner(id).await {
        Ok(Some(found)) => found,
        Ok(None) => return JsonResponse::not_found("Application not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching application {id}: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    if owner != user_id {
        return JsonResponse::forbidden("Not authorized to update this application")
            .into_response();
    }

    if let Err(e) = state
        .applications
        .set_application_status(id, payload.status)
        .await
    {
        tracing::error!("DB error updating application {id}: {:?}", e);
        return JsonResponse::server_error("Internal server error").into_response();
    }

    application.status = payload.status;
    Json(json!({
        "message": "Application status updated",
        "application": application,
    }))
    .into_response()
}
