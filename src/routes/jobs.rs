use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    models::{
        job::{CreateJobPayload, JobQuery, JobStatus, ListJobsParams, Pagination},
        user::UserRole,
    },
    responses::JsonResponse,
    state::AppState,
};

use super::auth::session::AuthSession;

/// How many related postings ride along with a job detail view.
const RELATED_JOBS_LIMIT: i64 = 3;

fn session_user_id(session: &AuthSession) -> Result<Uuid, Response> {
    Uuid::parse_str(&session.0.id)
        .map_err(|_| JsonResponse::unauthorized("Invalid session").into_response())
}

/// `GET /api/jobs`. Filtering, sorting and pagination all happen in one
/// repository round trip; the page metadata is computed from the total
/// count of matching rows.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsParams>,
) -> Response {
    let query = JobQuery::from_params(params);

    match state.jobs.list_jobs(&query).await {
        Ok((jobs, total)) => Json(json!({
            "jobs": jobs,
            "pagination": Pagination::new(total, query.page, query.limit),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("DB error listing jobs: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

pub async fn get_job(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.jobs.find_job(id).await {
        Ok(Some(job)) => Json(job).into_response(),
        Ok(None) => JsonResponse::not_found("Job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching job {id}: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

/// Other open postings in the same location, excluding the job itself.
pub async fn related_jobs(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let job = match state.jobs.find_job_basic(id).await {
        Ok(Some(job)) => job,
        Ok(None) => return JsonResponse::not_found("Job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching job {id}: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    match state
        .jobs
        .related_jobs(&job.location, id, RELATED_JOBS_LIMIT)
        .await
    {
        Ok(jobs) => Json(jobs).into_response(),
        Err(e) => {
            tracing::error!("DB error fetching related jobs for {id}: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

pub async fn my_jobs(State(state): State<AppState>, session: AuthSession) -> Response {
    if session.0.role != UserRole::Recruiter {
        return JsonResponse::forbidden("Only recruiters can access this resource").into_response();
    }
    let recruiter_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.jobs.jobs_by_recruiter(recruiter_id).await {
        Ok(jobs) => Json(jobs).into_response(),
        Err(e) => {
            tracing::error!("DB error fetching recruiter jobs: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

fn validate_job_payload(payload: &CreateJobPayload) -> Result<(), &'static str> {
    let required = [
        &payload.title,
        &payload.description,
        &payload.requirements,
        &payload.location,
        &payload.job_type,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err("Please fill in all required fields");
    }
    Ok(())
}

pub async fn create_job(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<CreateJobPayload>,
) -> Response {
    if session.0.role != UserRole::Recruiter {
        return JsonResponse::forbidden("Only recruiters can post jobs").into_response();
    }
    let recruiter_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Err(msg) = validate_job_payload(&payload) {
        return JsonResponse::bad_request(msg).into_response();
    }

    match state.jobs.create_job(recruiter_id, &payload).await {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(e) => {
            tracing::error!("DB error creating job: {:?}", e);
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}

/// Shared owner check plus status flip for the close/reopen endpoints.
async fn change_job_status(
    state: AppState,
    session: AuthSession,
    id: Uuid,
    status: JobStatus,
    denied: &'static str,
    done: &'static str,
) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut job = match state.jobs.find_job_basic(id).await {
        Ok(Some(job)) => job,
        Ok(None) => return JsonResponse::not_found("Job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching job {id}: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    if job.recruiter_id != user_id {
        return JsonResponse::forbidden(denied).into_response();
    }

    if let Err(e) = state.jobs.set_job_status(id, status).await {
        tracing::error!("DB error updating job {id} status: {:?}", e);
        return JsonResponse::server_error("Internal server error").into_response();
    }

    job.status = status;
    Json(json!({ "message": done, "job": job })).into_response()
}

pub async fn close_job(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Response {
    change_job_status(
        state,
        session,
        id,
        JobStatus::Closed,
        "Not authorized to close this job",
        "Job closed successfully",
    )
    .await
}

pub async fn reopen_job(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Response {
    change_job_status(
        state,
        session,
        id,
        JobStatus::Open,
        "Not authorized to reopen this job",
        "Job reopened successfully",
    )
    .await
}

pub async fn delete_job(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Response {
    let user_id = match session_user_id(&session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let job = match state.jobs.find_job_basic(id).await {
        Ok(Some(job)) => job,
        Ok(None) => return JsonResponse::not_found("Job not found").into_response(),
        Err(e) => {
            tracing::error!("DB error fetching job {id}: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    if job.recruiter_id != user_id {
        return JsonResponse::forbidden("Not authorized to delete this job").into_response();
    }

    if let Err(e) = state.jobs.delete_job(id).await {
        tracing::error!("DB error deleting job {id}: {:?}", e);
        return JsonResponse::server_error("Internal server error").into_response();
    }

    JsonResponse::success("Job deleted successfully").into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        routing::{get, patch, post},
        Router,
    };
    use axum_extra::extract::cookie::Cookie;
    use time::{Duration, OffsetDateTime};
    use tower::util::ServiceExt;

    use super::*;
    use crate::{
        db::mock_db::{
            InMemoryApplicationRepository, InMemoryJobRepository, InMemorySavedJobRepository,
            InMemoryUserRepository,
        },
        models::job::{Job, JobWithRecruiter, RecruiterInfo},
        routes::auth::claims::Claims,
        state::AppState,
        utils::jwt::create_jwt,
    };

    fn sample_job(n: u32, recruiter_id: Uuid) -> JobWithRecruiter {
        JobWithRecruiter {
            job: Job {
                id: Uuid::new_v4(),
                title: format!("Engineer {n}"),
                description: "desc".into(),
                requirements: "reqs".into(),
                location: "Oslo".into(),
                salary_range: None,
                job_type: "Full-time".into(),
                experience_level: Some("Senior".into()),
                skills: None,
                recruiter_id,
                status: JobStatus::Open,
                // Spread creation times so ordering is deterministic.
                created_at: OffsetDateTime::now_utc() - Duration::minutes(n as i64),
            },
            recruiter: RecruiterInfo {
                name: "Recruiter".into(),
                company: None,
            },
        }
    }

    fn make_app(jobs: InMemoryJobRepository) -> Router {
        std::env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        let state = AppState {
            users: Arc::new(InMemoryUserRepository::default()),
            jobs: Arc::new(jobs),
            applications: Arc::new(InMemoryApplicationRepository::default()),
            saved_jobs: Arc::new(InMemorySavedJobRepository::default()),
        };
        Router::new()
            .route("/jobs", get(list_jobs).post(create_job))
            .route("/jobs/my-jobs", get(my_jobs))
            .route("/jobs/{id}", get(get_job).delete(delete_job))
            .route("/jobs/{id}/related", get(related_jobs))
            .route("/jobs/{id}/close", patch(close_job))
            .route("/jobs/{id}/reopen", patch(reopen_job))
            .with_state(state)
    }

    fn auth_cookie(user_id: Uuid, role: UserRole) -> String {
        let claims = Claims {
            id: user_id.to_string(),
            name: "Test".into(),
            email: "test@example.com".into(),
            role,
            exp: (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp() as usize,
        };
        let jwt = create_jwt(&claims).unwrap();
        Cookie::new("auth_token", jwt).to_string()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        send(
            app,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    #[tokio::test]
    async fn last_page_holds_the_remainder() {
        let recruiter = Uuid::new_v4();
        let jobs = (0..25).map(|n| sample_job(n, recruiter)).collect();
        let app = make_app(InMemoryJobRepository::with_jobs(jobs));

        let (status, json) = get_json(app, "/jobs?page=3&limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["jobs"].as_array().unwrap().len(), 5);
        assert_eq!(json["pagination"]["total"], 25);
        assert_eq!(json["pagination"]["totalPages"], 3);
        assert_eq!(json["pagination"]["currentPage"], 3);
        assert_eq!(json["pagination"]["limit"], 10);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_but_keeps_totals() {
        let recruiter = Uuid::new_v4();
        let jobs = (0..25).map(|n| sample_job(n, recruiter)).collect();
        let app = make_app(InMemoryJobRepository::with_jobs(jobs));

        let (status, json) = get_json(app, "/jobs?page=4&limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["jobs"].as_array().unwrap().is_empty());
        assert_eq!(json["pagination"]["total"], 25);
        assert_eq!(json["pagination"]["totalPages"], 3);
    }

    #[tokio::test]
    async fn oldest_sort_reverses_the_default_order() {
        let recruiter = Uuid::new_v4();
        let jobs = (0..3).map(|n| sample_job(n, recruiter)).collect();
        let app = make_app(InMemoryJobRepository::with_jobs(jobs));

        let (_, newest) = get_json(app.clone(), "/jobs").await;
        let (_, oldest) = get_json(app, "/jobs?sort=oldest").await;

        let newest_titles: Vec<_> = newest["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["title"].as_str().unwrap().to_string())
            .collect();
        let mut reversed = newest_titles.clone();
        reversed.reverse();
        let oldest_titles: Vec<_> = oldest["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(oldest_titles, reversed);
        assert_eq!(newest_titles[0], "Engineer 0");
    }

    #[tokio::test]
    async fn title_filter_narrows_results_and_total() {
        let recruiter = Uuid::new_v4();
        let mut jobs: Vec<JobWithRecruiter> = (0..5).map(|n| sample_job(n, recruiter)).collect();
        jobs[0].job.title = "Rust Developer".into();
        let app = make_app(InMemoryJobRepository::with_jobs(jobs));

        let (status, json) = get_json(app, "/jobs?title=rust").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["jobs"].as_array().unwrap().len(), 1);
        assert_eq!(json["pagination"]["total"], 1);
        assert_eq!(json["jobs"][0]["title"], "Rust Developer");
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let app = make_app(InMemoryJobRepository::default());
        let (status, json) = get_json(app, &format!("/jobs/{}", Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Job not found");
    }

    #[tokio::test]
    async fn candidates_cannot_post_jobs() {
        let app = make_app(InMemoryJobRepository::default());
        let request = Request::builder()
            .method("POST")
            .uri("/jobs")
            .header("Content-Type", "application/json")
            .header(header::COOKIE, auth_cookie(Uuid::new_v4(), UserRole::Candidate))
            .body(Body::from(
                serde_json::json!({
                    "title": "T",
                    "description": "D",
                    "requirements": "R",
                    "location": "L",
                    "jobType": "Full-time"
                })
                .to_string(),
            ))
            .unwrap();
        let (status, json) = send(app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Only recruiters can post jobs");
    }

    #[tokio::test]
    async fn recruiter_creates_a_job() {
        let recruiter = Uuid::new_v4();
        let app = make_app(InMemoryJobRepository::default());
        let request = Request::builder()
            .method("POST")
            .uri("/jobs")
            .header("Content-Type", "application/json")
            .header(header::COOKIE, auth_cookie(recruiter, UserRole::Recruiter))
            .body(Body::from(
                serde_json::json!({
                    "title": "Backend Engineer",
                    "description": "D",
                    "requirements": "R",
                    "location": "Oslo",
                    "jobType": "Full-time"
                })
                .to_string(),
            ))
            .unwrap();
        let (status, json) = send(app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["title"], "Backend Engineer");
        assert_eq!(json["status"], "open");
        assert_eq!(json["recruiterId"], recruiter.to_string());
    }

    #[tokio::test]
    async fn blank_required_field_is_rejected() {
        let app = make_app(InMemoryJobRepository::default());
        let request = Request::builder()
            .method("POST")
            .uri("/jobs")
            .header("Content-Type", "application/json")
            .header(
                header::COOKIE,
                auth_cookie(Uuid::new_v4(), UserRole::Recruiter),
            )
            .body(Body::from(
                serde_json::json!({
                    "title": "  ",
                    "description": "D",
                    "requirements": "R",
                    "location": "L",
                    "jobType": "Full-time"
                })
                .to_string(),
            ))
            .unwrap();
        let (status, json) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Please fill in all required fields");
    }

    #[tokio::test]
    async fn only_the_owner_can_close_a_job() {
        let owner = Uuid::new_v4();
        let job = sample_job(0, owner);
        let job_id = job.job.id;
        let app = make_app(InMemoryJobRepository::with_jobs(vec![job]));

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/jobs/{job_id}/close"))
            .header(
                header::COOKIE,
                auth_cookie(Uuid::new_v4(), UserRole::Recruiter),
            )
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Not authorized to close this job");

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/jobs/{job_id}/close"))
            .header(header::COOKIE, auth_cookie(owner, UserRole::Recruiter))
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Job closed successfully");
        assert_eq!(json["job"]["status"], "closed");
    }

    #[tokio::test]
    async fn related_jobs_share_location_and_skip_closed() {
        let recruiter = Uuid::new_v4();
        let mut jobs: Vec<JobWithRecruiter> = (0..4).map(|n| sample_job(n, recruiter)).collect();
        jobs[1].job.location = "Bergen".into();
        jobs[2].job.status = JobStatus::Closed;
        let target = jobs[0].job.id;
        let app = make_app(InMemoryJobRepository::with_jobs(jobs));

        let (status, json) = get_json(app, &format!("/jobs/{target}/related")).await;
        assert_eq!(status, StatusCode::OK);
        let related = json.as_array().unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0]["title"], "Engineer 3");
    }

    #[tokio::test]
    async fn related_jobs_come_newest_first_up_to_the_limit() {
        let recruiter = Uuid::new_v4();
        let jobs: Vec<JobWithRecruiter> = (0..6).map(|n| sample_job(n, recruiter)).collect();
        let target = jobs[0].job.id;
        let app = make_app(InMemoryJobRepository::with_jobs(jobs));

        let (status, json) = get_json(app, &format!("/jobs/{target}/related")).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Engineer 1", "Engineer 2", "Engineer 3"]);
    }

    #[tokio::test]
    async fn my_jobs_requires_a_recruiter_session() {
        let app = make_app(InMemoryJobRepository::default());
        let request = Request::builder()
            .uri("/jobs/my-jobs")
            .header(
                header::COOKIE,
                auth_cookie(Uuid::new_v4(), UserRole::Candidate),
            )
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn owner_deletes_a_job() {
        let owner = Uuid::new_v4();
        let job = sample_job(0, owner);
        let job_id = job.job.id;
        let app = make_app(InMemoryJobRepository::with_jobs(vec![job]));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/jobs/{job_id}"))
            .header(header::COOKIE, auth_cookie(owner, UserRole::Recruiter))
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Job deleted successfully");

        let (status, _) = get_json(app, &format!("/jobs/{job_id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
