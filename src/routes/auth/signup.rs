use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    models::signup::SignupPayload, responses::JsonResponse, state::AppState,
    utils::password::hash_password,
};

use super::issue_session_cookie;

const MIN_PASSWORD_LENGTH: usize = 6;

fn validate(payload: &SignupPayload) -> Result<(), &'static str> {
    if payload.name.trim().is_empty() {
        return Err("Name is required");
    }
    if !payload.email.contains('@') {
        return Err("Please include a valid email");
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err("Please enter a password with 6 or more characters");
    }
    Ok(())
}

pub async fn handle_signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Response {
    let mut payload = payload;
    payload.email = payload.email.trim().to_lowercase();
    payload.name = payload.name.trim().to_string();

    if let Err(msg) = validate(&payload) {
        return JsonResponse::bad_request(msg).into_response();
    }

    match state.users.is_email_taken(&payload.email).await {
        Ok(true) => return JsonResponse::bad_request("User already exists").into_response(),
        Ok(false) => {}
        Err(e) => {
            tracing::error!("DB error checking email: {:?}", e);
            return JsonResponse::server_error("Database error").into_response();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {:?}", e);
            return JsonResponse::server_error("Password hashing failed").into_response();
        }
    };

    // Company creation (for recruiters) and the user insert share one
    // transaction inside the repository.
    let user = match state.users.create_user(&payload, &password_hash).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to create user: {:?}", e);
            return JsonResponse::server_error("Could not create user").into_response();
        }
    };

    match issue_session_cookie(&user) {
        Ok((headers, public_user)) => (
            StatusCode::OK,
            headers,
            Json(json!({ "success": true, "user": public_user })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("JWT error: {:?}", e);
            JsonResponse::server_error("Token generation failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::json;
    use tower::util::ServiceExt;

    use super::*;
    use crate::{
        db::mock_db::{
            InMemoryApplicationRepository, InMemoryJobRepository, InMemorySavedJobRepository,
            InMemoryUserRepository,
        },
        state::AppState,
    };

    fn make_app(users: InMemoryUserRepository) -> Router {
        std::env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        let state = AppState {
            users: Arc::new(users),
            jobs: Arc::new(InMemoryJobRepository::default()),
            applications: Arc::new(InMemoryApplicationRepository::default()),
            saved_jobs: Arc::new(InMemorySavedJobRepository::default()),
        };
        Router::new()
            .route("/register", post(handle_signup))
            .with_state(state)
    }

    async fn post_signup(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn candidate_signup_succeeds() {
        let app = make_app(InMemoryUserRepository::default());
        let (status, json) = post_signup(
            app,
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "secret1",
                "role": "candidate"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["role"], "candidate");
        assert!(json["user"]["companyId"].is_null());
    }

    #[tokio::test]
    async fn recruiter_signup_creates_company() {
        let app = make_app(InMemoryUserRepository::default());
        let (status, json) = post_signup(
            app,
            json!({
                "name": "Rex",
                "email": "rex@acme.test",
                "password": "secret1",
                "role": "recruiter",
                "companyName": "Acme",
                "companyWebsite": "https://acme.test"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["role"], "recruiter");
        assert!(json["user"]["companyId"].is_string());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let users = InMemoryUserRepository::default();
        let app = make_app(users);
        let body = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret1",
            "role": "candidate"
        });
        let (status, _) = post_signup(app.clone(), body.clone()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = post_signup(app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "User already exists");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = make_app(InMemoryUserRepository::default());
        let (status, json) = post_signup(
            app,
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "short",
                "role": "candidate"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Please enter a password with 6 or more characters"
        );
    }

    #[tokio::test]
    async fn unknown_role_is_rejected_by_deserialization() {
        let app = make_app(InMemoryUserRepository::default());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        json!({
                            "name": "X",
                            "email": "x@example.com",
                            "password": "secret1",
                            "role": "admin"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
