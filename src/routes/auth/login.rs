use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    responses::JsonResponse,
    state::AppState,
    utils::password::verify_password,
};

use super::{issue_session_cookie, session::AuthSession};

#[derive(Deserialize, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

pub async fn handle_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Response {
    let email = payload.email.trim().to_lowercase();

    let user = match state.users.find_user_by_email(&email).await {
        Ok(Some(record)) => record,
        Ok(None) => return JsonResponse::unauthorized("Invalid credentials").into_response(),
        Err(e) => {
            tracing::error!("DB error looking up user: {:?}", e);
            return JsonResponse::server_error("Database error").into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => match issue_session_cookie(&user) {
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
        },
        Ok(false) => JsonResponse::unauthorized("Invalid credentials").into_response(),
        Err(e) => {
            tracing::error!("Password verification error: {:?}", e);
            JsonResponse::server_error("Internal error").into_response()
        }
    }
}

pub async fn handle_me(
    State(state): State<AppState>,
    AuthSession(claims): AuthSession,
) -> Response {
    let user_id = match Uuid::parse_str(&claims.id) {
        Ok(id) => id,
        Err(_) => return JsonResponse::unauthorized("Invalid user ID").into_response(),
    };

    match state.users.find_public_user_by_id(user_id).await {
        Ok(Some(user)) => Json(json!({ "success": true, "user": user })).into_response(),
        Ok(None) => JsonResponse::unauthorized("User not found").into_response(),
        Err(e) => {
            tracing::error!("DB error in handle_me: {:?}", e);
            JsonResponse::server_error("Database error").into_response()
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
        db::{
            mock_db::{
                InMemoryApplicationRepository, InMemoryJobRepository, InMemorySavedJobRepository,
                InMemoryUserRepository,
            },
            user_repository::UserRepository,
        },
        models::signup::{RoleDetails, SignupPayload},
        state::AppState,
        utils::password::hash_password,
    };

    async fn make_app_with_user(email: &str, password: &str) -> Router {
        std::env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        let users = InMemoryUserRepository::default();
        let payload = SignupPayload {
            name: "Test User".into(),
            email: email.into(),
            password: password.into(),
            role: RoleDetails::Candidate,
        };
        users
            .create_user(&payload, &hash_password(password).unwrap())
            .await
            .unwrap();

        let state = AppState {
            users: Arc::new(users),
            jobs: Arc::new(InMemoryJobRepository::default()),
            applications: Arc::new(InMemoryApplicationRepository::default()),
            saved_jobs: Arc::new(InMemorySavedJobRepository::default()),
        };

        Router::new()
            .route("/login", post(handle_login))
            .with_state(state)
    }

    async fn post_login(app: Router, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
        let body = json!({ "email": email, "password": password });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
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
    async fn login_sets_cookie_and_returns_user() {
        let app = make_app_with_user("ada@example.com", "hunter22").await;
        let body = json!({ "email": "ada@example.com", "password": "hunter22" });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get("set-cookie")
            .expect("login should set a cookie")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("auth_token="));
        assert!(set_cookie.contains("HttpOnly"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["user"]["email"], "ada@example.com");
        assert!(json["user"]["passwordHash"].is_null());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = make_app_with_user("ada@example.com", "hunter22").await;
        let (status, json) = post_login(app, "ada@example.com", "wrong").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized_with_same_message() {
        let app = make_app_with_user("ada@example.com", "hunter22").await;
        let (status, json) = post_login(app, "nobody@example.com", "hunter22").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Invalid credentials");
    }
}
