use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::{
    models::password_reset::RESET_TOKEN_TTL_MINUTES, responses::JsonResponse, state::AppState,
    utils::token::generate_reset_token,
};

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Issues a reset token for an existing account. The token rides back in
/// the response body; there is no mail delivery in this system. Any
/// earlier unused token for the account is retired by the insert.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Response {
    let email = payload.email.trim().to_lowercase();

    match state.users.find_user_by_email(&email).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return JsonResponse::not_found("No account found with that email address")
                .into_response()
        }
        Err(e) => {
            tracing::error!("DB error looking up user by email: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    }

    let token = generate_reset_token();
    let expires_at = OffsetDateTime::now_utc() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

    if let Err(e) = state
        .users
        .insert_password_reset_token(&email, &token, expires_at)
        .await
    {
        tracing::error!("Failed to insert password reset token: {:?}", e);
        return JsonResponse::server_error("Internal server error").into_response();
    }

    Json(json!({
        "message": "Password reset token generated",
        "token": token,
        "expiresIn": "15 minutes"
    }))
    .into_response()
}
