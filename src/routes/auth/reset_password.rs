use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    models::password_reset::{PasswordResetToken, TokenState},
    responses::JsonResponse,
    state::AppState,
    utils::password::hash_password,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    token: String,
    new_password: String,
}

const MIN_PASSWORD_LENGTH: usize = 6;

/// Loads the token record and rejects replayed or stale tokens. Expiry is
/// checked lazily against the current clock.
async fn load_valid_token(
    state: &AppState,
    token: &str,
) -> Result<PasswordResetToken, Response> {
    let record = match state.users.find_password_reset_token(token).await {
        Ok(Some(record)) => record,
        Ok(None) => return Err(JsonResponse::not_found("Invalid token").into_response()),
        Err(e) => {
            tracing::error!("DB error loading reset token: {:?}", e);
            return Err(JsonResponse::server_error("Internal server error").into_response());
        }
    };

    match record.state(OffsetDateTime::now_utc()) {
        TokenState::AlreadyUsed => {
            Err(JsonResponse::bad_request("Token has already been used").into_response())
        }
        TokenState::Expired => Err(JsonResponse::bad_request("Token has expired").into_response()),
        TokenState::Valid => Ok(record),
    }
}

/// Called when the reset form loads, to tell the user up front whether the
/// link is still good.
pub async fn handle_validate_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response {
    match load_valid_token(&state, token.trim()).await {
        Ok(record) => Json(json!({ "message": "Token is valid", "email": record.email }))
            .into_response(),
        Err(response) => response,
    }
}

/// Called on form submission. Repeats the validation checks, then the
/// password update and the token consumption happen in one transaction.
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Response {
    let token = payload.token.trim();
    let new_password = payload.new_password.trim();

    if new_password.len() < MIN_PASSWORD_LENGTH {
        return JsonResponse::bad_request("Please enter a password with 6 or more characters")
            .into_response();
    }

    let record = match load_valid_token(&state, token).await {
        Ok(record) => record,
        Err(response) => return response,
    };

    let password_hash = match hash_password(new_password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {:?}", e);
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    if let Err(e) = state
        .users
        .consume_password_reset_token(&record.token, &password_hash)
        .await
    {
        tracing::error!("Failed to consume reset token: {:?}", e);
        return JsonResponse::server_error("Internal server error").into_response();
    }

    JsonResponse::success("Password successfully reset").into_response()
}
