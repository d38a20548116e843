use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde_json::json;
use time::Duration;

pub async fn handle_logout() -> Response {
    // Expire the session cookie immediately.
    let cookie = Cookie::build(("auth_token", ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(0))
        .build();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie.to_string()).expect("static cookie is valid"),
    );

    (
        StatusCode::OK,
        headers,
        Json(json!({ "success": true, "message": "Logged out" })),
    )
        .into_response()
}
