use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct JsonResponse {
    pub status: String,
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    fn body(success: bool, msg: &str) -> Json<JsonResponse> {
        Json(JsonResponse {
            status: if success { "success" } else { "error" }.to_string(),
            success,
            message: msg.to_string(),
        })
    }

    pub fn success(msg: &str) -> impl IntoResponse {
        (StatusCode::OK, Self::body(true, msg))
    }

    pub fn bad_request(msg: &str) -> impl IntoResponse {
        (StatusCode::BAD_REQUEST, Self::body(false, msg))
    }

    pub fn not_found(msg: &str) -> impl IntoResponse {
        (StatusCode::NOT_FOUND, Self::body(false, msg))
    }

    pub fn unauthorized(msg: &str) -> impl IntoResponse {
        (StatusCode::UNAUTHORIZED, Self::body(false, msg))
    }

    pub fn forbidden(msg: &str) -> impl IntoResponse {
        (StatusCode::FORBIDDEN, Self::body(false, msg))
    }

    pub fn conflict(msg: &str) -> impl IntoResponse {
        (StatusCode::CONFLICT, Self::body(false, msg))
    }

    pub fn too_many_requests(msg: &str) -> impl IntoResponse {
        (StatusCode::TOO_MANY_REQUESTS, Self::body(false, msg))
    }

    pub fn server_error(msg: &str) -> impl IntoResponse {
        (StatusCode::INTERNAL_SERVER_ERROR, Self::body(false, msg))
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use serde_json::from_slice;

    use super::JsonResponse;

    #[tokio::test]
    async fn success_response_shape() {
        let resp = JsonResponse::success("ok").into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: JsonResponse = from_slice(&body).unwrap();
        assert_eq!(json.status, "success");
        assert!(json.success);
        assert_eq!(json.message, "ok");
    }

    #[tokio::test]
    async fn not_found_response_shape() {
        let resp = JsonResponse::not_found("missing").into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: JsonResponse = from_slice(&body).unwrap();
        assert_eq!(json.status, "error");
        assert!(!json.success);
        assert_eq!(json.message, "missing");
    }
}
