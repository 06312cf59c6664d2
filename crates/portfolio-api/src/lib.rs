pub mod admin;
pub mod auth;
pub mod contact;
pub mod middleware;
pub mod tags;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portfolio_types::api::ApiEnvelope;

/// Handler failure carrying the user-facing envelope message. Internal
/// causes are logged where they happen, not leaked to the response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiEnvelope::<()>::err(self.message))).into_response()
    }
}
