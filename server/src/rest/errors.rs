//! HTTP error responses.
//!
//! Each [`ApiError`] variant maps to one status code and produces a JSON
//! body `{"error": "message"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type that implements `IntoResponse`.
///
/// - `BadRequest` → 400: malformed bodies, missing addresses, and store
///   failures on create/update/delete
/// - `Internal` → 500: store failures on reads, and bad pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) | Self::Internal(message) => message,
        };
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
