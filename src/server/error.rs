use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::core::errors::Error;

/// An error turned into `{"error": "..."}` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn path_not_found() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Path does not exist")
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::PathNotFound(_) => return Self::path_not_found(),
            Error::NotADirectory(_) => StatusCode::BAD_REQUEST,
            Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Error::Vanished(_) | Error::Io(_) | Error::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
