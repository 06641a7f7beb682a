//! Server error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not Found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<push_relay_core::Error> for ApiError {
    fn from(err: push_relay_core::Error) -> Self {
        use push_relay_core::Error;

        match err {
            Error::Validation(msg) | Error::Parse(msg) => ApiError::BadRequest(msg),
            Error::Duplicate(_) => ApiError::BadRequest(err.to_string()),
            Error::NotFound | Error::Mismatch => ApiError::NotFound,
            Error::Serialization(_) | Error::Internal(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
