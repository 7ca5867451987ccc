//! Error types.
//!
//! `StoreError` describes the defined outcomes of store operations. `ApiError` is what the
//! HTTP layer turns into a status code and a `{"error": ...}` body; every request error is
//! converted at the boundary and never leaks past the request that produced it.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::store::protocol::ErrorResponse;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Empty key or value passed to the store.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The key has never been set, or was deleted since its last set.
    #[error("key not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// A required query parameter is missing or empty. The message is sent to the client.
    #[error("{0}")]
    InvalidArgument(&'static str),
    #[error("key not found")]
    NotFound,
    #[error("too many requests")]
    RateLimited,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            StoreError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
