use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::bucket::TokenBucket;
use crate::error::ApiError;

/// Admission layer run in front of every route.
///
/// Installed with `axum::middleware::from_fn_with_state`. A rejected request gets 429 and
/// never reaches its handler, so the store is left untouched.
pub async fn admit(
    State(bucket): State<Arc<TokenBucket>>,
    req: Request,
    next: Next,
) -> Response {
    if !bucket.try_admit() {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            "rate limit exceeded"
        );
        return ApiError::RateLimited.into_response();
    }

    next.run(req).await
}
