use axum::{
    Json, Router,
    extract::{Extension, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use std::sync::Arc;
use std::time::Instant;

use crate::limiter::bucket::TokenBucket;
use crate::limiter::middleware::admit;
use crate::store::handlers::{handle_delete, handle_get, handle_keys, handle_set};
use crate::store::memory::KvStore;
use crate::store::protocol::{
    ENDPOINT_DELETE, ENDPOINT_GET, ENDPOINT_HEALTH, ENDPOINT_KEYS, ENDPOINT_SET, MSG_HEALTH_OK,
    MessageResponse,
};

/// Builds the route table.
///
/// With a `limiter`, every route sits behind the admission layer. The access log wraps
/// everything so that rejected requests are logged as well.
pub fn build_router(store: Arc<KvStore>, limiter: Option<Arc<TokenBucket>>) -> Router {
    let mut app = Router::new()
        .route(ENDPOINT_SET, get(handle_set))
        .route(ENDPOINT_GET, get(handle_get))
        .route(ENDPOINT_DELETE, get(handle_delete))
        .route(ENDPOINT_KEYS, get(handle_keys))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(store));

    if let Some(bucket) = limiter {
        app = app.layer(middleware::from_fn_with_state(bucket, admit));
    }

    app.layer(middleware::from_fn(log_request))
}

pub async fn handle_health() -> Json<MessageResponse> {
    Json(MessageResponse::new(MSG_HEALTH_OK))
}

/// One access-log line per request.
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_us = started.elapsed().as_micros() as u64,
        "request"
    );
    response
}
