use axum::{
    Json, async_trait,
    extract::{Extension, FromRequestParts, Query},
    http::request::Parts,
};
use std::sync::Arc;

use super::memory::KvStore;
use super::protocol::{
    ERR_KEY_AND_VALUE_REQUIRED, ERR_KEY_REQUIRED, ERR_MALFORMED_QUERY, KeyParams, KeysResponse,
    MSG_DELETE_OK, MSG_SET_OK, MessageResponse, SetParams, ValueResponse,
};
use crate::error::ApiError;

/// The query string as ordered name/value pairs, repeats included.
///
/// A rejected query string is answered through `ApiError`, so clients always get the JSON
/// error body rather than axum's plain-text rejection.
#[derive(Debug, Default)]
pub struct QueryPairs(pub Vec<(String, String)>);

#[async_trait]
impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => Ok(Self(pairs)),
            Err(rejection) => {
                tracing::debug!("rejected query string: {}", rejection);
                Err(ApiError::InvalidArgument(ERR_MALFORMED_QUERY))
            }
        }
    }
}

/// Returns the parameter when it is present and non-empty.
fn required(param: Option<String>) -> Option<String> {
    param.filter(|p| !p.is_empty())
}

pub async fn handle_set(
    Extension(store): Extension<Arc<KvStore>>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<MessageResponse>, ApiError> {
    let params = SetParams::from_pairs(&pairs);
    let (Some(key), Some(value)) = (required(params.key), required(params.value)) else {
        return Err(ApiError::InvalidArgument(ERR_KEY_AND_VALUE_REQUIRED));
    };

    store.set(key, value)?;
    Ok(Json(MessageResponse::new(MSG_SET_OK)))
}

pub async fn handle_get(
    Extension(store): Extension<Arc<KvStore>>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<ValueResponse>, ApiError> {
    let Some(key) = required(KeyParams::from_pairs(&pairs).key) else {
        return Err(ApiError::InvalidArgument(ERR_KEY_REQUIRED));
    };

    let value = store.get(&key)?;
    Ok(Json(ValueResponse { value }))
}

pub async fn handle_delete(
    Extension(store): Extension<Arc<KvStore>>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(key) = required(KeyParams::from_pairs(&pairs).key) else {
        return Err(ApiError::InvalidArgument(ERR_KEY_REQUIRED));
    };

    store.delete(&key)?;
    Ok(Json(MessageResponse::new(MSG_DELETE_OK)))
}

pub async fn handle_keys(Extension(store): Extension<Arc<KvStore>>) -> Json<KeysResponse> {
    Json(KeysResponse { keys: store.keys() })
}
