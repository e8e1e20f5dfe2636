use crate::error::ApiError;
use crate::middleware::ProxyKey;
use crate::models::ResultEnvelope;
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::StatusCode};

/// GET handler - fetch the value for the derived key.
///
/// A value in the store comes back as `200 {"result": <value>}`; an absent
/// key is `404` with an empty body. Store faults propagate as a generic
/// server error.
pub async fn get_handler(
    State(state): State<AppState>,
    Extension(key): Extension<ProxyKey>,
) -> Result<(StatusCode, Json<ResultEnvelope>), ApiError> {
    match state.store.get(key.as_str()).await? {
        Some(value) => {
            tracing::info!("Fetched value for key: {}", key.as_str());
            Ok((StatusCode::OK, Json(ResultEnvelope::value(value))))
        }
        None => Err(ApiError::KeyNotFound(key.into_inner())),
    }
}
