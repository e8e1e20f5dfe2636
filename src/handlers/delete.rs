use crate::error::ApiError;
use crate::middleware::ProxyKey;
use crate::models::ResultEnvelope;
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::StatusCode};

/// DELETE handler - remove the derived key from the store.
///
/// Idempotent: deleting a key that was never written is still a `200`.
pub async fn delete_handler(
    State(state): State<AppState>,
    Extension(key): Extension<ProxyKey>,
) -> Result<(StatusCode, Json<ResultEnvelope>), ApiError> {
    state.store.delete(key.as_str()).await?;

    tracing::info!("Deleted key: {}", key.as_str());
    Ok((StatusCode::OK, Json(ResultEnvelope::null())))
}
