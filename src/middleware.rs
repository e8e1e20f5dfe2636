use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Storage key derived from the request path, inserted into request
/// extensions by [`validate`] once the request has passed auth.
#[derive(Debug, Clone)]
pub struct ProxyKey(String);

impl ProxyKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Derive the storage key from a URL path: trim surrounding whitespace,
/// strip the single leading `/`, trim again. An empty result is invalid.
///
/// The path is used as-is, without percent-decoding; the key is forwarded
/// to the store in the same form it arrived.
pub fn key_from_path(path: &str) -> Option<String> {
    let trimmed = path.trim();
    let key = trimmed.strip_prefix('/').unwrap_or(trimmed).trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Gate every request: exact-equality secret check first, then key
/// validation. Neither failure touches the store.
pub async fn validate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if presented != Some(state.config.proxy_secret.as_str()) {
        tracing::warn!("Rejected request with missing or mismatched secret");
        return Err(ApiError::Unauthorized);
    }

    let key = key_from_path(request.uri().path()).ok_or(ApiError::EmptyKey)?;
    request.extensions_mut().insert(ProxyKey(key));

    Ok(next.run(request).await)
}
