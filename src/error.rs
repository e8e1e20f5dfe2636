use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Custom error type for the proxy endpoints.
///
/// Every variant maps to a status code with an empty body; the fixed
/// `Content-Type` and `Server` headers are applied to all responses by the
/// router, so errors carry them too.
#[derive(Debug)]
pub enum ApiError {
    /// Secret header missing or mismatched
    Unauthorized,
    /// Request path reduced to an empty key
    EmptyKey,
    /// GET on a key the store does not hold
    KeyNotFound(String),
    /// Verb outside GET/PUT/DELETE
    MethodNotAllowed,
    /// Underlying store operation failed
    Store(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::EmptyKey => StatusCode::BAD_REQUEST,
            ApiError::KeyNotFound(key) => {
                tracing::debug!("Key not found: {key}");
                StatusCode::NOT_FOUND
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(err) => {
                tracing::error!("Store operation failed: {err:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        status.into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Store(err)
    }
}
