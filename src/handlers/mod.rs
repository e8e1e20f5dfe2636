pub mod delete;
pub mod get;
pub mod put;

pub use delete::delete_handler;
pub use get::get_handler;
pub use put::put_handler;

use crate::error::ApiError;

/// Fallback for verbs outside GET/PUT/DELETE on a valid key.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Router-level fallback. Only the bare root path misses the wildcard
/// route, and the gate middleware already rejects it as an empty key, so
/// this never runs in practice; it exists solely so axum would not answer
/// `/` with a bare 404 if the middleware were ever bypassed.
pub async fn empty_key() -> ApiError {
    ApiError::EmptyKey
}
