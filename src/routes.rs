use axum::http::{HeaderValue, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Every non-root path matches this route; the key is whatever follows the
/// leading slash.
pub const KV_ITEM: &str = "/{*key}";

/// Assemble the proxy router: one wildcard route with per-method handlers,
/// gated by the auth/key middleware, with the fixed header set applied to
/// every response regardless of status.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            KV_ITEM,
            get(handlers::get_handler)
                .put(handlers::put_handler)
                .delete(handlers::delete_handler)
                .fallback(handlers::method_not_allowed),
        )
        // Only `/` misses the wildcard; the middleware rejects it as an
        // empty key before this fallback ever runs.
        .fallback(handlers::empty_key)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::validate,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::SERVER,
            HeaderValue::from_static("worker-kv-proxy"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
