use crate::error::ApiError;
use crate::middleware::ProxyKey;
use crate::models::ResultEnvelope;
use crate::state::AppState;
use crate::store::PutOptions;
use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

/// The TTL hint travels in a header named `key` on the wire; `ttl` is
/// accepted as an alias for the companion client, with `key` winning when
/// both are present.
const TTL_HEADERS: [&str; 2] = ["key", "ttl"];

/// TTLs below this are ignored and the value is stored without expiration.
const MIN_EXPIRATION_TTL: u64 = 60;

/// PUT handler - store the request body under the derived key.
///
/// The body is decoded as text lossily, so invalid UTF-8 is stored with
/// replacement characters rather than rejected. A TTL hint that parses and
/// clears the minimum becomes an expiration on the write; anything else
/// (absent, malformed, too small) silently falls back to infinite
/// retention.
pub async fn put_handler(
    State(state): State<AppState>,
    Extension(key): Extension<ProxyKey>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ResultEnvelope>), ApiError> {
    let options = PutOptions {
        expiration_ttl: expiration_ttl(&headers),
    };
    let value = String::from_utf8_lossy(&body).into_owned();

    state.store.put(key.as_str(), value, options).await?;

    tracing::info!(
        "Stored value for key: {} (ttl: {:?})",
        key.as_str(),
        options.expiration_ttl
    );
    Ok((StatusCode::OK, Json(ResultEnvelope::null())))
}

fn expiration_ttl(headers: &HeaderMap) -> Option<u64> {
    let raw = TTL_HEADERS.iter().find_map(|name| headers.get(*name))?;
    let ttl = raw.to_str().ok()?.trim().parse::<u64>().ok()?;
    (ttl >= MIN_EXPIRATION_TTL).then_some(ttl)
}
