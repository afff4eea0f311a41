use crate::store::KvStore;
use crate::GIT_COMMIT_HASH;
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Key-value store is reachable"),
        (status = 503, description = "Key-value store is unreachable"),
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(kv: Extension<Arc<dyn KvStore>>) -> impl IntoResponse {
    let store_ok = match kv.ping().await {
        Ok(()) => true,
        Err(err) => {
            error!("Failed to ping key-value store: {err}");
            false
        }
    };

    let body = Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build": GIT_COMMIT_HASH,
        "store": if store_ok { "ok" } else { "error" },
    }));

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )
    .parse()
    {
        headers.insert("X-App", value);
    }

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, headers, body)
}
