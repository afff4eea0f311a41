use crate::api::handlers::auth_error_response;
use crate::auth::{token, AuthService};
use axum::{
    extract::Extension,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    post,
    path= "/auth/logout",
    responses (
        (status = 204, description = "Session revoked, or the token was already unusable"),
    ),
    tag= "auth"
)]
// axum handler for logout
#[instrument(skip(headers, auth))]
pub async fn logout(headers: HeaderMap, auth: Extension<Arc<AuthService>>) -> impl IntoResponse {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(token::extract_bearer);

    if let Some(token) = token {
        // a failed blacklist write must surface: the token would stay live
        if let Err(err) = auth.logout(token).await {
            return auth_error_response(&err).into_response();
        }
    }

    StatusCode::NO_CONTENT.into_response()
}
