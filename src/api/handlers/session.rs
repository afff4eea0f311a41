use crate::auth::AuthContext;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub subject: String,
    pub roles: Vec<String>,
}

#[utoipa::path(
    get,
    path= "/auth/session",
    responses (
        (status = 200, description = "Session is active", body = [SessionResponse], content_type = "application/json"),
        (status = 204, description = "No active session"),
    ),
    tag= "auth"
)]
// axum handler for session introspection
#[instrument(skip(context))]
pub async fn session(context: Option<Extension<AuthContext>>) -> impl IntoResponse {
    // Absent context covers missing, invalid, expired, and revoked tokens
    // alike; none of them is distinguished here.
    match context {
        Some(Extension(context)) => (
            StatusCode::OK,
            Json(SessionResponse {
                subject: context.subject,
                roles: context.roles,
            }),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
