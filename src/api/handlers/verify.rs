use crate::api::handlers::auth_error_response;
use crate::auth::AuthService;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[utoipa::path(
    post,
    path= "/auth/verify",
    request_body = VerifyCodeRequest,
    responses (
        (status = 200, description = "Check performed; body reports match, mismatch, or no outstanding code"),
    ),
    tag= "auth"
)]
// axum handler for checking a verification code
#[instrument(skip(auth, payload))]
pub async fn verify_code(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<VerifyCodeRequest>>,
) -> impl IntoResponse {
    let request: VerifyCodeRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    match auth.verify_email_code(&request.email, &request.code).await {
        Ok(status) => (StatusCode::OK, status),
        Err(err) => auth_error_response(&err),
    }
}
