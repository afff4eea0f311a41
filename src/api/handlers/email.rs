use crate::api::handlers::auth_error_response;
use crate::auth::AuthService;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SendCodeRequest {
    pub email: String,
}

#[utoipa::path(
    post,
    path= "/auth/email",
    request_body = SendCodeRequest,
    responses (
        (status = 200, description = "Verification code issued; body reports delivery outcome"),
        (status = 400, description = "Malformed email address"),
    ),
    tag= "auth"
)]
// axum handler for sending a verification code
#[instrument(skip(auth, payload))]
pub async fn send_code(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<SendCodeRequest>>,
) -> impl IntoResponse {
    let request: SendCodeRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    match auth.send_verification_code(&request.email).await {
        Ok(status) => (StatusCode::OK, status),
        Err(err) => auth_error_response(&err),
    }
}
