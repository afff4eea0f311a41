use crate::api::handlers::auth_error_response;
use crate::auth::AuthService;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub ident: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub ident: String,
    pub roles: Vec<String>,
}

#[utoipa::path(
    post,
    path= "/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = [LoginResponse], content_type = "application/json"),
        (status = 401, description = "Unknown identifier or wrong password, indistinguishably"),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip(auth, payload))]
pub async fn login(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match auth.login(&request.ident, &request.password).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(LoginResponse {
                token: outcome.token,
                ident: outcome.ident,
                roles: outcome.roles,
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}
