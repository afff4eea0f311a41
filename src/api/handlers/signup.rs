use crate::api::handlers::auth_error_response;
use crate::auth::AuthService;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub ident: String,
    pub password: String,
    pub name: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub ident: String,
    pub name: String,
}

#[utoipa::path(
    post,
    path= "/auth/signup",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "Registration successful", body = [SignupResponse], content_type = "application/json"),
        (status = 400, description = "Malformed identifier or password failing the strength policy"),
        (status = 409, description = "User with the specified identifier already exists"),
    ),
    tag= "auth"
)]
// axum handler for signup
#[instrument(skip(auth, payload))]
pub async fn signup(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match auth
        .signup(&request.ident, &request.password, &request.name)
        .await
    {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                ident: outcome.ident,
                name: outcome.name,
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&err).into_response(),
    }
}
