//! Route handlers for the authentication endpoints.

pub mod email;
pub mod health;
pub mod login;
pub mod logout;
pub mod session;
pub mod signup;
pub mod verify;

use crate::auth::AuthError;
use axum::http::StatusCode;
use tracing::error;

/// Map workflow failures to responses.
///
/// Infrastructure failures are logged in full and surfaced as a generic
/// message: they must stay distinguishable from credential and validation
/// errors by status, never by detail.
pub(crate) fn auth_error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::AlreadyRegistered => (StatusCode::CONFLICT, err.to_string()),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
        AuthError::Store(inner) => {
            error!("store failure: {inner}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        }
        AuthError::Internal(inner) => {
            error!("internal failure: {inner}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        }
    }
}
