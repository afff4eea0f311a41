use crate::api::handlers::{email, health, login, logout, session, signup, verify};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        signup::signup,
        login::login,
        logout::logout,
        email::send_code,
        verify::verify_code,
        session::session,
        health::health,
    ),
    components(schemas(
        signup::SignupRequest,
        signup::SignupResponse,
        login::LoginRequest,
        login::LoginResponse,
        email::SendCodeRequest,
        verify::VerifyCodeRequest,
        session::SessionResponse,
    )),
    tags(
        (name = "auth", description = "Credential authentication and session tokens"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
