use crate::auth::{
    authenticate, AuthService, RevocationRegistry, TokenEngine, VerificationCodeRegistry,
};
use crate::cli::globals::GlobalArgs;
use crate::email::{EmailSender, HttpEmailSender, LogEmailSender};
use crate::store::{redis::RedisStore, KvStore, UserStore};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use chrono::Duration;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
// OpenAPI assembly lives in openapi.rs; the UI is mounted on the router.
mod openapi;

pub use openapi::ApiDoc;

/// Shared components wired into the router.
pub struct AppContext {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenEngine>,
    pub revocations: RevocationRegistry,
    pub kv: Arc<dyn KvStore>,
}

/// Build the application router with every layer applied.
///
/// The request authenticator runs innermost so it sees the extensions; it
/// only establishes identity, it never rejects.
#[must_use]
pub fn router(context: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route("/auth/signup", post(handlers::signup::signup))
        .route("/auth/login", post(handlers::login::login))
        .route("/auth/logout", post(handlers::logout::logout))
        .route("/auth/email", post(handlers::email::send_code))
        .route("/auth/verify", post(handlers::verify::verify_code))
        .route("/auth/session", get(handlers::session::session))
        .route("/health", get(handlers::health::health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(context.auth))
                .layer(Extension(context.tokens))
                .layer(Extension(context.revocations))
                .layer(Extension(context.kv))
                .layer(axum::middleware::from_fn(authenticate)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, redis_url: &str, globals: &GlobalArgs) -> Result<()> {
    // Connect to the key-value store
    let store = Arc::new(
        RedisStore::connect(redis_url)
            .await
            .context("Failed to connect to key-value store")?,
    );

    let ttl_seconds = i64::try_from(globals.token_ttl_seconds).unwrap_or(i64::MAX);
    let validity = Duration::try_seconds(ttl_seconds).unwrap_or_else(|| Duration::hours(1));
    let tokens = Arc::new(TokenEngine::new(&globals.jwt_secret, validity));

    let kv: Arc<dyn KvStore> = store.clone();
    let users: Arc<dyn UserStore> = store.clone();
    let revocations = RevocationRegistry::new(kv.clone());
    let codes = VerificationCodeRegistry::new(kv.clone());

    let mailer: Arc<dyn EmailSender> = match &globals.email_endpoint {
        Some(endpoint) => Arc::new(HttpEmailSender::new(
            endpoint.clone(),
            globals.email_from.clone(),
        )),
        None => Arc::new(LogEmailSender),
    };

    let auth = Arc::new(AuthService::new(
        users,
        tokens.clone(),
        revocations.clone(),
        codes,
        mailer,
    ));

    let app = router(AppContext {
        auth,
        tokens,
        revocations,
        kv,
    });

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
