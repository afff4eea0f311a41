//! Per-request authentication gate.
//!
//! Resolves a bearer token into an [`AuthContext`] request extension and
//! nothing more: a missing, malformed, expired, or revoked token all leave
//! the request unauthenticated and let it continue, indistinguishable from
//! one another. Rejecting requests that required authentication is the
//! downstream handlers' job.

use crate::auth::{revocation::RevocationRegistry, token, token::TokenEngine};
use axum::{
    extract::{Extension, Request},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Verified identity established for the remainder of request processing.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub subject: String,
    pub roles: Vec<String>,
}

/// Router-wide middleware establishing the caller's identity.
pub async fn authenticate(
    Extension(tokens): Extension<Arc<TokenEngine>>,
    Extension(revocations): Extension<RevocationRegistry>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(context) = resolve(&tokens, &revocations, request.headers()).await {
        request.extensions_mut().insert(context);
    }

    next.run(request).await
}

/// Every failure path falls through to `None`: the request proceeds
/// unauthenticated instead of aborting.
async fn resolve(
    tokens: &TokenEngine,
    revocations: &RevocationRegistry,
    headers: &HeaderMap,
) -> Option<AuthContext> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = token::extract_bearer(header)?;

    let claims = tokens.verify(token).ok()?;

    match revocations.is_revoked(token).await {
        Ok(false) => Some(AuthContext {
            subject: claims.sub,
            roles: claims.roles,
        }),
        Ok(true) => {
            debug!("revoked token presented");
            None
        }
        Err(err) => {
            warn!("revocation lookup failed, treating request as unauthenticated: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use chrono::Duration;
    use secrecy::SecretString;
    use tower::ServiceExt;

    async fn probe(context: Option<Extension<AuthContext>>) -> (StatusCode, String) {
        match context {
            Some(Extension(context)) => (StatusCode::OK, context.subject),
            None => (StatusCode::NO_CONTENT, String::new()),
        }
    }

    fn app() -> (Router, Arc<TokenEngine>, RevocationRegistry) {
        let tokens = Arc::new(TokenEngine::new(
            &SecretString::from("test-secret-key-for-testing-only".to_string()),
            Duration::minutes(30),
        ));
        let revocations = RevocationRegistry::new(Arc::new(InMemoryStore::new()));

        let router = Router::new()
            .route("/probe", get(probe))
            .layer(middleware::from_fn(authenticate))
            .layer(Extension(tokens.clone()))
            .layer(Extension(revocations.clone()));

        (router, tokens, revocations)
    }

    async fn probe_with(router: Router, authorization: Option<String>) -> StatusCode {
        let mut request = axum::http::Request::builder().uri("/probe");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = router
            .oneshot(request.body(Body::empty()).expect("request should build"))
            .await
            .expect("request should succeed");

        response.status()
    }

    #[tokio::test]
    async fn missing_header_proceeds_unauthenticated() {
        let (router, _, _) = app();

        assert_eq!(probe_with(router, None).await, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn valid_token_establishes_identity() {
        let (router, tokens, _) = app();

        let token = tokens
            .issue("alice@example.com", vec!["ROLE_USER".to_string()])
            .expect("should issue token");

        assert_eq!(
            probe_with(router, Some(format!("Bearer {token}"))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn garbage_token_is_treated_like_no_token() {
        let (router, _, _) = app();

        assert_eq!(
            probe_with(router, Some("Bearer not-a-token".to_string())).await,
            StatusCode::NO_CONTENT
        );
    }

    #[tokio::test]
    async fn wrong_scheme_is_treated_like_no_token() {
        let (router, tokens, _) = app();

        let token = tokens
            .issue("alice@example.com", vec!["ROLE_USER".to_string()])
            .expect("should issue token");

        assert_eq!(
            probe_with(router, Some(format!("Basic {token}"))).await,
            StatusCode::NO_CONTENT
        );
    }

    #[tokio::test]
    async fn revoked_token_is_treated_like_no_token() {
        let (router, tokens, revocations) = app();

        let token = tokens
            .issue("alice@example.com", vec!["ROLE_USER".to_string()])
            .expect("should issue token");
        revocations
            .revoke(&token, std::time::Duration::from_secs(60))
            .await
            .expect("should revoke token");

        assert_eq!(
            probe_with(router, Some(format!("Bearer {token}"))).await,
            StatusCode::NO_CONTENT
        );
    }

    #[tokio::test]
    async fn expired_token_is_treated_like_no_token() {
        let (router, tokens, _) = app();

        let issued_at = chrono::Utc::now() - Duration::hours(2);
        let token = tokens
            .issue_at("alice@example.com", vec!["ROLE_USER".to_string()], issued_at)
            .expect("should issue token");

        assert_eq!(
            probe_with(router, Some(format!("Bearer {token}"))).await,
            StatusCode::NO_CONTENT
        );
    }
}
