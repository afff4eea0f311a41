//! Session token issuance and verification.
//!
//! Tokens are self-contained HS256 `JWTs`: `{sub, roles, iat, exp}`. The
//! signing key is derived once from the configured secret and reused for
//! the process lifetime. Verification deliberately collapses every failure
//! (bad signature, malformed structure, unsupported algorithm, missing or
//! ill-shaped claims, expiry) into a single [`TokenError::Invalid`] so the
//! boundary never leaks whether a signature or an expiry check failed.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Claims carried by a session token.
///
/// `roles` is a required claim: a token that lost it fails deserialization
/// and is invalid, rather than defaulting to an empty role set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
}

/// Strip the case-sensitive `"Bearer "` prefix from an Authorization
/// header value.
#[must_use]
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?;

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenEngine {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl TokenEngine {
    /// Build the engine from the configured secret and token validity.
    ///
    /// Key material is derived here, once; the secret is not re-read
    /// afterwards.
    #[must_use]
    pub fn new(secret: &SecretString, validity: Duration) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller-supplied clock in verify_at
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            validity,
        }
    }

    #[must_use]
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign a token for `subject` carrying `roles`.
    ///
    /// # Errors
    /// Returns an error if claim serialization or signing fails.
    pub fn issue(
        &self,
        subject: &str,
        roles: Vec<String>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(subject, roles, Utc::now())
    }

    /// Sign a token issued at an explicit instant.
    ///
    /// # Errors
    /// Returns an error if claim serialization or signing fails.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: Vec<String>,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expires_at = issued_at + self.validity;

        let claims = Claims {
            sub: subject.to_string(),
            roles,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify signature and expiry against the current clock.
    ///
    /// # Errors
    /// Returns [`TokenError::Invalid`] for any failure.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature first, then check `now < exp`.
    ///
    /// # Errors
    /// Returns [`TokenError::Invalid`] for any failure; the cause is logged
    /// at debug level and never surfaced.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
                debug!("token rejected: {err}");
                TokenError::Invalid
            })?;

        if now.timestamp() >= data.claims.exp {
            debug!("token rejected: expired");
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }

    /// Time left before `claims` expires, clamped at zero.
    #[must_use]
    pub fn remaining_lifetime(claims: &Claims, now: DateTime<Utc>) -> std::time::Duration {
        let remaining = claims.exp - now.timestamp();

        if remaining > 0 {
            std::time::Duration::from_secs(remaining.unsigned_abs())
        } else {
            std::time::Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn engine() -> TokenEngine {
        TokenEngine::new(
            &SecretString::from("test-secret-key-for-testing-only".to_string()),
            Duration::minutes(30),
        )
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn issue_and_verify_round_trip() -> Result<(), TokenError> {
        let engine = engine();
        let token = engine
            .issue_at("alice@example.com", vec!["ROLE_USER".to_string()], t0())
            .expect("should issue token");

        let claims = engine.verify_at(&token, t0() + Duration::seconds(1))?;
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.roles, vec!["ROLE_USER".to_string()]);
        assert_eq!(claims.exp - claims.iat, 30 * 60);

        Ok(())
    }

    #[test]
    fn token_is_valid_until_just_before_expiry() {
        let engine = engine();
        let token = engine
            .issue_at("alice@example.com", vec!["ROLE_USER".to_string()], t0())
            .expect("should issue token");

        let almost_expired = t0() + Duration::minutes(30) - Duration::seconds(1);
        assert!(engine.verify_at(&token, almost_expired).is_ok());
    }

    #[test]
    fn expired_token_is_invalid() {
        let engine = engine();
        let token = engine
            .issue_at("alice@example.com", vec!["ROLE_USER".to_string()], t0())
            .expect("should issue token");

        let expired = t0() + Duration::minutes(30) + Duration::seconds(1);
        assert_eq!(
            engine.verify_at(&token, expired),
            Err(TokenError::Invalid)
        );
        // exactly at expiry counts as expired: validity holds for now < exp
        assert_eq!(
            engine.verify_at(&token, t0() + Duration::minutes(30)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn tampered_token_is_invalid() {
        let engine = engine();
        let token = engine
            .issue_at("alice@example.com", vec!["ROLE_USER".to_string()], t0())
            .expect("should issue token");

        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).expect("still utf-8");

        assert_eq!(
            engine.verify_at(&tampered, t0() + Duration::seconds(1)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let engine = engine();
        let other = TokenEngine::new(
            &SecretString::from("a-completely-different-secret".to_string()),
            Duration::minutes(30),
        );

        let token = engine
            .issue_at("alice@example.com", vec!["ROLE_USER".to_string()], t0())
            .expect("should issue token");

        assert_eq!(
            other.verify_at(&token, t0() + Duration::seconds(1)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn garbage_token_is_invalid() {
        let engine = engine();

        assert_eq!(
            engine.verify_at("not-a-token", t0()),
            Err(TokenError::Invalid)
        );
        assert_eq!(engine.verify_at("", t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn missing_roles_claim_fails_closed() {
        #[derive(Serialize)]
        struct BareClaims {
            sub: String,
            iat: i64,
            exp: i64,
        }

        let engine = engine();
        let bare = BareClaims {
            sub: "alice@example.com".to_string(),
            iat: t0().timestamp(),
            exp: (t0() + Duration::minutes(30)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &bare,
            &EncodingKey::from_secret(b"test-secret-key-for-testing-only"),
        )
        .expect("should encode claims");

        assert_eq!(
            engine.verify_at(&token, t0() + Duration::seconds(1)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn extract_bearer_strips_prefix() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn extract_bearer_rejects_malformed_headers() {
        // prefix is case-sensitive
        assert_eq!(extract_bearer("bearer abc.def.ghi"), None);
        assert_eq!(extract_bearer("Token abc.def.ghi"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer(""), None);
    }

    #[test]
    fn remaining_lifetime_clamps_at_zero() {
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            roles: vec!["ROLE_USER".to_string()],
            iat: t0().timestamp(),
            exp: (t0() + Duration::minutes(30)).timestamp(),
        };

        assert_eq!(
            TokenEngine::remaining_lifetime(&claims, t0() + Duration::minutes(10)),
            std::time::Duration::from_secs(20 * 60)
        );
        assert_eq!(
            TokenEngine::remaining_lifetime(&claims, t0() + Duration::minutes(31)),
            std::time::Duration::ZERO
        );
    }
}
