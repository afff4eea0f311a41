//! Authentication workflow: signup, login, logout, and email verification.
//!
//! Stateless between calls; all durable state lives in the stores. Each
//! operation performs single round-trips against its collaborators with no
//! internal retries: transient store failures surface as [`AuthError::Store`]
//! rather than being silently retried, while email transport failures are
//! absorbed into a soft status string (delivery is best-effort).

use crate::auth::{
    password,
    revocation::RevocationRegistry,
    token::TokenEngine,
    verification::{CodeCheck, VerificationCodeRegistry},
};
use crate::email::EmailSender;
use crate::store::{StoreError, User, UserStore};
use chrono::Utc;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or policy-violating request; the message lists every
    /// violation.
    #[error("{0}")]
    InvalidInput(String),
    /// The identifier is already registered: a conflict, not a validation
    /// error.
    #[error("User already exists")]
    AlreadyRegistered,
    /// Deliberately identical for "no such user" and "wrong password".
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub ident: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub ident: String,
    pub roles: Vec<String>,
}

/// Normalize an email for lookup/uniqueness checks.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Orchestrates the credential lifecycle over the injected collaborators.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenEngine>,
    revocations: RevocationRegistry,
    codes: VerificationCodeRegistry,
    mailer: Arc<dyn EmailSender>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<TokenEngine>,
        revocations: RevocationRegistry,
        codes: VerificationCodeRegistry,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            users,
            tokens,
            revocations,
            codes,
            mailer,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// `AlreadyRegistered` for a duplicate identifier, `InvalidInput` for a
    /// malformed identifier or a password failing the strength policy
    /// (all violations joined), `Store` when persistence fails.
    pub async fn signup(
        &self,
        ident: &str,
        password_plain: &str,
        name: &str,
    ) -> Result<SignupOutcome, AuthError> {
        let ident = normalize_email(ident);

        if !valid_email(&ident) {
            return Err(AuthError::InvalidInput("Invalid email".to_string()));
        }

        if self.users.exists(&ident).await? {
            return Err(AuthError::AlreadyRegistered);
        }

        let result = password::validate(password_plain);
        if !result.is_valid {
            return Err(AuthError::InvalidInput(result.errors.join("; ")));
        }

        let password_hash = password::hash_password(password_plain)?;
        let user = User::new(ident.clone(), password_hash, name.to_string());
        self.users.put(&user).await?;

        debug!(ident = %user.ident, "user registered");

        Ok(SignupOutcome {
            ident: user.ident,
            name: user.name,
        })
    }

    /// Authenticate and issue a session token.
    ///
    /// # Errors
    /// `InvalidCredentials` when the user is unknown or the password does
    /// not match the stored hash, `Store` when the lookup fails.
    pub async fn login(&self, ident: &str, password_plain: &str) -> Result<LoginOutcome, AuthError> {
        let ident = normalize_email(ident);

        let user = self.users.get(&ident).await?;

        match user {
            Some(user) if password::verify_password(&user.password_hash, password_plain) => {
                let roles: Vec<String> = user.roles.iter().cloned().collect();
                let token = self
                    .tokens
                    .issue(&user.ident, roles.clone())
                    .map_err(|err| anyhow::anyhow!("failed to issue token: {err}"))?;

                Ok(LoginOutcome {
                    token,
                    ident: user.ident,
                    roles,
                })
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Revoke a session token for its remaining lifetime.
    ///
    /// An invalid or already-expired token is a no-op: it is unusable
    /// either way, and the blacklist entry must never outlive the token.
    ///
    /// # Errors
    /// `Store` when the revocation entry cannot be written; absorbing that
    /// would leave a live token the caller believes is dead.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        match self.tokens.verify(token) {
            Ok(claims) => {
                let remaining = TokenEngine::remaining_lifetime(&claims, Utc::now());
                self.revocations.revoke(token, remaining).await?;

                debug!(subject = %claims.sub, "session revoked");

                Ok(())
            }
            Err(_) => Ok(()),
        }
    }

    /// Issue a verification code and dispatch it by email.
    ///
    /// The code is stored before the send; transport failure is reported as
    /// a soft status string and the code stays valid, so the user either
    /// receives the mail or requests a new code.
    ///
    /// # Errors
    /// `InvalidInput` for a malformed address, `Store` when the code cannot
    /// be written.
    pub async fn send_verification_code(&self, email: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        if !valid_email(&email) {
            return Err(AuthError::InvalidInput("Invalid email".to_string()));
        }

        let code = self.codes.issue_code(&email).await?;

        let body = format!("Your verification code is {code}. It expires in 5 minutes.");
        match self.mailer.send(&email, "Your verification code", &body).await {
            Ok(()) => Ok(format!("Verification code sent to {email}")),
            Err(err) => {
                warn!("failed to send verification email: {err}");
                Ok("Failed to send verification email; request a new code if it does not arrive"
                    .to_string())
            }
        }
    }

    /// Check a supplied code and report the outcome as a user-facing string.
    ///
    /// # Errors
    /// `Store` when the lookup or consumption fails.
    pub async fn verify_email_code(&self, email: &str, code: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        let outcome = self.codes.check_and_consume(&email, code).await?;

        Ok(match outcome {
            CodeCheck::Success => "Email verified".to_string(),
            CodeCheck::Mismatch => "Verification code does not match".to_string(),
            CodeCheck::NoCodeFound => {
                "No verification code found; request a new one".to_string()
            }
        })
    }
}
