//! # Chiave (Credential Authentication & Session Tokens)
//!
//! `chiave` registers users, authenticates them against stored password
//! hashes, and issues signed session tokens. Possession of a structurally
//! valid, unexpired, unrevoked token *is* the session; there is no
//! server-side session table.
//!
//! ## Tokens & Revocation
//!
//! Session tokens are HS256 `JWTs` carrying `sub`, `roles`, `iat` and `exp`.
//! Logout enters the token into a blacklist whose entries live exactly as
//! long as the token itself would have, so the blacklist self-cleans and
//! never grows unbounded.
//!
//! ## Storage Model
//!
//! All durable mutable state (user records, revocation entries, pending
//! verification codes) lives in an external key-value store with TTL
//! eviction. The store is the single serialization point for concurrent
//! writers; the service keeps no cross-request mutable state in process.
//!
//! ## Email Verification
//!
//! Ownership of an email address is proven with a 6-digit one-time code,
//! valid for five minutes. Requesting a new code replaces the outstanding
//! one; a failed attempt leaves it intact until it expires or is consumed.

pub mod api;
pub mod auth;
pub mod cli;
pub mod email;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
