//! Key-value storage seams for revocation entries, verification codes, and
//! user records.
//!
//! All durable mutable state lives behind these traits. The production
//! implementation is Redis ([`redis::RedisStore`]); tests and local runs use
//! the TTL-aware in-memory map ([`memory::InMemoryStore`]). Entry expiry is
//! entirely delegated to the store's TTL eviction; there is no sweep task.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod memory;
pub mod redis;
pub mod users;

pub use users::{User, UserStore, DEFAULT_ROLE};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key-value store error: {0}")]
    Backend(String),
}

/// Generic read/write/expire key-value API.
///
/// Keys are namespaced by the caller (`blacklist:<token>`,
/// `verify:<email>`); the store itself knows nothing about token or code
/// semantics. Writes must be visible to subsequent reads on the same key.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, evicted automatically after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Connectivity probe for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}
