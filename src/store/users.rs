//! User records and the store that owns them.

use crate::store::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Role granted to every account at creation.
pub const DEFAULT_ROLE: &str = "ROLE_USER";

/// Identity record, keyed by the login identifier.
///
/// Holds the password hash, never the plaintext. API responses are built
/// from individual fields; the record itself is only serialized toward the
/// store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub ident: String,
    pub password_hash: String,
    pub name: String,
    pub roles: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a record with the default role set and fresh timestamps.
    #[must_use]
    pub fn new(ident: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            ident,
            password_hash,
            name,
            roles: BTreeSet::from([DEFAULT_ROLE.to_string()]),
            created_at: now,
            updated_at: now,
        }
    }
}

/// External user store, keyed by the login identifier.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, ident: &str) -> Result<Option<User>, StoreError>;

    async fn put(&self, user: &User) -> Result<(), StoreError>;

    async fn exists(&self, ident: &str) -> Result<bool, StoreError>;
}
