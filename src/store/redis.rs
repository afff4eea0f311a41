//! Redis-backed store implementation.

use crate::store::{KvStore, StoreError, User, UserStore};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;

/// Hash holding JSON-serialized user records, keyed by login identifier.
const USERS_KEY: &str = "users";

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Store handle over a multiplexed Redis connection.
///
/// The connection manager reconnects on its own and is cheap to clone; one
/// instance is shared by every request task.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect and return a store handle.
    ///
    /// # Errors
    /// Returns an error if the URL is rejected or the initial connection
    /// cannot be established.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        // SET EX requires a positive expiry; a zero TTL would mean "keep forever"
        let seconds = ttl.as_secs().max(1);
        let () = conn.set_ex(key, value, seconds).await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;

        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let () = conn.del(key).await?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(key).await?;

        Ok(exists)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for RedisStore {
    async fn get(&self, ident: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(USERS_KEY, ident).await?;

        value
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|err| StoreError::Backend(format!("malformed user record: {err}")))
    }

    async fn put(&self, user: &User) -> Result<(), StoreError> {
        let json = serde_json::to_string(user)
            .map_err(|err| StoreError::Backend(format!("failed to serialize user: {err}")))?;

        let mut conn = self.conn.clone();
        let () = conn.hset(USERS_KEY, &user.ident, json).await?;

        Ok(())
    }

    async fn exists(&self, ident: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.hexists(USERS_KEY, ident).await?;

        Ok(exists)
    }
}
