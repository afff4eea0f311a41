//! TTL-aware in-memory store for tests and local development.

use crate::store::{KvStore, StoreError, User, UserStore};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

struct ExpiringValue {
    value: String,
    expires_at: Instant,
}

/// In-process stand-in for the external key-value store.
///
/// Expiry is checked lazily on read, and stale entries are pruned on write,
/// so behavior matches a TTL-evicting store without a sweep task.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    kv: RwLock<HashMap<String, ExpiringValue>>,
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for InMemoryStore {
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut kv = self.inner.kv.write().await;
        kv.retain(|_, entry| now < entry.expires_at);
        kv.insert(
            key.to_string(),
            ExpiringValue {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let kv = self.inner.kv.read().await;

        Ok(kv
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.kv.write().await.remove(key);

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(KvStore::get(self, key).await?.is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get(&self, ident: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.users.read().await.get(ident).cloned())
    }

    async fn put(&self, user: &User) -> Result<(), StoreError> {
        self.inner
            .users
            .write()
            .await
            .insert(user.ident.clone(), user.clone());

        Ok(())
    }

    async fn exists(&self, ident: &str) -> Result<bool, StoreError> {
        Ok(self.inner.users.read().await.contains_key(ident))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_round_trip() -> Result<(), StoreError> {
        let store = InMemoryStore::new();

        KvStore::set_with_ttl(&store, "key", "value", Duration::from_secs(60)).await?;
        assert_eq!(KvStore::get(&store, "key").await?, Some("value".to_string()));
        assert!(KvStore::exists(&store, "key").await?);

        KvStore::delete(&store, "key").await?;
        assert_eq!(KvStore::get(&store, "key").await?, None);
        assert!(!KvStore::exists(&store, "key").await?);

        Ok(())
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() -> Result<(), StoreError> {
        let store = InMemoryStore::new();

        KvStore::set_with_ttl(&store, "short", "lived", Duration::from_millis(40)).await?;
        assert!(KvStore::exists(&store, "short").await?);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!KvStore::exists(&store, "short").await?);
        assert_eq!(KvStore::get(&store, "short").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn overwrite_replaces_value_and_ttl() -> Result<(), StoreError> {
        let store = InMemoryStore::new();

        KvStore::set_with_ttl(&store, "key", "first", Duration::from_millis(40)).await?;
        KvStore::set_with_ttl(&store, "key", "second", Duration::from_secs(60)).await?;

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(
            KvStore::get(&store, "key").await?,
            Some("second".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn user_store_round_trip() -> Result<(), StoreError> {
        let store = InMemoryStore::new();
        let user = User::new(
            "alice@example.com".to_string(),
            "$argon2id$stub".to_string(),
            "Alice".to_string(),
        );

        assert!(!UserStore::exists(&store, "alice@example.com").await?);
        UserStore::put(&store, &user).await?;
        assert!(UserStore::exists(&store, "alice@example.com").await?);

        let fetched = UserStore::get(&store, "alice@example.com")
            .await?
            .expect("user should be stored");
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.name, "Alice");

        Ok(())
    }
}
