//! Token blacklist for pre-expiry revocation.

use crate::store::{KvStore, StoreError};
use std::{sync::Arc, time::Duration};
use tracing::debug;

const BLACKLIST_PREFIX: &str = "blacklist:";
const REVOKED_MARKER: &str = "revoked";

/// Records tokens invalidated before their natural expiry.
///
/// Entries carry the token's own remaining lifetime as TTL, so an entry can
/// never outlive the token it revokes and the registry self-cleans without
/// a sweep pass. This relies on the store's TTL eviction being reliable: an
/// early-evicted entry would let a revoked, not-yet-expired token verify
/// again.
#[derive(Clone)]
pub struct RevocationRegistry {
    store: Arc<dyn KvStore>,
}

impl RevocationRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Blacklist `token` for its remaining lifetime.
    ///
    /// A zero remaining lifetime is a no-op: the token is already unusable.
    ///
    /// # Errors
    /// Returns a store error if the entry cannot be written.
    pub async fn revoke(&self, token: &str, remaining_lifetime: Duration) -> Result<(), StoreError> {
        if remaining_lifetime.is_zero() {
            debug!("skipping revocation of already-expired token");
            return Ok(());
        }

        self.store
            .set_with_ttl(
                &format!("{BLACKLIST_PREFIX}{token}"),
                REVOKED_MARKER,
                remaining_lifetime,
            )
            .await
    }

    /// # Errors
    /// Returns a store error if the lookup fails.
    pub async fn is_revoked(&self, token: &str) -> Result<bool, StoreError> {
        self.store
            .exists(&format!("{BLACKLIST_PREFIX}{token}"))
            .await
    }
}
