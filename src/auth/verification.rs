//! One-time email verification codes.

use crate::store::{KvStore, StoreError};
use rand::Rng;
use std::{sync::Arc, time::Duration};

/// Codes expire five minutes after issuance.
pub const CODE_TTL: Duration = Duration::from_secs(5 * 60);

const CODE_PREFIX: &str = "verify:";

/// Outcome of checking a supplied code against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// No code outstanding for this email (expired, consumed, or never sent).
    NoCodeFound,
    /// A code is outstanding but the supplied one does not match; the entry
    /// is kept so the user can retry within the TTL window.
    Mismatch,
    /// Codes matched; the entry has been consumed.
    Success,
}

/// Records the outstanding verification code per email address.
///
/// At most one code is outstanding per email: issuing a new one overwrites
/// the previous entry and its TTL, which is intentional single-active-code
/// semantics.
#[derive(Clone)]
pub struct VerificationCodeRegistry {
    store: Arc<dyn KvStore>,
}

impl VerificationCodeRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Generate, store, and return a fresh 6-digit code for `email`.
    ///
    /// # Errors
    /// Returns a store error if the entry cannot be written.
    pub async fn issue_code(&self, email: &str) -> Result<String, StoreError> {
        let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();

        self.store
            .set_with_ttl(&format!("{CODE_PREFIX}{email}"), &code, CODE_TTL)
            .await?;

        Ok(code)
    }

    /// Compare `supplied` against the stored code, consuming it on match.
    ///
    /// # Errors
    /// Returns a store error if the lookup or deletion fails.
    pub async fn check_and_consume(
        &self,
        email: &str,
        supplied: &str,
    ) -> Result<CodeCheck, StoreError> {
        let key = format!("{CODE_PREFIX}{email}");

        let Some(stored) = self.store.get(&key).await? else {
            return Ok(CodeCheck::NoCodeFound);
        };

        if stored == supplied {
            self.store.delete(&key).await?;
            Ok(CodeCheck::Success)
        } else {
            Ok(CodeCheck::Mismatch)
        }
    }
}
