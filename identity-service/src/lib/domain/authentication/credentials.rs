use std::sync::Arc;
use std::sync::OnceLock;

use crate::account::models::Account;
use crate::account::ports::SecretHasher;
use crate::authentication::errors::AuthError;

const DECOY_SECRET: &str = "decoy-secret-never-assigned";

/// Verifies secrets and evaluates the active-status policy.
#[derive(Clone)]
pub struct CredentialChecker {
    hasher: Arc<dyn SecretHasher>,
    decoy_hash: Arc<OnceLock<Option<String>>>,
}

impl CredentialChecker {
    pub fn new(hasher: Arc<dyn SecretHasher>) -> Self {
        Self {
            hasher,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Whether `raw` matches the stored hash.
    ///
    /// An unreadable hash counts as a mismatch.
    pub fn verify_secret(&self, raw: &str, hash: &str) -> bool {
        match self.hasher.matches(raw, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!("Stored secret hash could not be checked: {}", e);
                false
            }
        }
    }

    /// Spend one verification on a hash no account owns.
    ///
    /// Used when no account matched, so an unknown username costs as much as a
    /// wrong secret.
    pub fn verify_decoy(&self, raw: &str) {
        let decoy = self.decoy_hash.get_or_init(|| match self.hasher.hash(DECOY_SECRET) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::error!("Decoy secret could not be hashed: {}", e);
                None
            }
        });

        if let Some(hash) = decoy {
            let _ = self.hasher.matches(raw, hash);
        }
    }

    pub fn is_active(&self, account: &Account) -> bool {
        account.status.is_active()
    }

    /// Fail with the specific reason if the account is not active.
    ///
    /// # Errors
    /// * `AccountDisabled`, `AccountLocked`, `AccountExpired` or `CredentialsExpired`
    pub fn ensure_active(&self, account: &Account) -> Result<(), AuthError> {
        match account.status.first_failure() {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }
}
