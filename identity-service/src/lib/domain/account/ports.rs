use async_trait::async_trait;

use crate::account::errors::HashingError;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;

/// Keyed store holding the accounts of a single kind.
///
/// Implementations enforce username and email uniqueness themselves; a violated
/// constraint is reported as `StoreError::UniqueViolation`.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Find an account by ID.
    ///
    /// # Returns
    /// Some(Account) if found, None otherwise
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    /// * `CorruptRecord` - Stored row could not be read back into an account
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Find an account by exact, case-sensitive username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Find an account by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Insert or replace an account, keyed by its ID.
    ///
    /// # Errors
    /// * `UniqueViolation` - Username or email is held by another account
    /// * `Unavailable` - Storage operation failed
    async fn put(&self, account: Account) -> Result<Account, StoreError>;
}

/// Salted one-way hashing of account secrets.
pub trait SecretHasher: Send + Sync + 'static {
    /// Hash a raw secret into an opaque, self-describing string.
    fn hash(&self, raw: &str) -> Result<String, HashingError>;

    /// Whether `raw` matches a hash previously produced by [`SecretHasher::hash`].
    ///
    /// A mismatch is `Ok(false)`; `Err` is reserved for unreadable hashes.
    fn matches(&self, raw: &str, hash: &str) -> Result<bool, HashingError>;
}
