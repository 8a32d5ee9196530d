use thiserror::Error;

use crate::domain::account::models::AccountKind;
use crate::domain::account::models::IdentityField;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username must contain only letters and numbers")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for AccountKind parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown account kind: {0}")]
pub struct AccountKindError(pub String);

/// Failure reported by a secret hashing backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Secret hashing failed: {0}")]
pub struct HashingError(pub String);

/// Error reported by a single kind-specific account store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage uniqueness constraint violated on {0}")]
    UniqueViolation(IdentityField),

    #[error("Stored record is unreadable: {0}")]
    CorruptRecord(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Error for user directory operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("{0} already exists")]
    DuplicateIdentity(IdentityField),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Account {id} is a {actual} account, not {expected}")]
    KindMismatch {
        id: String,
        expected: AccountKind,
        actual: AccountKind,
    },

    #[error(transparent)]
    Hashing(#[from] HashingError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        match err {
            // A storage-level constraint caught a registration race the availability check missed.
            StoreError::UniqueViolation(field) => DirectoryError::DuplicateIdentity(field),
            other => DirectoryError::Store(other),
        }
    }
}
