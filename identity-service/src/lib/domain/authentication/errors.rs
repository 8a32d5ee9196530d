use auth::TokenError;
use auth::TokenType;
use thiserror::Error;

use crate::account::errors::AccountIdError;
use crate::account::errors::DirectoryError;
use crate::account::errors::EmailError;
use crate::account::errors::UsernameError;
use crate::account::models::IdentityField;
use crate::account::models::StatusFailure;

/// Error for event publishing operations
#[derive(Debug, Clone, Error)]
pub enum EventPublisherError {
    #[error("Failed to serialize event: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish event to broker: {0}")]
    PublishFailed(String),

    #[error("Event publishing timeout: {0}")]
    Timeout(String),
}

/// Error for revocation registry operations
#[derive(Debug, Clone, Error)]
pub enum RevocationError {
    #[error("Revocation registry unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for authentication operations.
///
/// Per-request outcomes (bad credentials, invalid tokens, duplicates) and system
/// failures share this type; [`AuthError::is_system`] tells them apart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("{0} already exists")]
    DuplicateIdentity(IdentityField),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Account is locked")]
    AccountLocked,

    #[error("Account has expired")]
    AccountExpired,

    #[error("Credentials have expired")]
    CredentialsExpired,

    #[error("Malformed token: {0}")]
    TokenMalformed(String),

    #[error("Unsupported token: {0}")]
    TokenUnsupported(String),

    #[error("Token signature is invalid")]
    TokenSignatureInvalid,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Expected {expected} token, got {actual} token")]
    TokenTypeMismatch {
        expected: TokenType,
        actual: TokenType,
    },

    #[error("Token does not match the account")]
    TokenInvalid,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Infrastructure errors
    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssue(String),

    #[error("Revocation error: {0}")]
    Revocation(String),
}

impl AuthError {
    /// Whether this is an infrastructure failure rather than a per-request outcome.
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            AuthError::Directory(_)
                | AuthError::Hashing(_)
                | AuthError::TokenIssue(_)
                | AuthError::Revocation(_)
        )
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountDisabled => "ACCOUNT_DISABLED",
            AuthError::AccountLocked => "ACCOUNT_LOCKED",
            AuthError::AccountExpired => "ACCOUNT_EXPIRED",
            AuthError::CredentialsExpired => "CREDENTIALS_EXPIRED",
            AuthError::TokenMalformed(_) => "TOKEN_MALFORMED",
            AuthError::TokenUnsupported(_) => "TOKEN_UNSUPPORTED",
            AuthError::TokenSignatureInvalid => "TOKEN_SIGNATURE_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::TokenRevoked => "TOKEN_REVOKED",
            AuthError::TokenTypeMismatch { .. } => "TOKEN_TYPE_MISMATCH",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::WrongCurrentPassword => "WRONG_CURRENT_PASSWORD",
            AuthError::InvalidRequest(_) => "INVALID_REQUEST",
            AuthError::Directory(_) => "DIRECTORY_ERROR",
            AuthError::Hashing(_) => "HASHING_ERROR",
            AuthError::TokenIssue(_) => "TOKEN_ISSUE_ERROR",
            AuthError::Revocation(_) => "REVOCATION_ERROR",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(reason) => AuthError::TokenMalformed(reason),
            TokenError::Unsupported(reason) => AuthError::TokenUnsupported(reason),
            TokenError::SignatureInvalid => AuthError::TokenSignatureInvalid,
            TokenError::Expired => AuthError::TokenExpired,
            other @ (TokenError::EncodingFailed(_) | TokenError::InvalidLifetimes { .. }) => {
                AuthError::TokenIssue(other.to_string())
            }
        }
    }
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateIdentity(field) => AuthError::DuplicateIdentity(field),
            DirectoryError::NotFound(_) => AuthError::UserNotFound,
            DirectoryError::KindMismatch { .. } => AuthError::InvalidRequest(err.to_string()),
            DirectoryError::Hashing(e) => AuthError::Hashing(e.0),
            DirectoryError::Store(e) => AuthError::Directory(e.to_string()),
        }
    }
}

impl From<StatusFailure> for AuthError {
    fn from(failure: StatusFailure) -> Self {
        match failure {
            StatusFailure::Disabled => AuthError::AccountDisabled,
            StatusFailure::Locked => AuthError::AccountLocked,
            StatusFailure::Expired => AuthError::AccountExpired,
            StatusFailure::CredentialsExpired => AuthError::CredentialsExpired,
        }
    }
}

impl From<RevocationError> for AuthError {
    fn from(err: RevocationError) -> Self {
        AuthError::Revocation(err.to_string())
    }
}

impl From<UsernameError> for AuthError {
    fn from(err: UsernameError) -> Self {
        AuthError::InvalidRequest(format!("Invalid username: {}", err))
    }
}

impl From<EmailError> for AuthError {
    fn from(err: EmailError) -> Self {
        AuthError::InvalidRequest(format!("Invalid email: {}", err))
    }
}

impl From<AccountIdError> for AuthError {
    fn from(err: AccountIdError) -> Self {
        AuthError::InvalidRequest(format!("Invalid account ID: {}", err))
    }
}
