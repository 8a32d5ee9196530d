use async_trait::async_trait;

use crate::account::models::AccountDetails;
use crate::account::models::AccountId;
use crate::account::models::AccountProfile;
use crate::account::models::RegisterAccountCommand;
use crate::account::models::StatusUpdate;
use crate::authentication::errors::AuthError;
use crate::authentication::errors::EventPublisherError;
use crate::authentication::errors::RevocationError;
use crate::authentication::events::AuthEvent;
use crate::authentication::models::AuthenticatedSession;
use crate::authentication::models::ChangePasswordCommand;
use crate::authentication::models::TokenValidation;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Authenticate with username and password and open a session.
    ///
    /// # Arguments
    /// * `username` - Exact, case-sensitive username
    /// * `password` - Raw secret
    ///
    /// # Returns
    /// Fresh access and refresh tokens with the account profile
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user, wrong secret or inactive account; the precise
    ///   kind is only logged
    /// * `Directory` - Storage operation failed
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AuthError>;

    /// Register a new account. No token is issued.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username or email is taken by an account of any kind
    /// * `Directory` - Storage operation failed
    async fn register(&self, command: RegisterAccountCommand) -> Result<AccountProfile, AuthError>;

    /// Validate an access token against live account state.
    ///
    /// # Returns
    /// `Valid` with the identity, or `Invalid` with the specific reason
    ///
    /// # Errors
    /// Only system failures; an invalid token is `Ok(TokenValidation::Invalid(..))`
    async fn validate_token(&self, token: &str) -> Result<TokenValidation, AuthError>;

    /// Exchange a refresh token for a new token pair.
    ///
    /// The presented refresh token is revoked; presenting it again fails.
    ///
    /// # Errors
    /// * `TokenRevoked` - Token was already used or logged out
    /// * `TokenTypeMismatch` - Token is not a refresh token
    /// * `TokenExpired`, `TokenMalformed`, `TokenSignatureInvalid`, `TokenUnsupported` -
    ///   Token failed to parse
    /// * `UserNotFound`, `AccountDisabled`, `AccountLocked`, `AccountExpired`,
    ///   `CredentialsExpired` - Account no longer usable
    /// * `TokenInvalid` - Claims do not match the account
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthenticatedSession, AuthError>;

    /// Revoke a token. Idempotent; the token is not inspected.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Change the secret of the account behind an access token.
    ///
    /// Existing tokens stay valid until they expire.
    ///
    /// # Errors
    /// * `WrongCurrentPassword` - Current secret does not match
    /// * Token errors as for [`AuthServicePort::validate_token`]
    async fn change_password(&self, command: ChangePasswordCommand) -> Result<(), AuthError>;

    async fn is_username_available(&self, username: &str) -> Result<bool, AuthError>;

    async fn is_email_available(&self, email: &str) -> Result<bool, AuthError>;

    /// Partially update the four status flags of an account.
    ///
    /// # Errors
    /// * `UserNotFound` - No account with this ID
    async fn update_account_status(
        &self,
        id: &AccountId,
        update: StatusUpdate,
    ) -> Result<AccountProfile, AuthError>;

    /// Replace the kind-specific attributes of an account.
    ///
    /// # Errors
    /// * `UserNotFound` - No account with this ID
    /// * `InvalidRequest` - Details belong to another kind
    async fn update_account_details(
        &self,
        id: &AccountId,
        details: AccountDetails,
    ) -> Result<AccountProfile, AuthError>;
}

/// Port for publishing authentication events.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish a single event.
    ///
    /// # Errors
    /// * `SerializationFailed` - Event could not be serialized
    /// * `PublishFailed` - Broker rejected or could not receive the event
    async fn publish(&self, event: &AuthEvent) -> Result<(), EventPublisherError>;
}

/// Port for the set of revoked token strings.
#[async_trait]
pub trait RevocationRegistry: Send + Sync + 'static {
    /// Add a token to the set.
    ///
    /// # Returns
    /// `true` if this call revoked the token, `false` if it was already revoked
    async fn revoke(&self, token: &str) -> Result<bool, RevocationError>;

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError>;
}
