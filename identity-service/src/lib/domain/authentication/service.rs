use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::TokenClaims;
use auth::TokenCodec;
use auth::TokenType;

use crate::account::directory::UserDirectory;
use crate::account::models::Account;
use crate::account::models::AccountDetails;
use crate::account::models::AccountId;
use crate::account::models::AccountProfile;
use crate::account::models::RegisterAccountCommand;
use crate::account::models::StatusUpdate;
use crate::authentication::credentials::CredentialChecker;
use crate::authentication::errors::AuthError;
use crate::authentication::events::AuthEvent;
use crate::authentication::models::AuthenticatedSession;
use crate::authentication::models::ChangePasswordCommand;
use crate::authentication::models::TokenValidation;
use crate::authentication::models::ValidatedToken;
use crate::authentication::ports::AuthServicePort;
use crate::authentication::ports::EventPublisher;
use crate::authentication::ports::RevocationRegistry;

const DEFAULT_EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Domain service implementation for authentication operations.
///
/// Composes the user directory, credential checker, token codec and revocation
/// registry. Every token check re-reads the account, so status changes take
/// effect on tokens that were issued before them.
pub struct AuthService<EP, RR>
where
    EP: EventPublisher,
    RR: RevocationRegistry,
{
    directory: UserDirectory,
    checker: CredentialChecker,
    codec: Arc<TokenCodec>,
    revocations: Arc<RR>,
    event_publisher: Arc<EP>,
    event_timeout: Duration,
}

impl<EP, RR> AuthService<EP, RR>
where
    EP: EventPublisher,
    RR: RevocationRegistry,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - Account lookup and persistence across the four kinds
    /// * `checker` - Secret verification and status policy
    /// * `codec` - Token issuance and parsing
    /// * `revocations` - Set of revoked tokens
    /// * `event_publisher` - Best-effort event sink
    pub fn new(
        directory: UserDirectory,
        checker: CredentialChecker,
        codec: Arc<TokenCodec>,
        revocations: Arc<RR>,
        event_publisher: Arc<EP>,
    ) -> Self {
        Self {
            directory,
            checker,
            codec,
            revocations,
            event_publisher,
            event_timeout: DEFAULT_EVENT_TIMEOUT,
        }
    }

    /// Upper bound on how long a background publish may take before it is abandoned.
    pub fn with_event_timeout(mut self, timeout: Duration) -> Self {
        self.event_timeout = timeout;
        self
    }

    /// Publish an event on a detached task.
    ///
    /// The operation that produced the event never waits for the broker.
    /// Failures and timeouts are logged and otherwise dropped.
    fn emit(&self, event: AuthEvent) {
        let publisher = Arc::clone(&self.event_publisher);
        let timeout = self.event_timeout;

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, publisher.publish(&event)).await {
                Ok(Ok(())) => {
                    tracing::debug!(event_type = event.event_type(), "Event published");
                }
                Ok(Err(e)) => tracing::error!(
                    event_type = event.event_type(),
                    user_id = event.user_id(),
                    error = %e,
                    "Failed to publish event"
                ),
                Err(_) => tracing::error!(
                    event_type = event.event_type(),
                    user_id = event.user_id(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Timed out publishing event"
                ),
            }
        });
    }

    /// Register `command` unless its username is already taken.
    ///
    /// Used to seed the first administrator at startup.
    ///
    /// # Returns
    /// The new profile, or `None` if an account already holds the username
    pub async fn seed_account(
        &self,
        command: RegisterAccountCommand,
    ) -> Result<Option<AccountProfile>, AuthError> {
        if !self
            .directory
            .is_username_available(command.username.as_str())
            .await?
        {
            tracing::debug!(username = %command.username, "Seed account already present");
            return Ok(None);
        }

        self.register(command).await.map(Some)
    }

    async fn ensure_not_revoked(&self, token: &str) -> Result<(), AuthError> {
        if self.revocations.is_revoked(token).await? {
            return Err(AuthError::TokenRevoked);
        }
        Ok(())
    }

    async fn account_for(&self, claims: &TokenClaims) -> Result<Account, AuthError> {
        self.directory
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Status first, so a deactivated account reports the specific reason.
    fn ensure_matches(&self, token: &str, account: &Account) -> Result<(), AuthError> {
        self.checker.ensure_active(account)?;
        if !self.codec.validate_against(token, account) {
            return Err(AuthError::TokenInvalid);
        }
        Ok(())
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let Some(account) = self.directory.find_by_username(username).await? else {
            self.checker.verify_decoy(password);
            return Err(AuthError::UserNotFound);
        };

        if !self.checker.verify_secret(password, &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        self.checker.ensure_active(&account)?;

        Ok(account)
    }

    fn open_session(&self, account: &Account) -> Result<AuthenticatedSession, AuthError> {
        Ok(AuthenticatedSession {
            access_token: self.codec.issue_access(account)?,
            refresh_token: self.codec.issue_refresh(account)?,
            token_type: "Bearer",
            expires_in: self.codec.lifetimes().access.num_seconds(),
            profile: self.directory.build_profile(account),
        })
    }

    async fn validate(&self, token: &str) -> Result<ValidatedToken, AuthError> {
        self.ensure_not_revoked(token).await?;
        if self.codec.is_expired(token) {
            return Err(AuthError::TokenExpired);
        }

        let claims = self.codec.parse(token)?;
        expect_type(&claims, TokenType::Access)?;

        let account = self.account_for(&claims).await?;
        self.ensure_matches(token, &account)?;

        Ok(ValidatedToken {
            username: account.username.to_string(),
            user_id: account.id.to_string(),
            role: account.kind(),
            authorities: claims.authorities,
            token_type: claims.token_type,
            status: account.status,
            profile: self.directory.build_profile(&account),
        })
    }
}

fn expect_type(claims: &TokenClaims, expected: TokenType) -> Result<(), AuthError> {
    if claims.token_type != expected {
        return Err(AuthError::TokenTypeMismatch {
            expected,
            actual: claims.token_type,
        });
    }
    Ok(())
}

#[async_trait]
impl<EP, RR> AuthServicePort for AuthService<EP, RR>
where
    EP: EventPublisher,
    RR: RevocationRegistry,
{
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AuthError> {
        let account = match self.authenticate(username, password).await {
            Ok(account) => account,
            Err(e) if e.is_system() => return Err(e),
            Err(e) => {
                tracing::warn!(username = %username, reason = e.code(), "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let session = self.open_session(&account)?;
        tracing::info!(
            user_id = %account.id,
            username = %account.username,
            kind = %account.kind(),
            "Login succeeded"
        );

        self.emit(AuthEvent::user_logged_in(&account));

        Ok(session)
    }

    async fn register(&self, command: RegisterAccountCommand) -> Result<AccountProfile, AuthError> {
        let account = self.directory.create(command).await?;

        self.emit(AuthEvent::user_registered(&account));

        Ok(self.directory.build_profile(&account))
    }

    async fn validate_token(&self, token: &str) -> Result<TokenValidation, AuthError> {
        match self.validate(token).await {
            Ok(validated) => Ok(TokenValidation::Valid(validated)),
            Err(e) if e.is_system() => Err(e),
            Err(e) => {
                tracing::debug!(reason = e.code(), "Token validation failed");
                Ok(TokenValidation::Invalid(e))
            }
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthenticatedSession, AuthError> {
        self.ensure_not_revoked(refresh_token).await?;

        let claims = self.codec.parse(refresh_token)?;
        expect_type(&claims, TokenType::Refresh)?;

        let account = self.account_for(&claims).await?;
        self.ensure_matches(refresh_token, &account)?;

        let session = self.open_session(&account)?;

        // Only the caller that actually consumes the token gets the new pair.
        if !self.revocations.revoke(refresh_token).await? {
            tracing::warn!(user_id = %account.id, "Refresh token replayed concurrently");
            return Err(AuthError::TokenRevoked);
        }

        tracing::info!(user_id = %account.id, "Refresh token rotated");

        Ok(session)
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.revocations.revoke(token).await?;
        tracing::info!(
            token = %self.codec.describe(token),
            remaining_secs = self.codec.remaining_validity(token).num_seconds(),
            "Token revoked on logout"
        );
        Ok(())
    }

    async fn change_password(&self, command: ChangePasswordCommand) -> Result<(), AuthError> {
        let token = command.access_token.as_str();
        self.ensure_not_revoked(token).await?;

        let claims = self.codec.parse(token)?;
        expect_type(&claims, TokenType::Access)?;

        let account = self.account_for(&claims).await?;
        self.ensure_matches(token, &account)?;

        if !self
            .checker
            .verify_secret(&command.current_password, &account.password_hash)
        {
            tracing::warn!(
                user_id = %account.id,
                "Password change rejected: wrong current password"
            );
            return Err(AuthError::WrongCurrentPassword);
        }

        let account = self
            .directory
            .change_secret(account, &command.new_password)
            .await?;
        tracing::info!(user_id = %account.id, "Password changed");

        self.emit(AuthEvent::password_changed(&account));

        Ok(())
    }

    async fn is_username_available(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.directory.is_username_available(username).await?)
    }

    async fn is_email_available(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.directory.is_email_available(email).await?)
    }

    async fn update_account_status(
        &self,
        id: &AccountId,
        update: StatusUpdate,
    ) -> Result<AccountProfile, AuthError> {
        let before = self
            .directory
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let account = self.directory.update_status(id, update).await?;

        tracing::info!(user_id = %account.id, status = ?account.status, "Account status updated");

        match (before.status.account_non_locked, account.status.account_non_locked) {
            (true, false) => self.emit(AuthEvent::account_locked(&account)),
            (false, true) => self.emit(AuthEvent::account_unlocked(&account)),
            _ => {}
        }

        Ok(self.directory.build_profile(&account))
    }

    async fn update_account_details(
        &self,
        id: &AccountId,
        details: AccountDetails,
    ) -> Result<AccountProfile, AuthError> {
        let account = self.directory.update_details(id, details).await?;
        Ok(self.directory.build_profile(&account))
    }
}
