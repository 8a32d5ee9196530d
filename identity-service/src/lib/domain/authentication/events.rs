use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::models::Account;
use crate::account::models::AccountKind;

/// Snapshot of the account an authentication event relates to.
///
/// Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub event_id: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub kind: AccountKind,
    pub occurred_at: DateTime<Utc>,
}

impl AccountSnapshot {
    fn of(account: &Account) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: account.id.to_string(),
            username: account.username.to_string(),
            email: account.email.to_string(),
            kind: account.kind(),
            occurred_at: Utc::now(),
        }
    }
}

/// Domain events emitted after a successful state change.
///
/// Downstream consumers turn these into emails and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    UserRegistered(AccountSnapshot),
    UserLoggedIn(AccountSnapshot),
    PasswordChanged(AccountSnapshot),
    AccountLocked(AccountSnapshot),
    AccountUnlocked(AccountSnapshot),
}

impl AuthEvent {
    pub fn user_registered(account: &Account) -> Self {
        AuthEvent::UserRegistered(AccountSnapshot::of(account))
    }

    pub fn user_logged_in(account: &Account) -> Self {
        AuthEvent::UserLoggedIn(AccountSnapshot::of(account))
    }

    pub fn password_changed(account: &Account) -> Self {
        AuthEvent::PasswordChanged(AccountSnapshot::of(account))
    }

    pub fn account_locked(account: &Account) -> Self {
        AuthEvent::AccountLocked(AccountSnapshot::of(account))
    }

    pub fn account_unlocked(account: &Account) -> Self {
        AuthEvent::AccountUnlocked(AccountSnapshot::of(account))
    }

    /// Get the event type name.
    ///
    /// # Returns
    /// Event type string, e.g. `USER_REGISTERED`
    pub fn event_type(&self) -> &'static str {
        match self {
            AuthEvent::UserRegistered(_) => "USER_REGISTERED",
            AuthEvent::UserLoggedIn(_) => "USER_LOGGED_IN",
            AuthEvent::PasswordChanged(_) => "PASSWORD_CHANGED",
            AuthEvent::AccountLocked(_) => "ACCOUNT_LOCKED",
            AuthEvent::AccountUnlocked(_) => "ACCOUNT_UNLOCKED",
        }
    }

    pub fn snapshot(&self) -> &AccountSnapshot {
        match self {
            AuthEvent::UserRegistered(s)
            | AuthEvent::UserLoggedIn(s)
            | AuthEvent::PasswordChanged(s)
            | AuthEvent::AccountLocked(s)
            | AuthEvent::AccountUnlocked(s) => s,
        }
    }

    /// Extract the user ID this event relates to.
    pub fn user_id(&self) -> &str {
        &self.snapshot().user_id
    }
}
