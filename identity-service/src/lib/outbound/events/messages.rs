use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::account::models::AccountKind;
use crate::authentication::events::AccountSnapshot;
use crate::authentication::events::AuthEvent;

/// Serializable envelope for authentication events.
///
/// Wire representation consumed by the notification services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventMessage {
    UserRegistered(AccountEventMessage),
    UserLoggedIn(AccountEventMessage),
    PasswordChanged(AccountEventMessage),
    AccountLocked(AccountEventMessage),
    AccountUnlocked(AccountEventMessage),
}

/// Account payload shared by every event message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEventMessage {
    pub event_id: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub user_type: AccountKind,
    pub occurred_at: DateTime<Utc>,
}

impl From<&AccountSnapshot> for AccountEventMessage {
    fn from(snapshot: &AccountSnapshot) -> Self {
        Self {
            event_id: snapshot.event_id.clone(),
            user_id: snapshot.user_id.clone(),
            username: snapshot.username.clone(),
            email: snapshot.email.clone(),
            user_type: snapshot.kind,
            occurred_at: snapshot.occurred_at,
        }
    }
}

impl From<&AuthEvent> for AuthEventMessage {
    fn from(event: &AuthEvent) -> Self {
        let payload = AccountEventMessage::from(event.snapshot());
        match event {
            AuthEvent::UserRegistered(_) => AuthEventMessage::UserRegistered(payload),
            AuthEvent::UserLoggedIn(_) => AuthEventMessage::UserLoggedIn(payload),
            AuthEvent::PasswordChanged(_) => AuthEventMessage::PasswordChanged(payload),
            AuthEvent::AccountLocked(_) => AuthEventMessage::AccountLocked(payload),
            AuthEvent::AccountUnlocked(_) => AuthEventMessage::AccountUnlocked(payload),
        }
    }
}
