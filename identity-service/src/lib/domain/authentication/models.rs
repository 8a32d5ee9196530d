use std::fmt;

use auth::TokenType;

use crate::account::models::AccountKind;
use crate::account::models::AccountProfile;
use crate::account::models::AccountStatus;
use crate::authentication::errors::AuthError;

/// Token pair handed out by login and refresh.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub profile: AccountProfile,
}

/// Identity behind a token that passed every validation step.
#[derive(Debug, Clone)]
pub struct ValidatedToken {
    pub username: String,
    pub user_id: String,
    pub role: AccountKind,
    pub authorities: Vec<String>,
    pub token_type: TokenType,
    pub status: AccountStatus,
    pub profile: AccountProfile,
}

/// Outcome of validating a presented token.
///
/// A merely invalid token is a value, not an error.
#[derive(Debug, Clone)]
pub enum TokenValidation {
    Valid(ValidatedToken),
    Invalid(AuthError),
}

impl TokenValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenValidation::Valid(_))
    }

    /// Reason the token was rejected, if it was.
    pub fn reason(&self) -> Option<&AuthError> {
        match self {
            TokenValidation::Valid(_) => None,
            TokenValidation::Invalid(reason) => Some(reason),
        }
    }
}

/// Command to change the secret of the account behind an access token.
pub struct ChangePasswordCommand {
    pub access_token: String,
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordCommand {
    pub fn new(access_token: String, current_password: String, new_password: String) -> Self {
        Self {
            access_token,
            current_password,
            new_password,
        }
    }
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordCommand")
            .field("access_token", &"<redacted>")
            .field("current_password", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_debug_hides_secrets() {
        let command = ChangePasswordCommand::new(
            "header.payload.signature".to_string(),
            "OldP@ss1".to_string(),
            "NewP@ss2".to_string(),
        );

        let debug = format!("{:?}", command);

        assert!(!debug.contains("OldP@ss1"));
        assert!(!debug.contains("NewP@ss2"));
        assert!(!debug.contains("header.payload.signature"));
    }
}
