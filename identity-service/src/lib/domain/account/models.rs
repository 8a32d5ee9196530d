use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::AccountKindError;
use crate::account::errors::EmailError;
use crate::account::errors::UsernameError;

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Case-sensitive, ASCII letters and digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 1;
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Errors
    /// * `TooShort` - Username is empty
    /// * `TooLong` - Username longer than 64 characters
    /// * `InvalidCharacters` - Contains anything but ASCII letters and digits
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity field that must be unique across every account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Username,
    Email,
}

impl IdentityField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityField::Username => "username",
            IdentityField::Email => "email",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of account categories.
///
/// The kind routes storage and becomes the `role` claim of issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountKind {
    Customer,
    Admin,
    Operator,
    Kitchen,
}

impl AccountKind {
    /// Order in which the directory queries the per-kind stores.
    pub const LOOKUP_ORDER: [AccountKind; 4] = [
        AccountKind::Customer,
        AccountKind::Admin,
        AccountKind::Operator,
        AccountKind::Kitchen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Customer => "CUSTOMER",
            AccountKind::Admin => "ADMIN",
            AccountKind::Operator => "OPERATOR",
            AccountKind::Kitchen => "KITCHEN",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = AccountKindError;

    /// Case-insensitive, so both `CUSTOMER` and the `customer` path segment parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CUSTOMER" => Ok(AccountKind::Customer),
            "ADMIN" => Ok(AccountKind::Admin),
            "OPERATOR" => Ok(AccountKind::Operator),
            "KITCHEN" => Ok(AccountKind::Kitchen),
            _ => Err(AccountKindError(s.to_string())),
        }
    }
}

/// Single reason an account fails the active-status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFailure {
    Disabled,
    Locked,
    Expired,
    CredentialsExpired,
}

/// The four independent status flags of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    pub enabled: bool,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self {
            enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
        }
    }
}

impl AccountStatus {
    pub fn is_active(&self) -> bool {
        self.first_failure().is_none()
    }

    /// First failing flag, checked as disabled, locked, expired, credentials expired.
    pub fn first_failure(&self) -> Option<StatusFailure> {
        if !self.enabled {
            Some(StatusFailure::Disabled)
        } else if !self.account_non_locked {
            Some(StatusFailure::Locked)
        } else if !self.account_non_expired {
            Some(StatusFailure::Expired)
        } else if !self.credentials_non_expired {
            Some(StatusFailure::CredentialsExpired)
        } else {
            None
        }
    }
}

/// Partial update of account status flags.
///
/// Only provided flags are changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub enabled: Option<bool>,
    pub account_non_expired: Option<bool>,
    pub account_non_locked: Option<bool>,
    pub credentials_non_expired: Option<bool>,
}

impl StatusUpdate {
    pub fn apply(&self, status: AccountStatus) -> AccountStatus {
        AccountStatus {
            enabled: self.enabled.unwrap_or(status.enabled),
            account_non_expired: self
                .account_non_expired
                .unwrap_or(status.account_non_expired),
            account_non_locked: self.account_non_locked.unwrap_or(status.account_non_locked),
            credentials_non_expired: self
                .credentials_non_expired
                .unwrap_or(status.credentials_non_expired),
        }
    }
}

/// Kind-specific attributes. The variant is the account's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountDetails {
    Customer,
    Admin {
        admin_level: String,
    },
    Operator {
        department: String,
        permissions: Vec<String>,
    },
    Kitchen {
        station: String,
    },
}

impl AccountDetails {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountDetails::Customer => AccountKind::Customer,
            AccountDetails::Admin { .. } => AccountKind::Admin,
            AccountDetails::Operator { .. } => AccountKind::Operator,
            AccountDetails::Kitchen { .. } => AccountKind::Kitchen,
        }
    }
}

/// Account aggregate entity.
///
/// One record of any of the four kinds. `password_hash` never leaves the domain:
/// it is redacted from `Debug` and absent from [`AccountProfile`].
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub status: AccountStatus,
    pub details: AccountDetails,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn kind(&self) -> AccountKind {
        self.details.kind()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("status", &self.status)
            .field("details", &self.details)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl auth::Principal for Account {
    fn subject(&self) -> &str {
        self.username.as_str()
    }

    fn principal_id(&self) -> String {
        self.id.to_string()
    }

    fn role(&self) -> &str {
        self.kind().as_str()
    }

    fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Command to register a new account of the kind given by `details`.
pub struct RegisterAccountCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
    pub details: AccountDetails,
}

impl RegisterAccountCommand {
    /// Construct a new registration command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by the directory)
    /// * `details` - Kind-specific attributes, selecting the target store
    pub fn new(
        username: Username,
        email: EmailAddress,
        password: String,
        details: AccountDetails,
    ) -> Self {
        Self {
            username,
            email,
            password,
            details,
        }
    }

    pub fn kind(&self) -> AccountKind {
        self.details.kind()
    }
}

impl fmt::Debug for RegisterAccountCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterAccountCommand")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("details", &self.details)
            .finish()
    }
}

/// Kind-agnostic projection of an account.
///
/// Kind-specific fields are present only for the kind that carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub kind: AccountKind,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        let mut profile = AccountProfile {
            id: account.id.to_string(),
            username: account.username.to_string(),
            email: account.email.to_string(),
            kind: account.kind(),
            created_at: account.created_at,
            admin_level: None,
            department: None,
            permissions: None,
            station: None,
        };

        match &account.details {
            AccountDetails::Customer => {}
            AccountDetails::Admin { admin_level } => {
                profile.admin_level = Some(admin_level.clone());
            }
            AccountDetails::Operator {
                department,
                permissions,
            } => {
                profile.department = Some(department.clone());
                profile.permissions = Some(permissions.clone());
            }
            AccountDetails::Kitchen { station } => {
                profile.station = Some(station.clone());
            }
        }

        profile
    }
}
