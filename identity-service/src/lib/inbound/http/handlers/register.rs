use std::fmt;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountKindError;
use crate::account::errors::EmailError;
use crate::account::errors::UsernameError;
use crate::account::models::AccountDetails;
use crate::account::models::AccountKind;
use crate::account::models::AccountProfile;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterAccountCommand;
use crate::account::models::Username;
use crate::inbound::http::middleware::authorize_admin;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::router::AppState;

const MIN_USERNAME_LENGTH: usize = 6;
const MIN_PASSWORD_LENGTH: usize = 6;

/// `POST /api/auth/register/:kind`
///
/// Customers register themselves. Every other kind is created by an
/// administrator and needs an admin access token.
pub async fn register(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    bearer: Option<BearerToken>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<AccountProfile>, ApiError> {
    let kind: AccountKind = kind.parse().map_err(ParseRegisterRequestError::from)?;

    if kind != AccountKind::Customer {
        let BearerToken(token) = bearer.ok_or_else(|| {
            ApiError::Unauthorized(format!(
                "Registering a {} account requires an administrator token",
                kind
            ))
        })?;
        let admin = authorize_admin(&state, &token).await?;
        tracing::info!(admin = %admin.username, kind = %kind, "Administrator registering account");
    }

    state
        .auth_service
        .register(body.try_into_command(kind)?)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::CREATED, profile))
}

/// HTTP request body for registration (raw JSON).
///
/// Kind-specific fields are read only for the kind named in the path.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
    admin_level: Option<String>,
    department: Option<String>,
    permissions: Option<Vec<String>>,
    station: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("admin_level", &self.admin_level)
            .field("department", &self.department)
            .field("permissions", &self.permissions)
            .field("station", &self.station)
            .finish()
    }
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Unknown account kind: {0}")]
    Kind(#[from] AccountKindError),

    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Username must be at least 6 characters")]
    UsernameTooShort,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Missing field for {kind} account: {field}")]
    MissingField { kind: AccountKind, field: &'static str },
}

impl RegisterRequest {
    fn try_into_command(
        self,
        kind: AccountKind,
    ) -> Result<RegisterAccountCommand, ParseRegisterRequestError> {
        if self.username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(ParseRegisterRequestError::UsernameTooShort);
        }
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ParseRegisterRequestError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ParseRegisterRequestError::PasswordMismatch);
        }

        let missing = |field| ParseRegisterRequestError::MissingField { kind, field };
        let details = match kind {
            AccountKind::Customer => AccountDetails::Customer,
            AccountKind::Admin => AccountDetails::Admin {
                admin_level: self.admin_level.ok_or_else(|| missing("admin_level"))?,
            },
            AccountKind::Operator => AccountDetails::Operator {
                department: self.department.ok_or_else(|| missing("department"))?,
                permissions: self.permissions.unwrap_or_default(),
            },
            AccountKind::Kitchen => AccountDetails::Kitchen {
                station: self.station.ok_or_else(|| missing("station"))?,
            },
        };

        Ok(RegisterAccountCommand::new(
            username,
            email,
            self.password,
            details,
        ))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        match err {
            ParseRegisterRequestError::Kind(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::UnprocessableEntity(err.to_string()),
        }
    }
}
