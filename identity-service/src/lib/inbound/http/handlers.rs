use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::authentication::errors::AuthError;

pub mod accounts;
pub mod availability;
pub mod change_password;
pub mod health;
pub mod login;
pub mod register;
pub mod tokens;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    /// Domain failure; its machine-readable code is sent alongside the message.
    Auth(AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::Auth(err) if err.is_system() => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::Auth(err) => (auth_status(&err), err.to_string(), Some(err.code())),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
        };

        (status, Json(ApiResponseBody::new_error(status, message, code))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::DuplicateIdentity(_) => StatusCode::CONFLICT,
        AuthError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::WrongCurrentPassword => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials
        | AuthError::AccountDisabled
        | AuthError::AccountLocked
        | AuthError::AccountExpired
        | AuthError::CredentialsExpired
        | AuthError::TokenMalformed(_)
        | AuthError::TokenUnsupported(_)
        | AuthError::TokenSignatureInvalid
        | AuthError::TokenExpired
        | AuthError::TokenRevoked
        | AuthError::TokenTypeMismatch { .. }
        | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
        AuthError::Directory(_)
        | AuthError::Hashing(_)
        | AuthError::TokenIssue(_)
        | AuthError::Revocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, code: Option<&'static str>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, code },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    /// Stable failure code such as `TOKEN_EXPIRED`, present for domain failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}
