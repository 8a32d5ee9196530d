use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::login::SessionResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::models::AccountProfile;
use crate::account::models::AccountStatus;
use crate::authentication::models::TokenValidation;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::router::AppState;

/// `POST /api/auth/validate`
///
/// Always 200 for a well-formed request; validity is in the body.
pub async fn validate_token(
    State(state): State<AppState>,
    Json(body): Json<ValidateTokenRequest>,
) -> Result<ApiSuccess<TokenValidationData>, ApiError> {
    state
        .auth_service
        .validate_token(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|validation| ApiSuccess::new(StatusCode::OK, validation.into()))
}

/// `POST /api/auth/refresh`
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    state
        .auth_service
        .refresh_token(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}

/// `POST /api/auth/logout` with the token to revoke as bearer credential.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError> {
    state
        .auth_service
        .logout(&token)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                LogoutResponseData {
                    message: "Logged out".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateTokenRequest {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenValidationData {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AccountProfile>,
}

impl From<TokenValidation> for TokenValidationData {
    fn from(validation: TokenValidation) -> Self {
        match validation {
            TokenValidation::Valid(token) => Self {
                valid: true,
                reason: None,
                message: None,
                username: Some(token.username),
                user_id: Some(token.user_id),
                role: Some(token.role.to_string()),
                authorities: Some(token.authorities),
                status: Some(token.status),
                user: Some(token.profile),
            },
            TokenValidation::Invalid(reason) => Self {
                valid: false,
                reason: Some(reason.code()),
                message: Some(reason.to_string()),
                username: None,
                user_id: None,
                role: None,
                authorities: None,
                status: None,
                user: None,
            },
        }
    }
}
