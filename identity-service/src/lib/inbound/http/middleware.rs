use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::account::models::AccountKind;
use crate::authentication::models::TokenValidation;
use crate::authentication::models::ValidatedToken;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Raw token from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

        value
            .strip_prefix("Bearer ")
            .filter(|token| !token.is_empty())
            .map(|token| BearerToken(token.to_string()))
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
                )
            })
    }
}

/// Resolve `token` to an administrator identity.
///
/// # Errors
/// * `Auth` - Token failed validation, with the specific reason
/// * `Forbidden` - Token is valid but belongs to a non-admin account
pub async fn authorize_admin(state: &AppState, token: &str) -> Result<ValidatedToken, ApiError> {
    let validated = match state.auth_service.validate_token(token).await? {
        TokenValidation::Valid(validated) => validated,
        TokenValidation::Invalid(reason) => {
            tracing::warn!(reason = reason.code(), "Rejected administrative request");
            return Err(ApiError::from(reason));
        }
    };

    if validated.role != AccountKind::Admin {
        tracing::warn!(
            username = %validated.username,
            role = %validated.role,
            "Administrative request from non-admin account"
        );
        return Err(ApiError::Forbidden("Administrator account required".to_string()));
    }

    Ok(validated)
}

/// Middleware admitting only requests carrying a valid administrator access token.
///
/// The validated identity is stored in the request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let validated = authorize_admin(&state, &token)
        .await
        .map_err(IntoResponse::into_response)?;

    req.extensions_mut().insert(validated);

    Ok(next.run(req).await)
}
