use std::fmt;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::authentication::models::ChangePasswordCommand;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::router::AppState;

/// `POST /api/auth/change-password`, authorized by the caller's access token.
pub async fn change_password(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<ChangePasswordResponseData>, ApiError> {
    if body.new_password != body.confirm_password {
        return Err(ApiError::UnprocessableEntity(
            "Passwords do not match".to_string(),
        ));
    }

    let command = ChangePasswordCommand::new(token, body.current_password, body.new_password);

    state
        .auth_service
        .change_password(command)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                ChangePasswordResponseData {
                    message: "Password changed".to_string(),
                },
            )
        })
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
    confirm_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_request_debug_hides_passwords() {
        let request: ChangePasswordRequest = serde_json::from_value(serde_json::json!({
            "current_password": "OldP@ss1",
            "new_password": "NewP@ss2",
            "confirm_password": "NewP@ss2"
        }))
        .unwrap();

        let debug = format!("{:?}", request);

        assert!(!debug.contains("OldP@ss1"));
        assert!(!debug.contains("NewP@ss2"));
    }
}
