use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::AccountDetails;
use crate::account::models::AccountId;
use crate::account::models::AccountProfile;
use crate::account::models::StatusUpdate;
use crate::authentication::models::ValidatedToken;
use crate::inbound::http::router::AppState;

/// `PATCH /api/auth/accounts/:account_id/status`
pub async fn update_status(
    State(state): State<AppState>,
    Extension(admin): Extension<ValidatedToken>,
    Path(account_id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<ApiSuccess<AccountProfile>, ApiError> {
    let id = parse_id(&account_id)?;
    tracing::info!(admin = %admin.username, account_id = %id, "Updating account status");

    state
        .auth_service
        .update_account_status(&id, update)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}

/// `PUT /api/auth/accounts/:account_id/details`
pub async fn update_details(
    State(state): State<AppState>,
    Extension(admin): Extension<ValidatedToken>,
    Path(account_id): Path<String>,
    Json(body): Json<UpdateDetailsRequest>,
) -> Result<ApiSuccess<AccountProfile>, ApiError> {
    let id = parse_id(&account_id)?;
    tracing::info!(admin = %admin.username, account_id = %id, "Updating account details");

    state
        .auth_service
        .update_account_details(&id, body.into())
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}

fn parse_id(raw: &str) -> Result<AccountId, ApiError> {
    AccountId::from_string(raw).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))
}

/// Kind-specific attributes, tagged by account kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum UpdateDetailsRequest {
    Customer,
    Admin {
        admin_level: String,
    },
    Operator {
        department: String,
        #[serde(default)]
        permissions: Vec<String>,
    },
    Kitchen {
        station: String,
    },
}

impl From<UpdateDetailsRequest> for AccountDetails {
    fn from(request: UpdateDetailsRequest) -> Self {
        match request {
            UpdateDetailsRequest::Customer => AccountDetails::Customer,
            UpdateDetailsRequest::Admin { admin_level } => AccountDetails::Admin { admin_level },
            UpdateDetailsRequest::Operator {
                department,
                permissions,
            } => AccountDetails::Operator {
                department,
                permissions,
            },
            UpdateDetailsRequest::Kitchen { station } => AccountDetails::Kitchen { station },
        }
    }
}
