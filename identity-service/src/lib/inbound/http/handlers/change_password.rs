use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::ChangePasswordCommand;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::UserRepository;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Protected route: the caller's identity comes from the session guard, not
/// from the request body.
pub async fn change_password<R>(
    State(state): State<AppState<R>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<ChangePasswordResponseData>, ApiError>
where
    R: UserRepository,
{
    let command = ChangePasswordCommand {
        current_password: body.current_password,
        new_password: body.new_password,
    };

    state
        .identity_service
        .change_password(&caller.user_id, command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ChangePasswordResponseData {
            message: "Password changed successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}
