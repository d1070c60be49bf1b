use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Tokens are stateless, so logout has nothing to revoke; the response only
/// instructs the client to discard its pair.
pub async fn logout<R>(
    State(state): State<AppState<R>>,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError>
where
    R: UserRepository,
{
    state.identity_service.logout();

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "Logged out successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
