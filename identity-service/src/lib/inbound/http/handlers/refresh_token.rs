use auth::TokenPair;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn refresh_token<R>(
    State(state): State<AppState<R>>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<ApiSuccess<TokenPair>, ApiError>
where
    R: UserRepository,
{
    let pair = state
        .identity_service
        .refresh(&body.token)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::OK, pair))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequest {
    token: String,
}
