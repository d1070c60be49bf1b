use auth::TokenPair;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::Username;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn login<R>(
    State(state): State<AppState<R>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenPair>, ApiError>
where
    R: UserRepository,
{
    // A handle that cannot even parse is reported exactly like an unknown
    // one, so the response shape leaks nothing about stored accounts.
    let username = Username::new(body.username)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let pair = state
        .identity_service
        .login(&username, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::OK, pair))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}
