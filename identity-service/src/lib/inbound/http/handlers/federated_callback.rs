use auth::TokenPair;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::FederatedProfile;
use crate::identity::models::User;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Provider callback, reached after the transport layer has completed the
/// provider exchange and verified the profile. Resolves or provisions the
/// local account, then responds exactly like a successful login.
pub async fn federated_callback<R>(
    State(state): State<AppState<R>>,
    Path(provider): Path<String>,
    Query(query): Query<FederatedCallbackQuery>,
) -> Result<ApiSuccess<FederatedSignInResponseData>, ApiError>
where
    R: UserRepository,
{
    let profile = FederatedProfile {
        provider,
        subject_id: query.subject_id,
        display_name: query.display_name,
    };

    let (user, pair) = state
        .identity_service
        .federated_sign_in(profile)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        FederatedSignInResponseData {
            user: (&user).into(),
            tokens: pair,
        },
    ))
}

/// Verified profile fields delivered by the provider exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedCallbackQuery {
    subject_id: String,
    display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FederatedSignInResponseData {
    pub user: FederatedUserData,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FederatedUserData {
    pub id: String,
    pub username: String,
}

impl From<&User> for FederatedUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
        }
    }
}
