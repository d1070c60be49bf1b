use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::identity::errors::AuthError;
use crate::identity::models::UserId;
use crate::identity::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Extension type carrying the resolved identity for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Session guard: admits a request only if it carries a valid bearer access
/// token, and attaches the resolved identity to the request extensions.
///
/// This is a gate, not a session: no record-store lookup happens here, so a
/// user deleted after issuance stays admitted until the token expires.
///
/// A missing credential is rejected with 403, a failed verification with 400,
/// mirroring the outward contract clients already depend on.
pub async fn authenticate<R>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository,
{
    let token = extract_bearer_token(&req).map_err(|_| {
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Access denied" })),
        )
            .into_response()
    })?;

    let user_id = resolve_subject(&state, token).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token rejected");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid token" })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn resolve_subject<R>(state: &AppState<R>, token: &str) -> Result<UserId, AuthError>
where
    R: UserRepository,
{
    let claims = state.authenticator.verify_token(token)?;

    // Only access tokens gate requests; a refresh token presented here is
    // misuse.
    if claims.kind != auth::TokenKind::Access {
        return Err(AuthError::TokenInvalid("not an access token".to_string()));
    }

    Ok(UserId::from_string(&claims.sub)?)
}

fn extract_bearer_token(req: &Request) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MissingCredential)?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredential)
}
