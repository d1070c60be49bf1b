use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::federated_callback::federated_callback;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::identity::ports::UserRepository;
use crate::identity::service::IdentityService;

pub struct AppState<R>
where
    R: UserRepository,
{
    pub identity_service: Arc<IdentityService<R>>,
    pub authenticator: Arc<Authenticator>,
}

// Manual impl: deriving would demand R: Clone, but only the Arcs are cloned.
impl<R> Clone for AppState<R>
where
    R: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            identity_service: Arc::clone(&self.identity_service),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

pub fn create_router<R>(
    identity_service: Arc<IdentityService<R>>,
    authenticator: Arc<Authenticator>,
) -> Router
where
    R: UserRepository,
{
    let state = AppState {
        identity_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh-token", post(refresh_token))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/:provider/callback", get(federated_callback));

    let protected_routes = Router::new()
        .route("/api/auth/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<R>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "Identity service is running"
}
