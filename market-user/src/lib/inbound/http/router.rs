use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
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

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh_token::refresh_token;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use super::middleware::authorize;
use crate::domain::user::authenticator::Authenticator;
use crate::domain::user::authorizer::Authorizer;
use crate::domain::user::hashing::CredentialHasher;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::service::UserService;

pub struct AppState<S: CredentialStore> {
    pub user_service: Arc<UserService<S>>,
    pub authenticator: Arc<Authenticator<S>>,
    pub authorizer: Arc<Authorizer<S>>,
    pub tokens: Arc<TokenService>,
}

// Derived Clone would require `S: Clone`.
impl<S: CredentialStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            authenticator: Arc::clone(&self.authenticator),
            authorizer: Arc::clone(&self.authorizer),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<S: CredentialStore> AppState<S> {
    pub fn new(store: Arc<S>, hasher: CredentialHasher, tokens: Arc<TokenService>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(Arc::clone(&store), hasher.clone())),
            authenticator: Arc::new(Authenticator::new(Arc::clone(&store), hasher)),
            authorizer: Arc::new(Authorizer::new(store)),
            tokens,
        }
    }
}

pub fn create_router<S: CredentialStore>(state: AppState<S>) -> Router {
    let public_routes = Router::new()
        .route("/users", post(create_user::<S>))
        .route("/users/", post(create_user::<S>))
        .route("/login", post(login::<S>))
        .route("/auth/refresh-token", get(refresh_token::<S>));

    let session_routes = Router::new()
        .route("/auth/logout", get(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<S>,
        ));

    // Layers added later wrap earlier ones: authenticate runs before authorize.
    let account_routes = Router::new()
        .route(
            "/users/:id",
            get(get_user::<S>)
                .patch(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authorize::<S>,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<S>,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
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
        .merge(session_routes)
        .merge(account_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
