use auth::TokenError;
use axum::extract::Path;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use super::handlers::ApiError;
use super::handlers::FORBIDDEN_MESSAGE;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::CredentialStore;
use crate::inbound::http::router::AppState;

/// Identity resolved from a verified token, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that locates and verifies the request token and adds the
/// caller's identity to request extensions.
pub async fn authenticate<S: CredentialStore>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = state.tokens.extract(req.headers(), req.uri())?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        e
    })?;

    if claims.id <= 0 {
        return Err(
            TokenError::TokenInvalid("identity claim is not a user id".to_string()).into(),
        );
    }

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(claims.id),
    });

    Ok(next.run(req).await)
}

/// Middleware for `/users/:id` routes. Runs after [`authenticate`] and only
/// lets callers through to their own, still active, account.
pub async fn authorize<S: CredentialStore>(
    State(state): State<AppState<S>>,
    Path(requested): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let forbidden = || ApiError::Forbidden(FORBIDDEN_MESSAGE.to_string());

    let requested = UserId::from_string(&requested).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting malformed user id in path");
        forbidden()
    })?;

    if !state.authorizer.authorize(user.user_id, requested).await {
        tracing::debug!(
            user_id = %user.user_id,
            requested = %requested,
            "Access denied"
        );
        return Err(forbidden());
    }

    Ok(next.run(req).await)
}
