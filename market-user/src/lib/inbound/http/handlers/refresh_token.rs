use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::Uri;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::CredentialStore;
use crate::inbound::http::router::AppState;

/// Exchange a token issued within the refresh window for a new one.
///
/// Not behind the authentication middleware: an expired token is still
/// refreshable until the window closes. The account must still be active.
pub async fn refresh_token<S: CredentialStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let token = state.tokens.extract(&headers, &uri)?;

    let claims = state.tokens.refreshable(&token).map_err(|e| {
        tracing::debug!(error = %e, "Token refresh rejected");
        e
    })?;

    let user_id = UserId(claims.id);
    if !state.authorizer.authorize(user_id, user_id).await {
        tracing::debug!(user_id = %user_id, "Token refresh rejected: account inactive");
        return Err(ApiError::Unauthorized(
            "account is no longer active".to_string(),
        ));
    }

    let issued = state.tokens.issue(claims.id)?;

    Ok(ApiSuccess::new(StatusCode::OK, issued.into()))
}
