use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Tokens are stateless, so logging out only acknowledges the request; the
/// client discards its token.
pub async fn logout(Extension(user): Extension<AuthenticatedUser>) -> ApiSuccess<()> {
    tracing::info!(user_id = %user.user_id, "User logged out");

    ApiSuccess::new(StatusCode::OK, ())
}
