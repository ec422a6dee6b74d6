use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::models::Password;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a user; only the password can change.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(alias = "Password")]
    pub password: Option<String>,
}

pub async fn update_user<S: CredentialStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<()>, ApiError> {
    let Json(body) = body?;
    let password = Password::new(body.password.unwrap_or_default())?;

    state
        .user_service
        .update_password(user.user_id, password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
