use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_user<S: CredentialStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<GetUserResponseData>, ApiError> {
    state
        .user_service
        .get_profile(user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserResponseData {
    pub first_name: String,
    pub last_name: String,
    pub national_code: String,
}

impl From<&User> for GetUserResponseData {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            national_code: user.national_code.as_str().to_string(),
        }
    }
}
