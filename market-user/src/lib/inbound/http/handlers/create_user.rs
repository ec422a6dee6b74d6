use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NationalCode;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::MissingFieldError;

pub async fn create_user<S: CredentialStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<CreateUserResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(alias = "FirstName")]
    first_name: Option<String>,
    #[serde(alias = "LastName")]
    last_name: Option<String>,
    #[serde(alias = "NationalCode")]
    national_code: Option<String>,
    #[serde(alias = "Password")]
    password: Option<String>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, MissingFieldError> {
        Ok(CreateUserCommand {
            first_name: PersonName::new("first name", self.first_name.unwrap_or_default())?,
            last_name: PersonName::new("last name", self.last_name.unwrap_or_default())?,
            national_code: NationalCode::new(self.national_code.unwrap_or_default())?,
            password: Password::new(self.password.unwrap_or_default())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponseData {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub national_code: String,
}

impl From<&User> for CreateUserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            national_code: user.national_code.as_str().to_string(),
        }
    }
}
