use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NationalCode;
use crate::domain::user::models::Password;
use crate::domain::user::ports::CredentialStore;
use crate::inbound::http::router::AppState;
use crate::user::errors::MissingFieldError;

pub async fn login<S: CredentialStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let Json(body) = body?;

    let user_id = state
        .authenticator
        .authenticate(body.try_into_command()?)
        .await?;

    let issued = state.tokens.issue(user_id.0)?;

    tracing::info!(user_id = %user_id, "User logged in");

    Ok(ApiSuccess::new(StatusCode::OK, issued.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    #[serde(alias = "NationalCode")]
    national_code: Option<String>,
    #[serde(alias = "Password")]
    password: Option<String>,
}

impl LoginRequestBody {
    fn try_into_command(self) -> Result<LoginCommand, MissingFieldError> {
        Ok(LoginCommand {
            national_code: NationalCode::new(self.national_code.unwrap_or_default())?,
            password: Password::new(self.password.unwrap_or_default())?,
        })
    }
}
