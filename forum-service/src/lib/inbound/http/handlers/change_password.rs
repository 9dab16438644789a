use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<ChangePasswordResponseData>, ApiError> {
    let Json(body) = payload?;
    let command = body.try_into_command()?;

    state
        .user_service
        .change_password(&caller.user_id, command)
        .await
        .map_err(|e| match e {
            UserError::InvalidCredentials => {
                ApiError::Unauthenticated("Current password is incorrect".to_string())
            }
            other => ApiError::from(other),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ChangePasswordResponseData {
            message: "Password changed successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
    confirm_password: String,
}

impl ChangePasswordRequest {
    fn try_into_command(self) -> Result<ChangePasswordCommand, UserError> {
        Ok(ChangePasswordCommand {
            current_password: self.current_password,
            new_password: Password::new(self.new_password, &self.confirm_password)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}
