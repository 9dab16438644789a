use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::like::errors::LikeError;
use crate::domain::post::errors::PostError;
use crate::user::errors::UserError;
use crate::user::models::User;

pub mod change_password;
pub mod create_post;
pub mod get_post;
pub mod like_status;
pub mod list_posts;
pub mod login;
pub mod me;
pub mod register;
pub mod toggle_like;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failure taxonomy exposed to clients. Internal detail never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    ValidationFailure(String),
    Unauthenticated(String),
    Conflict(String),
    NotFound(String),
    InternalFailure(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationFailure(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalFailure(detail) => {
                tracing::error!(error = %detail, "Internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ApiErrorData { message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::ValidationFailure("Invalid request body".to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidCredentials => {
                ApiError::Unauthenticated("Invalid username or password".to_string())
            }
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => ApiError::ValidationFailure(err.to_string()),
            UserError::Credential(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalFailure(err.to_string()),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::InvalidPostId(_) => ApiError::ValidationFailure("Invalid post ID".to_string()),
            PostError::InvalidContent(_) => ApiError::ValidationFailure(err.to_string()),
            PostError::NotFound(_) => ApiError::NotFound("Post not found".to_string()),
            PostError::AuthorNotFound(_) => ApiError::NotFound("User not found".to_string()),
            PostError::DatabaseError(_) => ApiError::InternalFailure(err.to_string()),
        }
    }
}

impl From<LikeError> for ApiError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::PostNotFound(_) => ApiError::NotFound("Post not found".to_string()),
            LikeError::AlreadyLiked { .. } | LikeError::Contention(_) => {
                ApiError::Conflict("Like state changed concurrently, try again".to_string())
            }
            LikeError::DatabaseError(_) => ApiError::InternalFailure(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Sanitized identity projection. The password hash never leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}
