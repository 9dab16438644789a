use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::like::models::LikeStatus;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::PostId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<ApiSuccess<LikeResponseData>, ApiError> {
    let post_id = PostId::from_string(&post_id).map_err(PostError::from)?;
    let status = state.like_service.toggle(caller.user_id, post_id).await?;

    let message = if status.liked {
        "Post liked successfully"
    } else {
        "Post unliked successfully"
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LikeResponseData::new(message, status),
    ))
}

/// `{message, liked, count}`, shared by toggle and status reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeResponseData {
    pub message: String,
    pub liked: bool,
    pub count: u64,
}

impl LikeResponseData {
    pub fn new(message: &str, status: LikeStatus) -> Self {
        Self {
            message: message.to_string(),
            liked: status.liked,
            count: status.count,
        }
    }
}
