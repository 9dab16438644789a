use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::toggle_like::LikeResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::PostId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn like_status(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthenticatedUser>>,
    Path(post_id): Path<String>,
) -> Result<ApiSuccess<LikeResponseData>, ApiError> {
    let post_id = PostId::from_string(&post_id).map_err(PostError::from)?;
    let viewer = viewer.map(|Extension(user)| user.user_id);

    state
        .like_service
        .status(viewer, post_id)
        .await
        .map_err(ApiError::from)
        .map(|status| {
            ApiSuccess::new(
                StatusCode::OK,
                LikeResponseData::new("Like status retrieved", status),
            )
        })
}
