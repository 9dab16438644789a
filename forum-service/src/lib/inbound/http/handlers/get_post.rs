use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::create_post::PostData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::PostId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_post(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthenticatedUser>>,
    Path(post_id): Path<String>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let post_id = PostId::from_string(&post_id).map_err(PostError::from)?;
    let mut post = state.post_service.get_post(post_id).await?;

    let viewer = viewer.map(|Extension(user)| user.user_id);
    let status = state.like_service.status(viewer, post_id).await?;
    post.likes = status.count;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        PostData::new(&post, status.liked),
    ))
}
