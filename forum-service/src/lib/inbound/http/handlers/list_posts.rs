use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::create_post::PostData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::models::PostId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsParams {
    section: Option<String>,
}

/// Newest posts first, optionally narrowed to one section.
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthenticatedUser>>,
    Query(params): Query<ListPostsParams>,
) -> Result<ApiSuccess<Vec<PostData>>, ApiError> {
    let posts = state.post_service.list_posts(params.section).await?;

    let viewer = viewer.map(|Extension(user)| user.user_id);
    let ids: Vec<PostId> = posts.iter().map(|post| post.id).collect();
    let liked = state.like_service.liked_among(viewer, &ids).await?;

    let data = posts
        .iter()
        .map(|post| PostData::new(post, liked.contains(&post.id)))
        .collect();

    Ok(ApiSuccess::new(StatusCode::OK, data))
}
