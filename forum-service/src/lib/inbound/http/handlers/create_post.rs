use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let Json(body) = payload?;
    let command = CreatePostCommand::new(body.section, body.title, body.content)
        .map_err(PostError::from)?;

    state
        .post_service
        .create_post(caller.user_id, caller.username, command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, PostData::new(post, false)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    section: String,
    title: String,
    content: String,
}

/// Post as seen by one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostData {
    pub id: i64,
    pub author_id: String,
    pub author: String,
    pub section: String,
    pub title: String,
    pub content: String,
    pub likes: u64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

impl PostData {
    pub fn new(post: &Post, is_liked: bool) -> Self {
        Self {
            id: post.id.0,
            author_id: post.author_id.to_string(),
            author: post.author.clone(),
            section: post.section.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            likes: post.likes,
            is_liked,
            created_at: post.created_at,
        }
    }
}
