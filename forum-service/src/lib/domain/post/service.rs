use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::models::UserId;

pub struct PostService<PR>
where
    PR: PostRepository,
{
    repository: Arc<PR>,
}

impl<PR> PostService<PR>
where
    PR: PostRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<PR> PostServicePort for PostService<PR>
where
    PR: PostRepository,
{
    async fn create_post(
        &self,
        author_id: UserId,
        author: String,
        command: CreatePostCommand,
    ) -> Result<Post, PostError> {
        let post = self
            .repository
            .create(NewPost {
                author_id,
                author,
                section: command.section,
                title: command.title,
                content: command.content,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");

        Ok(post)
    }

    async fn get_post(&self, id: PostId) -> Result<Post, PostError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id))
    }

    async fn list_posts(&self, section: Option<String>) -> Result<Vec<Post>, PostError> {
        let section = section
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        self.repository.list(section).await
    }
}
