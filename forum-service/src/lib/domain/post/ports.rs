use async_trait::async_trait;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::user::models::UserId;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Create a post authored by `author_id`, starting with zero likes.
    ///
    /// # Errors
    /// * `AuthorNotFound` - The author's identity no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn create_post(
        &self,
        author_id: UserId,
        author: String,
        command: CreatePostCommand,
    ) -> Result<Post, PostError>;

    /// Retrieve a post by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_post(&self, id: PostId) -> Result<Post, PostError>;

    /// List posts newest first, optionally restricted to one section.
    ///
    /// A blank section means no filter.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_posts(&self, section: Option<String>) -> Result<Vec<Post>, PostError>;
}

/// Repository port for post persistence operations.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// Persist a new post and return it with its assigned identifier.
    ///
    /// # Errors
    /// * `AuthorNotFound` - No user exists for `post.author_id`
    async fn create(&self, post: NewPost) -> Result<Post, PostError>;

    /// Retrieve post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError>;

    /// Posts ordered by creation time, newest first, then by descending ID.
    async fn list(&self, section: Option<String>) -> Result<Vec<Post>, PostError>;
}
