use thiserror::Error;

use crate::domain::post::models::PostId;
use crate::domain::user::models::UserId;

/// Top-level error type for like ledger operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LikeError {
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Insert refused by the (user, post) uniqueness constraint.
    #[error("User {user_id} already likes post {post_id}")]
    AlreadyLiked { user_id: UserId, post_id: PostId },

    /// Concurrent toggles on the same pair kept invalidating each other.
    #[error("Too many concurrent toggles on post {0}")]
    Contention(PostId),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
