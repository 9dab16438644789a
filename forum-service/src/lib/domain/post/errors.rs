use thiserror::Error;

use crate::domain::post::models::PostId;
use crate::domain::user::models::UserId;

/// Error type for PostId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostIdError {
    #[error("Invalid post ID: {0}")]
    InvalidFormat(String),
}

/// Error type for post content validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostContentError {
    #[error("Title is empty")]
    EmptyTitle,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TitleTooLong { max: usize, actual: usize },

    #[error("Content is empty")]
    EmptyContent,
}

/// Top-level error type for all post-related operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid post ID: {0}")]
    InvalidPostId(#[from] PostIdError),

    #[error("Invalid post: {0}")]
    InvalidContent(#[from] PostContentError),

    #[error("Post not found: {0}")]
    NotFound(PostId),

    /// The author's identity no longer exists, though their token still validates.
    #[error("Author not found: {0}")]
    AuthorNotFound(UserId),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
