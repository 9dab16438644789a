use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::post::errors::PostContentError;
use crate::domain::post::errors::PostIdError;
use crate::domain::user::models::UserId;

/// Forum post.
///
/// `likes` is the engagement counter: a denormalized copy of the number of
/// like relations pointing at this post, only ever changed by the ledger.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub author: String,
    pub section: String,
    pub title: String,
    pub content: String,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

/// Post identifier, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(pub i64);

impl PostId {
    /// Parse a post ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a positive integer
    pub fn from_string(s: &str) -> Result<Self, PostIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(PostIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated post data, not yet stored.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub author: String,
    pub section: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Command to create a post.
#[derive(Debug)]
pub struct CreatePostCommand {
    pub section: String,
    pub title: String,
    pub content: String,
}

impl CreatePostCommand {
    const MAX_TITLE_LENGTH: usize = 200;

    /// Validate raw post fields. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// * `EmptyTitle` / `TitleTooLong` - Title outside 1-200 characters
    /// * `EmptyContent` - Content is blank
    pub fn new(section: String, title: String, content: String) -> Result<Self, PostContentError> {
        let title = title.trim().to_string();
        let content = content.trim().to_string();

        if title.is_empty() {
            return Err(PostContentError::EmptyTitle);
        }
        let title_length = title.chars().count();
        if title_length > Self::MAX_TITLE_LENGTH {
            return Err(PostContentError::TitleTooLong {
                max: Self::MAX_TITLE_LENGTH,
                actual: title_length,
            });
        }
        if content.is_empty() {
            return Err(PostContentError::EmptyContent);
        }

        Ok(Self {
            section: section.trim().to_string(),
            title,
            content,
        })
    }
}
