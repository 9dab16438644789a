use chrono::DateTime;
use chrono::Utc;

use crate::domain::post::models::PostId;
use crate::domain::user::models::UserId;

/// The fact that one identity likes one post. At most one exists per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLike {
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

impl PostLike {
    pub fn new(user_id: UserId, post_id: PostId) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

/// Like state of a post as seen by one caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeStatus {
    /// Whether the caller holds a like relation (always false for guests)
    pub liked: bool,
    /// Engagement counter of the post
    pub count: u64,
}
