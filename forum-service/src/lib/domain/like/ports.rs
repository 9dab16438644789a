use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::like::errors::LikeError;
use crate::domain::like::models::LikeStatus;
use crate::domain::like::models::PostLike;
use crate::domain::post::models::PostId;
use crate::domain::user::models::UserId;

/// Port for the like ledger.
#[async_trait]
pub trait LikeServicePort: Send + Sync + 'static {
    /// Flip the caller's like on a post.
    ///
    /// Unliked becomes liked (counter + 1), liked becomes unliked
    /// (counter - 1, never below zero). Every call flips.
    ///
    /// # Errors
    /// * `PostNotFound` - Post does not exist
    /// * `Contention` - Concurrent toggles on the pair did not settle
    /// * `DatabaseError` - Database operation failed
    async fn toggle(&self, user_id: UserId, post_id: PostId) -> Result<LikeStatus, LikeError>;

    /// Read the like state without changing it. Guests (`None`) never like.
    ///
    /// # Errors
    /// * `PostNotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn status(&self, user_id: Option<UserId>, post_id: PostId)
        -> Result<LikeStatus, LikeError>;

    /// Which of `post_ids` the viewer likes, in one lookup. Empty for guests.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn liked_among(
        &self,
        user_id: Option<UserId>,
        post_ids: &[PostId],
    ) -> Result<HashSet<PostId>, LikeError>;
}

/// Record-store primitives for like relations.
///
/// `insert` and `delete` are each atomic: the relation change and the
/// matching counter change commit together or not at all.
#[async_trait]
pub trait LikeRepository: Send + Sync + 'static {
    /// Current engagement counter of a post, `None` if the post does not exist.
    async fn like_count(&self, post_id: PostId) -> Result<Option<u64>, LikeError>;

    /// Whether a relation exists for the pair.
    async fn exists(&self, user_id: UserId, post_id: PostId) -> Result<bool, LikeError>;

    /// Subset of `post_ids` holding a relation with `user_id`.
    async fn liked_post_ids(
        &self,
        user_id: UserId,
        post_ids: &[PostId],
    ) -> Result<HashSet<PostId>, LikeError>;

    /// Insert a relation and increment the counter; returns the new counter.
    ///
    /// # Errors
    /// * `AlreadyLiked` - A relation for the pair already exists (nothing changed)
    /// * `PostNotFound` - Post does not exist
    async fn insert(&self, like: PostLike) -> Result<u64, LikeError>;

    /// Remove the pair's relation and decrement the counter, clamped at zero.
    ///
    /// Returns the new counter, or `None` when no relation existed, in which
    /// case the counter is left untouched.
    async fn delete(&self, user_id: UserId, post_id: PostId) -> Result<Option<u64>, LikeError>;
}
