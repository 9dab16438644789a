use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::like::errors::LikeError;
use crate::domain::like::models::LikeStatus;
use crate::domain::like::models::PostLike;
use crate::domain::like::ports::LikeRepository;
use crate::domain::like::ports::LikeServicePort;
use crate::domain::post::models::PostId;
use crate::domain::user::models::UserId;

/// Attempts before a toggle that keeps losing races gives up.
const MAX_TOGGLE_ATTEMPTS: usize = 8;

/// Like ledger service.
///
/// Holds no locks of its own. Consistency comes from the repository: the
/// relation insert is insert-or-fail, and the counter only moves inside the
/// same atomic step that changed a relation. A toggle whose read of the pair
/// was overtaken by a concurrent toggle re-reads and tries again, so
/// concurrent toggles on one pair behave as if run one after another.
pub struct LikeService<LR>
where
    LR: LikeRepository,
{
    repository: Arc<LR>,
}

impl<LR> LikeService<LR>
where
    LR: LikeRepository,
{
    pub fn new(repository: Arc<LR>) -> Self {
        Self { repository }
    }

    async fn ensure_post_exists(&self, post_id: PostId) -> Result<u64, LikeError> {
        self.repository
            .like_count(post_id)
            .await?
            .ok_or(LikeError::PostNotFound(post_id))
    }
}

#[async_trait]
impl<LR> LikeServicePort for LikeService<LR>
where
    LR: LikeRepository,
{
    async fn toggle(&self, user_id: UserId, post_id: PostId) -> Result<LikeStatus, LikeError> {
        self.ensure_post_exists(post_id).await?;

        for attempt in 1..=MAX_TOGGLE_ATTEMPTS {
            if self.repository.exists(user_id, post_id).await? {
                if let Some(count) = self.repository.delete(user_id, post_id).await? {
                    tracing::debug!(%user_id, %post_id, count, "Post unliked");
                    return Ok(LikeStatus {
                        liked: false,
                        count,
                    });
                }
            } else {
                match self
                    .repository
                    .insert(PostLike::new(user_id, post_id))
                    .await
                {
                    Ok(count) => {
                        tracing::debug!(%user_id, %post_id, count, "Post liked");
                        return Ok(LikeStatus { liked: true, count });
                    }
                    Err(LikeError::AlreadyLiked { .. }) => {}
                    Err(e) => return Err(e),
                }
            }

            tracing::debug!(
                %user_id,
                %post_id,
                attempt,
                "Like relation changed concurrently, retrying toggle"
            );
        }

        tracing::warn!(%user_id, %post_id, "Like toggle gave up after repeated conflicts");
        Err(LikeError::Contention(post_id))
    }

    async fn status(
        &self,
        user_id: Option<UserId>,
        post_id: PostId,
    ) -> Result<LikeStatus, LikeError> {
        let count = self.ensure_post_exists(post_id).await?;

        let liked = match user_id {
            Some(user_id) => self.repository.exists(user_id, post_id).await?,
            None => false,
        };

        Ok(LikeStatus { liked, count })
    }

    async fn liked_among(
        &self,
        user_id: Option<UserId>,
        post_ids: &[PostId],
    ) -> Result<HashSet<PostId>, LikeError> {
        match user_id {
            Some(user_id) if !post_ids.is_empty() => {
                self.repository.liked_post_ids(user_id, post_ids).await
            }
            _ => Ok(HashSet::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::Sequence;

    use super::*;

    mock! {
        pub TestLikeRepository {}

        #[async_trait]
        impl LikeRepository for TestLikeRepository {
            async fn like_count(&self, post_id: PostId) -> Result<Option<u64>, LikeError>;
            async fn exists(&self, user_id: UserId, post_id: PostId) -> Result<bool, LikeError>;
            async fn liked_post_ids(&self, user_id: UserId, post_ids: &[PostId]) -> Result<HashSet<PostId>, LikeError>;
            async fn insert(&self, like: PostLike) -> Result<u64, LikeError>;
            async fn delete(&self, user_id: UserId, post_id: PostId) -> Result<Option<u64>, LikeError>;
        }
    }

    #[tokio::test]
    async fn test_toggle_unliked_inserts() {
        let mut repository = MockTestLikeRepository::new();
        let user_id = UserId::new();

        repository
            .expect_like_count()
            .returning(|_| Ok(Some(3)));
        repository.expect_exists().times(1).returning(|_, _| Ok(false));
        repository
            .expect_insert()
            .withf(move |like| like.user_id == user_id && like.post_id == PostId(7))
            .times(1)
            .returning(|_| Ok(4));
        repository.expect_delete().times(0);

        let service = LikeService::new(Arc::new(repository));
        let status = service.toggle(user_id, PostId(7)).await.unwrap();

        assert_eq!(
            status,
            LikeStatus {
                liked: true,
                count: 4
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_liked_deletes() {
        let mut repository = MockTestLikeRepository::new();

        repository
            .expect_like_count()
            .returning(|_| Ok(Some(4)));
        repository.expect_exists().times(1).returning(|_, _| Ok(true));
        repository
            .expect_delete()
            .times(1)
            .returning(|_, _| Ok(Some(3)));
        repository.expect_insert().times(0);

        let service = LikeService::new(Arc::new(repository));
        let status = service.toggle(UserId::new(), PostId(7)).await.unwrap();

        assert_eq!(
            status,
            LikeStatus {
                liked: false,
                count: 3
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_missing_post() {
        let mut repository = MockTestLikeRepository::new();

        repository.expect_like_count().returning(|_| Ok(None));
        repository.expect_exists().times(0);

        let service = LikeService::new(Arc::new(repository));
        let result = service.toggle(UserId::new(), PostId(99)).await;

        assert_eq!(result, Err(LikeError::PostNotFound(PostId(99))));
    }

    #[tokio::test]
    async fn test_toggle_retries_when_insert_loses_race() {
        let mut repository = MockTestLikeRepository::new();
        let mut sequence = Sequence::new();
        let user_id = UserId::new();

        repository
            .expect_like_count()
            .returning(|_| Ok(Some(0)));
        repository
            .expect_exists()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(false));
        repository
            .expect_insert()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(move |like| {
                Err(LikeError::AlreadyLiked {
                    user_id: like.user_id,
                    post_id: like.post_id,
                })
            });
        repository
            .expect_exists()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(true));
        repository
            .expect_delete()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(Some(0)));

        let service = LikeService::new(Arc::new(repository));
        let status = service.toggle(user_id, PostId(1)).await.unwrap();

        assert_eq!(
            status,
            LikeStatus {
                liked: false,
                count: 0
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_retries_when_delete_finds_nothing() {
        let mut repository = MockTestLikeRepository::new();
        let mut sequence = Sequence::new();

        repository
            .expect_like_count()
            .returning(|_| Ok(Some(1)));
        repository
            .expect_exists()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(true));
        repository
            .expect_delete()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(None));
        repository
            .expect_exists()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(false));
        repository
            .expect_insert()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(1));

        let service = LikeService::new(Arc::new(repository));
        let status = service.toggle(UserId::new(), PostId(1)).await.unwrap();

        assert_eq!(status, LikeStatus { liked: true, count: 1 });
    }

    #[tokio::test]
    async fn test_toggle_gives_up_under_endless_contention() {
        let mut repository = MockTestLikeRepository::new();

        repository
            .expect_like_count()
            .returning(|_| Ok(Some(1)));
        repository
            .expect_exists()
            .times(MAX_TOGGLE_ATTEMPTS)
            .returning(|_, _| Ok(true));
        repository
            .expect_delete()
            .times(MAX_TOGGLE_ATTEMPTS)
            .returning(|_, _| Ok(None));

        let service = LikeService::new(Arc::new(repository));
        let result = service.toggle(UserId::new(), PostId(5)).await;

        assert_eq!(result, Err(LikeError::Contention(PostId(5))));
    }

    #[tokio::test]
    async fn test_status_for_guest_never_liked() {
        let mut repository = MockTestLikeRepository::new();

        repository.expect_like_count().returning(|_| Ok(Some(12)));
        repository.expect_exists().times(0);

        let service = LikeService::new(Arc::new(repository));
        let status = service.status(None, PostId(3)).await.unwrap();

        assert_eq!(
            status,
            LikeStatus {
                liked: false,
                count: 12
            }
        );
    }

    #[tokio::test]
    async fn test_status_for_user() {
        let mut repository = MockTestLikeRepository::new();

        repository.expect_like_count().returning(|_| Ok(Some(1)));
        repository.expect_exists().times(1).returning(|_, _| Ok(true));

        let service = LikeService::new(Arc::new(repository));
        let status = service.status(Some(UserId::new()), PostId(3)).await.unwrap();

        assert_eq!(status, LikeStatus { liked: true, count: 1 });
    }

    #[tokio::test]
    async fn test_liked_among_skips_lookup_for_guests() {
        let mut repository = MockTestLikeRepository::new();
        repository.expect_liked_post_ids().times(0);

        let service = LikeService::new(Arc::new(repository));

        let guest = service.liked_among(None, &[PostId(1), PostId(2)]).await;
        let nothing_listed = service.liked_among(Some(UserId::new()), &[]).await;

        assert_eq!(guest, Ok(HashSet::new()));
        assert_eq!(nothing_listed, Ok(HashSet::new()));
    }

    #[tokio::test]
    async fn test_liked_among_batches_viewer_lookup() {
        let mut repository = MockTestLikeRepository::new();
        let viewer = UserId::new();

        repository
            .expect_liked_post_ids()
            .withf(move |user_id, post_ids| {
                *user_id == viewer && post_ids.to_vec() == vec![PostId(1), PostId(2), PostId(3)]
            })
            .times(1)
            .returning(|_, _| Ok(HashSet::from([PostId(2)])));

        let service = LikeService::new(Arc::new(repository));
        let liked = service
            .liked_among(Some(viewer), &[PostId(1), PostId(2), PostId(3)])
            .await
            .unwrap();

        assert_eq!(liked, HashSet::from([PostId(2)]));
    }
}
