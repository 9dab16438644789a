use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::like::errors::LikeError;
use crate::domain::like::models::PostLike;
use crate::domain::like::ports::LikeRepository;
use crate::domain::post::models::PostId;
use crate::domain::user::models::UserId;

/// Like ledger on PostgreSQL.
///
/// `post_likes` has a composite primary key on `(user_id, post_id)`, so a
/// second insert for a pair fails instead of duplicating. Each counter
/// update runs in the same transaction as the relation change it reflects
/// and is written as `likes = likes ± 1` so no stale read is ever written
/// back. `user_id` carries no foreign key: token claims are trusted as-is.
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> LikeError {
    LikeError::DatabaseError(e.to_string())
}

fn counter_value(likes: i64) -> u64 {
    u64::try_from(likes).unwrap_or(0)
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn like_count(&self, post_id: PostId) -> Result<Option<u64>, LikeError> {
        let row = sqlx::query("SELECT likes FROM posts WHERE id = $1")
            .bind(post_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.map(|r| r.try_get::<i64, _>("likes").map(counter_value))
            .transpose()
            .map_err(database_error)
    }

    async fn exists(&self, user_id: UserId, post_id: PostId) -> Result<bool, LikeError> {
        let row = sqlx::query("SELECT 1 FROM post_likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id.0)
            .bind(post_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(row.is_some())
    }

    async fn liked_post_ids(
        &self,
        user_id: UserId,
        post_ids: &[PostId],
    ) -> Result<HashSet<PostId>, LikeError> {
        let ids: Vec<i64> = post_ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query("SELECT post_id FROM post_likes WHERE user_id = $1 AND post_id = ANY($2)")
            .bind(user_id.0)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        rows.iter()
            .map(|row| row.try_get::<i64, _>("post_id").map(PostId))
            .collect::<Result<HashSet<_>, _>>()
            .map_err(database_error)
    }

    async fn insert(&self, like: PostLike) -> Result<u64, LikeError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO post_likes (user_id, post_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(like.user_id.0)
        .bind(like.post_id.0)
        .bind(like.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return LikeError::AlreadyLiked {
                        user_id: like.user_id,
                        post_id: like.post_id,
                    };
                }
                if db_err.is_foreign_key_violation()
                    && db_err.constraint() == Some("post_likes_post_id_fkey")
                {
                    return LikeError::PostNotFound(like.post_id);
                }
            }
            database_error(e)
        })?;

        let row = sqlx::query("UPDATE posts SET likes = likes + 1 WHERE id = $1 RETURNING likes")
            .bind(like.post_id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?
            .ok_or(LikeError::PostNotFound(like.post_id))?;

        let likes: i64 = row.try_get("likes").map_err(database_error)?;
        tx.commit().await.map_err(database_error)?;

        Ok(counter_value(likes))
    }

    async fn delete(&self, user_id: UserId, post_id: PostId) -> Result<Option<u64>, LikeError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let deleted = sqlx::query("DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id.0)
            .bind(post_id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await.map_err(database_error)?;
            return Ok(None);
        }

        let row = sqlx::query(
            "UPDATE posts SET likes = GREATEST(likes - 1, 0) WHERE id = $1 RETURNING likes",
        )
        .bind(post_id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?
        .ok_or(LikeError::PostNotFound(post_id))?;

        let likes: i64 = row.try_get("likes").map_err(database_error)?;
        tx.commit().await.map_err(database_error)?;

        Ok(Some(counter_value(likes)))
    }
}
