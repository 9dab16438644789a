use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::UserId;

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_post(row: &PgRow) -> Result<Post, sqlx::Error> {
        let likes: i64 = row.try_get("likes")?;

        Ok(Post {
            id: PostId(row.try_get("id")?),
            author_id: UserId(row.try_get("author_id")?),
            author: row.try_get("author")?,
            section: row.try_get("section")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            likes: u64::try_from(likes).unwrap_or(0),
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, PostError> {
        let row = sqlx::query(
            r#"
            INSERT INTO posts (author_id, author, section, title, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, author_id, author, section, title, content, likes, created_at
            "#,
        )
        .bind(post.author_id.0)
        .bind(&post.author)
        .bind(&post.section)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation()
                    && db_err.constraint() == Some("posts_author_id_fkey")
                {
                    return PostError::AuthorNotFound(post.author_id);
                }
            }
            PostError::DatabaseError(e.to_string())
        })?;

        Self::row_to_post(&row).map_err(|e| PostError::DatabaseError(e.to_string()))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError> {
        let row = sqlx::query(
            r#"
            SELECT id, author_id, author, section, title, content, likes, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PostError::DatabaseError(e.to_string()))?;

        row.as_ref()
            .map(Self::row_to_post)
            .transpose()
            .map_err(|e| PostError::DatabaseError(e.to_string()))
    }

    async fn list(&self, section: Option<String>) -> Result<Vec<Post>, PostError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author_id, author, section, title, content, likes, created_at
            FROM posts
            WHERE $1::TEXT IS NULL OR section = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(section)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PostError::DatabaseError(e.to_string()))?;

        rows.iter()
            .map(Self::row_to_post)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PostError::DatabaseError(e.to_string()))
    }
}
