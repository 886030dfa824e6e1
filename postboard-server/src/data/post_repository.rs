use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostFields, PostFilter};
use async_trait::async_trait;
use crate::domain::timestamp_now;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Applies `changes` only if `user_id` owns the post.
    async fn update_post(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: PostFields,
    ) -> Result<Option<Post>, DomainError>;
    /// Returns whether a post owned by `user_id` was removed.
    async fn delete_post(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;
    async fn get_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let stored = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, user_id, title, description, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, title, description, image, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.image)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("posts_user_id_fkey"))
                == Some(true)
            {
                DomainError::validation("User must exist")
            } else {
                error!("failed to create post: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            }
        })?;

        info!(post_id = %stored.id, user_id = %stored.user_id, "post created");
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, title, description, image, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update_post(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: PostFields,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                image = COALESCE($3, image),
                updated_at = $4
            WHERE id = $5 AND user_id = $6
            RETURNING id, user_id, title, description, image, created_at, updated_at
            "#,
        )
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.image)
        .bind(timestamp_now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete_post(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() > 0 {
            info!(post_id = %id, "post deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }

    async fn get_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        // LIMIT NULL means no limit in PostgreSQL.
        let limit = filter.effective_limit().map(i64::from);
        let offset = i64::from(filter.effective_offset());

        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, title, description, image, created_at, updated_at
            FROM posts
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
