use crate::domain::error::DomainError;
use crate::domain::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> Result<Session, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Removes the user's sessions that expired before `now`.
    async fn delete_expired(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, DomainError>;
}

#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create session: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        debug!(session_id = %session.id, user_id = %session.user_id, "session stored");
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find session {}: {}", id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(deleted.rows_affected() > 0)
    }

    async fn delete_expired(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= $2")
            .bind(user_id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to purge sessions of {}: {}", user_id, e);
                DomainError::Internal(format!("database error: {}", e))
            })?;

        Ok(deleted.rows_affected())
    }
}
