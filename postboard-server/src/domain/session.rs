use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::error::DomainError;
use super::timestamp_now;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, ttl: Duration) -> Result<Self, DomainError> {
        let now = timestamp_now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::Internal(format!("session ttl out of range: {ttl}")))?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            expires_at,
        })
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
