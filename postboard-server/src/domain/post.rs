use chrono::{DateTime, Utc};

use super::timestamp_now;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user_id: Uuid, fields: PostFields) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: fields.title,
            description: fields.description,
            image: fields.image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites only the fields present in `changes`.
    pub fn apply(&mut self, changes: PostFields) {
        if let Some(title) = changes.title {
            self.title = Some(title);
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(image) = changes.image {
            self.image = Some(image);
        }
        self.updated_at = timestamp_now();
    }
}

/// Writable attributes of a post. `None` means "not supplied".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter {
    pub user_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub const MAX_PAGE_SIZE: u32 = 100;

impl PostFilter {
    pub fn effective_limit(&self) -> Option<u32> {
        self.limit.map(|limit| limit.min(MAX_PAGE_SIZE))
    }

    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}
