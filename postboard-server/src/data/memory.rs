//! In-memory repositories used by the test suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::data::session_repository::SessionRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostFields, PostFilter};
use crate::domain::session::Session;
use crate::domain::user::User;

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::validation("Email has already been taken"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl MemorySessionRepository {
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Pushes every stored session's expiry into the past.
    pub fn expire_all(&self) {
        for session in self.sessions.lock().unwrap().values_mut() {
            session.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.sessions.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_expired(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id || s.is_active(now));
        Ok((before - sessions.len()) as u64)
    }
}

/// Posts keep a handle on the users they belong to, like the `posts.user_id` foreign key.
pub struct MemoryPostRepository {
    users: Arc<MemoryUserRepository>,
    posts: Mutex<Vec<Post>>,
}

impl MemoryPostRepository {
    pub fn new(users: Arc<MemoryUserRepository>) -> Self {
        Self {
            users,
            posts: Mutex::default(),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        if !self.users.users.lock().unwrap().contains_key(&post.user_id) {
            return Err(DomainError::validation("User must exist"));
        }
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_post(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: PostFields,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)
            .map(|post| {
                post.apply(changes);
                post.clone()
            }))
    }

    async fn delete_post(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| !(p.id == id && p.user_id == user_id));
        Ok(posts.len() < before)
    }

    async fn get_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.lock().unwrap();
        let mut selected: Vec<Post> = posts
            .iter()
            .filter(|p| filter.user_id.is_none_or(|owner| p.user_id == owner))
            .cloned()
            .collect();
        selected.sort_by_key(|p| (p.created_at, p.id));

        let skipped = selected.into_iter().skip(filter.effective_offset() as usize);
        Ok(match filter.effective_limit() {
            Some(limit) => skipped.take(limit as usize).collect(),
            None => skipped.collect(),
        })
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn equal_timestamps_are_ordered_by_id() {
        let users = Arc::new(MemoryUserRepository::default());
        let owner = users
            .create(User::new("owner@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let repo = MemoryPostRepository::new(users);

        let first = Post::new(owner.id, PostFields::default());
        let mut twin = Post::new(owner.id, PostFields::default());
        twin.created_at = first.created_at;
        repo.create(first.clone()).await.unwrap();
        repo.create(twin.clone()).await.unwrap();

        let listed: Vec<Uuid> = repo
            .get_posts(PostFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        let mut expected = vec![first.id, twin.id];
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn delete_expired_only_touches_the_given_user() {
        let repo = MemorySessionRepository::default();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        repo.create(Session::new(alice, chrono::Duration::hours(1)).unwrap())
            .await
            .unwrap();
        repo.create(Session::new(bob, chrono::Duration::hours(1)).unwrap())
            .await
            .unwrap();
        repo.expire_all();

        assert_eq!(repo.delete_expired(alice, Utc::now()).await.unwrap(), 1);
        assert_eq!(repo.len(), 1);
    }
}
