use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostFields, PostFilter};
use tracing::instrument;
use uuid::Uuid;

pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        self.repo.get_posts(filter).await
    }

    #[instrument(skip(self, fields))]
    pub async fn create_post(&self, owner: Uuid, fields: PostFields) -> Result<Post, DomainError> {
        self.repo.create(Post::new(owner, fields)).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update_post(
        &self,
        caller: Uuid,
        post_id: Uuid,
        changes: PostFields,
    ) -> Result<Post, DomainError> {
        let existing = self.get_post(post_id).await?;
        ensure_owner(&existing, caller)?;

        // The row can vanish between the ownership check and the write.
        self.repo
            .update_post(post_id, caller, changes)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, caller: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let existing = self.get_post(post_id).await?;
        ensure_owner(&existing, caller)?;

        if self.repo.delete_post(post_id, caller).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }
}

fn ensure_owner(post: &Post, caller: Uuid) -> Result<(), DomainError> {
    if post.user_id != caller {
        tracing::warn!(post_id = %post.id, caller = %caller, "ownership check failed");
        Err(DomainError::Forbidden)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemoryPostRepository, MemoryUserRepository};
    use crate::data::user_repository::UserRepository;
    use crate::domain::user::User;

    fn service() -> (PostService<MemoryPostRepository>, Arc<MemoryUserRepository>) {
        let users = Arc::new(MemoryUserRepository::default());
        let posts = PostService::new(Arc::new(MemoryPostRepository::new(Arc::clone(&users))));
        (posts, users)
    }

    async fn owner(users: &MemoryUserRepository, email: &str) -> Uuid {
        users
            .create(User::new(email.to_string(), "hash".to_string()))
            .await
            .unwrap()
            .id
    }

    fn hello() -> PostFields {
        PostFields {
            title: Some("Hello".into()),
            description: Some("World".into()),
            image: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_owner_and_show_round_trips() {
        let (posts, users) = service();
        let alice = owner(&users, "alice@example.com").await;

        let created = posts.create_post(alice, hello()).await.unwrap();
        assert_eq!(created.user_id, alice);
        assert_eq!(created.title.as_deref(), Some("Hello"));
        assert_eq!(created.created_at.timestamp_subsec_nanos() % 1_000, 0);

        let shown = posts.get_post(created.id).await.unwrap();
        assert_eq!(shown, created);
    }

    #[tokio::test]
    async fn unknown_owner_is_rejected() {
        let (posts, _) = service();
        let err = posts
            .create_post(Uuid::new_v4(), PostFields::default())
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(errors) => assert_eq!(errors, vec!["User must exist".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(posts.get_posts(PostFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn all_fields_are_optional() {
        let (posts, users) = service();
        let alice = owner(&users, "alice@example.com").await;
        let created = posts.create_post(alice, PostFields::default()).await.unwrap();
        assert!(created.title.is_none() && created.description.is_none() && created.image.is_none());
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let (posts, _) = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            posts.get_post(id).await,
            Err(DomainError::PostNotFound(missing)) if missing == id
        ));
        assert!(matches!(
            posts.delete_post(Uuid::new_v4(), id).await,
            Err(DomainError::PostNotFound(_))
        ));
        assert!(matches!(
            posts.update_post(Uuid::new_v4(), id, hello()).await,
            Err(DomainError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn only_owner_may_update() {
        let (posts, users) = service();
        let alice = owner(&users, "alice@example.com").await;
        let bob = owner(&users, "bob@example.com").await;
        let created = posts.create_post(alice, hello()).await.unwrap();

        let err = posts
            .update_post(bob, created.id, PostFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let updated = posts
            .update_post(
                alice,
                created.id,
                PostFields {
                    title: Some("Hi".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title.as_deref(), Some("Hi"));
        assert_eq!(updated.description.as_deref(), Some("World"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn destroy_as_stranger_is_forbidden_then_owner_succeeds() {
        let (posts, users) = service();
        let alice = owner(&users, "alice@example.com").await;
        let bob = owner(&users, "bob@example.com").await;
        let created = posts.create_post(alice, hello()).await.unwrap();

        assert!(matches!(
            posts.delete_post(bob, created.id).await,
            Err(DomainError::Forbidden)
        ));
        posts.get_post(created.id).await.unwrap();

        posts.delete_post(alice, created.id).await.unwrap();
        assert!(matches!(
            posts.get_post(created.id).await,
            Err(DomainError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_in_creation_order_and_filterable() {
        let (posts, users) = service();
        let alice = owner(&users, "alice@example.com").await;
        let bob = owner(&users, "bob@example.com").await;

        let mut created = Vec::new();
        for author in [alice, bob, alice] {
            // Distinct timestamps, so the order does not fall back to the id.
            std::thread::sleep(std::time::Duration::from_millis(2));
            created.push(posts.create_post(author, hello()).await.unwrap().id);
        }

        let all = posts.get_posts(PostFilter::default()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, created);

        let mine = posts
            .get_posts(PostFilter {
                user_id: Some(alice),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.user_id == alice));

        let page = posts
            .get_posts(PostFilter {
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, created[1]);
    }
}
