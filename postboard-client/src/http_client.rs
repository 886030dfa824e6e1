use std::fs;
use std::path::PathBuf;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::ClientError;
use crate::model::{AuthResponse, Post, PostChanges, PostsResponse};

#[derive(Clone)]
pub struct PostboardClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    token_file: Option<PathBuf>,
}

impl PostboardClient {
    pub fn connect(endpoint: &str) -> Result<Self, ClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token: None,
            token_file: None,
        })
    }

    /// Persists the session token at `path` and picks up one saved earlier.
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(saved) if !saved.trim().is_empty() => self.token = Some(saved.trim().to_string()),
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        self.token_file = Some(path);
        Ok(self)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: String) -> Result<(), ClientError> {
        if let Some(path) = &self.token_file {
            fs::write(path, &token)?;
        }
        self.token = Some(token);
        Ok(())
    }

    fn clear_token(&mut self) -> Result<(), ClientError> {
        self.token = None;
        if let Some(path) = &self.token_file {
            match fs::remove_file(path) {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => return Err(err.into()),
                _ => {}
            }
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(ClientError::from_http_response(resp).await)
        }
    }

    async fn expect_success(resp: Response) -> Result<(), ClientError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::from_http_response(resp).await)
        }
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        password_confirmation: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        let resp = self
            .client
            .post(self.url("/users"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "password_confirmation": password_confirmation,
            }))
            .send()
            .await?;

        let auth: AuthResponse = Self::read_json(resp).await?;
        self.set_token(auth.access_token.clone())?;
        debug!(user_id = %auth.user.id, "registered");
        Ok(auth)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let resp = self
            .client
            .post(self.url("/users/sign_in"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        let auth: AuthResponse = Self::read_json(resp).await?;
        self.set_token(auth.access_token.clone())?;
        debug!(user_id = %auth.user.id, "signed in");
        Ok(auth)
    }

    pub async fn sign_out(&mut self) -> Result<(), ClientError> {
        let req = self.authorized(self.client.delete(self.url("/users/sign_out")));
        let resp = req.send().await?;
        Self::expect_success(resp).await?;
        self.clear_token()
    }

    pub async fn list_posts(
        &self,
        user_id: Option<Uuid>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Post>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(user_id) = user_id {
            query.push(("user_id", user_id.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let req = self.authorized(self.client.get(self.url("/posts")).query(&query));
        let posts: PostsResponse = Self::read_json(req.send().await?).await?;
        Ok(posts.posts)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, ClientError> {
        let req = self.authorized(self.client.get(self.url(&format!("/posts/{id}"))));
        Self::read_json(req.send().await?).await
    }

    pub async fn create_post(&self, post: &PostChanges) -> Result<Post, ClientError> {
        let req = self.authorized(self.client.post(self.url("/posts")).json(post));
        Self::read_json(req.send().await?).await
    }

    pub async fn update_post(&self, id: Uuid, changes: &PostChanges) -> Result<Post, ClientError> {
        let req = self.authorized(
            self.client
                .patch(self.url(&format!("/posts/{id}")))
                .json(changes),
        );
        Self::read_json(req.send().await?).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        let req = self.authorized(self.client.delete(self.url(&format!("/posts/{id}"))));
        Self::expect_success(req.send().await?).await
    }
}
