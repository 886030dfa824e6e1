use crate::application::auth_service::SignedIn;
use crate::domain::post::{Post, PostFields, PostFilter};
use crate::domain::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ======================= USERS =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Accepts both `{"user": {...}}` form-style bodies and flat ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UserPayload<T> {
    Wrapped { user: T },
    Flat(T),
}

impl<T> UserPayload<T> {
    pub fn into_inner(self) -> T {
        match self {
            UserPayload::Wrapped { user } | UserPayload::Flat(user) => user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String, // "Bearer"
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<SignedIn> for AuthResponse {
    fn from(signed: SignedIn) -> Self {
        Self {
            access_token: signed.token,
            token_type: "Bearer".to_string(),
            expires_in: signed.expires_in,
            user: signed.user.into(),
        }
    }
}

// ======================= POSTS =======================

/// Accepts both `{"post": {...}}` and flat bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PostPayload {
    Wrapped { post: PostFields },
    Flat(PostFields),
}

impl From<PostPayload> for PostFields {
    fn from(payload: PostPayload) -> Self {
        match payload {
            PostPayload::Wrapped { post } | PostPayload::Flat(post) => post,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub user_id: Option<Uuid>,
}

impl From<&ListPostsQuery> for PostFilter {
    fn from(query: &ListPostsQuery) -> Self {
        Self {
            user_id: query.user_id,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<Post>,
    pub limit: Option<u32>,
    pub offset: u32,
}

// ======================= FORMS =======================

/// Describes the form a GUI would render for an action.
#[derive(Debug, Serialize)]
pub struct FormTemplate {
    pub action: &'static str,
    pub method: &'static str,
    pub fields: &'static [&'static str],
}

pub const NEW_POST_FORM: FormTemplate = FormTemplate {
    action: "/posts",
    method: "POST",
    fields: &["title", "description", "image"],
};

pub const SIGN_UP_FORM: FormTemplate = FormTemplate {
    action: "/users",
    method: "POST",
    fields: &["email", "password", "password_confirmation"],
};

pub const SIGN_IN_FORM: FormTemplate = FormTemplate {
    action: "/users/sign_in",
    method: "POST",
    fields: &["email", "password"],
};

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
    pub user: Option<UserResponse>,
}
