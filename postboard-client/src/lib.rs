//! Typed async client for the Postboard HTTP API.

mod error;
mod http_client;
mod model;

pub use error::ClientError;
pub use http_client::PostboardClient;
pub use model::{AuthResponse, Post, PostChanges, User};
