use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::{debug, info, instrument, warn};

use crate::data::session_repository::SessionRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::session::Session;
use crate::domain::{error::DomainError, user::User};
use crate::domain::user::{normalize_email, registration_errors};
use crate::infrastructure::security::{SessionKeys, hash_password, verify_password};

/// Checked when the email is unknown so both failures cost one argon2 run.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("postboard-dummy-password").ok());

/// A freshly opened session together with its bearer token.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

pub struct AuthService<U: UserRepository + 'static, S: SessionRepository + 'static> {
    users: Arc<U>,
    sessions: Arc<S>,
    keys: SessionKeys,
}

impl<U, S> AuthService<U, S>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    pub fn new(users: Arc<U>, sessions: Arc<S>, keys: SessionKeys) -> Self {
        Self {
            users,
            sessions,
            keys,
        }
    }

    /// Creates the account and signs it in.
    #[instrument(skip(self, password, password_confirmation))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        password_confirmation: Option<&str>,
    ) -> Result<SignedIn, DomainError> {
        let email = normalize_email(email);
        let mut errors = registration_errors(&email, password, password_confirmation);
        if errors.is_empty() && self.users.find_by_email(&email).await?.is_some() {
            errors.push("Email has already been taken".to_string());
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self.users.create(User::new(email, hash)).await?;
        info!(user_id = %user.id, "user registered");

        self.open_session(user).await
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, DomainError> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(DomainError::Unauthorized);
        };

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            warn!(user_id = %user.id, "password mismatch");
            return Err(DomainError::Unauthorized);
        }

        self.open_session(user).await
    }

    /// Revokes the session behind `token`. Unknown or invalid tokens are ignored.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, token: &str) -> Result<(), DomainError> {
        let Ok(claims) = self.keys.verify(token) else {
            debug!("sign out with unverifiable token");
            return Ok(());
        };
        if self.sessions.delete(claims.sid).await? {
            info!(user_id = %claims.sub, session_id = %claims.sid, "signed out");
        }
        Ok(())
    }

    /// Resolves the caller behind a session token, if it is still valid.
    pub async fn current_user(&self, token: &str) -> Result<Option<User>, DomainError> {
        let Ok(claims) = self.keys.verify(token) else {
            return Ok(None);
        };
        let Some(session) = self.sessions.find_by_id(claims.sid).await? else {
            return Ok(None);
        };
        if session.user_id != claims.sub || !session.is_active(Utc::now()) {
            return Ok(None);
        }
        self.users.find_by_id(session.user_id).await
    }

    async fn open_session(&self, user: User) -> Result<SignedIn, DomainError> {
        let purged = self.sessions.delete_expired(user.id, Utc::now()).await?;
        if purged > 0 {
            debug!(user_id = %user.id, purged, "expired sessions removed");
        }

        let session = self
            .sessions
            .create(Session::new(user.id, self.keys.ttl())?)
            .await?;
        let token = self
            .keys
            .issue(&session)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        info!(user_id = %user.id, session_id = %session.id, "session opened");

        Ok(SignedIn {
            user,
            token,
            expires_in: self.keys.ttl().num_seconds(),
        })
    }
}
