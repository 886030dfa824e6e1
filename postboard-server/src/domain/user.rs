use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timestamp_now;

pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 128;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Emails are compared trimmed and case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Collects every sign-up rule the credentials break.
pub fn registration_errors(
    email: &str,
    password: &str,
    password_confirmation: Option<&str>,
) -> Vec<String> {
    let mut errors = Vec::new();

    if email.is_empty() {
        errors.push("Email can't be blank".to_string());
    } else if !is_valid_email(email) {
        errors.push("Email is invalid".to_string());
    }

    let len = password.chars().count();
    if len == 0 {
        errors.push("Password can't be blank".to_string());
    } else if len < PASSWORD_MIN_LEN {
        errors.push(format!(
            "Password is too short (minimum is {PASSWORD_MIN_LEN} characters)"
        ));
    } else if len > PASSWORD_MAX_LEN {
        errors.push(format!(
            "Password is too long (maximum is {PASSWORD_MAX_LEN} characters)"
        ));
    }

    if let Some(confirmation) = password_confirmation {
        if confirmation != password {
            errors.push("Password confirmation doesn't match Password".to_string());
        }
    }

    errors
}
