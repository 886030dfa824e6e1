use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("invalid email or password")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("not found: {0}")]
    MalformedId(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(vec![message.into()])
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::PostNotFound(_) | DomainError::MalformedId(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            DomainError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let details = match self {
            DomainError::Validation(errors) => Some(json!(errors)),
            DomainError::PostNotFound(resource) => Some(json!({ "resource": resource })),
            DomainError::Forbidden => {
                Some(json!({ "message": "only the owner may modify this post" }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_kinds_to_status_codes() {
        assert_eq!(
            DomainError::validation("bad").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(DomainError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(DomainError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            DomainError::PostNotFound(Uuid::new_v4()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn internal_details_are_not_leaked() {
        let response = DomainError::Internal("password=hunter2".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("internal server error"));
    }

    #[actix_web::test]
    async fn validation_messages_are_listed() {
        let response =
            DomainError::Validation(vec!["Email is invalid".into()]).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["details"][0], "Email is invalid");
    }
}
