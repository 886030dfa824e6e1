use reqwest::StatusCode;
use thiserror::Error;

use crate::model::ErrorBody;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Token file error: {0}")]
    TokenFile(#[from] std::io::Error),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Not found")]
    NotFound,
    #[error("Invalid request: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ClientError {
    pub(crate) async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Self::from_status(status, &body)
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::UNPROCESSABLE_ENTITY => {
                let messages = parsed
                    .as_ref()
                    .and_then(|b| b.details.as_ref())
                    .and_then(|d| serde_json::from_value::<Vec<String>>(d.clone()).ok())
                    .or_else(|| parsed.as_ref().map(|b| vec![b.error.clone()]))
                    .unwrap_or_default();
                ClientError::Validation(messages)
            }
            other => ClientError::Status {
                status: other.as_u16(),
                message: parsed.map(|b| b.error).unwrap_or_else(|| body.to_string()),
            },
        }
    }
}
