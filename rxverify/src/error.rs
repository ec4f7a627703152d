use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RxError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Vision error: {0}")]
    Vision(String),

    #[error("Vision unavailable: {0}")]
    VisionUnavailable(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },

    /// The model answered, but not in the agreed JSON shape. The raw text is
    /// carried so handlers can return it for diagnosis instead of a bare 500.
    #[error("LLM contract violation: {message}")]
    LlmContract { message: String, raw_response: String },

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Speech unavailable: {0}")]
    SpeechUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for RxError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RxError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RxError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            RxError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            RxError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            RxError::UrlParse(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            RxError::Registry(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            RxError::Vision(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            RxError::VisionUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            RxError::Llm(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            RxError::LlmUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            RxError::LlmRateLimit { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                format!("LLM rate limit exceeded, retry after {retry_after:?} seconds"),
            ),
            RxError::LlmContract { message, .. } => (StatusCode::BAD_GATEWAY, message.clone()),
            RxError::Speech(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            RxError::SpeechUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            RxError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RxError>;
