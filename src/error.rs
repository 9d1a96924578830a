use std::time::Duration;

use actix_web::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Transport-level failures of an outbound call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Network(String),
}

/// Anything that keeps an upstream call from yielding a usable JSON body.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("API error {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("malformed upstream response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("malformed upstream response: {0}")]
    Shape(&'static str),
}

impl UpstreamError {
    pub fn status(status: u16) -> Self {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        UpstreamError::Status { status, reason }
    }
}

/// Failures of the subscription function, each resolving to one response.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Server configuration error")]
    Configuration,

    #[error("provider rejected subscription with status {status}")]
    Provider { status: u16, message: Option<String> },

    #[error("Server error: {0}")]
    Transport(#[from] FetchError),
}

impl SubscribeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SubscribeError::InvalidBody | SubscribeError::InvalidEmail => StatusCode::BAD_REQUEST,
            SubscribeError::Configuration | SubscribeError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SubscribeError::Provider { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    /// `detail` only ever accompanies our own 500s; provider messages pass
    /// through alone.
    pub fn body(&self) -> Value {
        match self {
            SubscribeError::MethodNotAllowed
            | SubscribeError::InvalidBody
            | SubscribeError::InvalidEmail
            | SubscribeError::Configuration => json!({ "error": self.to_string() }),
            SubscribeError::Provider { message, .. } => json!({
                "error": message.as_deref().unwrap_or("Subscription failed"),
            }),
            SubscribeError::Transport(err) => json!({
                "error": "Server error",
                "detail": err.to_string(),
            }),
        }
    }
}
