use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the events service. Nothing is retried; callers decide
/// how to surface it.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid events endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("request to events service failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("events service responded with {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("unexpected response body from events service: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TransportError {
    /// The human-readable message the service attached to an error response.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
