//! Error types for the casegen clients

use std::time::Duration;

use thiserror::Error;

/// Result type alias for orchestrator client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the orchestrator API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Gave up waiting for a job to finish
    #[error("Timed out after {0:?} waiting for job {1}")]
    WaitTimeout(Duration, String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create an API error from a response body
    ///
    /// The orchestrator answers errors with `{"error": "..."}`; other bodies
    /// are kept verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string());
        Self::api_error(status, message)
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }
}

/// Errors from the generation backend
///
/// The orchestrator never surfaces these to callers; every variant is
/// absorbed into fallback output.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Backend answered with a non-success status or `success: false`
    #[error("Generation backend error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    /// The call did not finish within the budget
    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    /// Transport failure before a response arrived
    #[error("Generation request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    /// Response body was unusable
    #[error("Failed to parse generation response: {0}")]
    ParseError(String),
}
