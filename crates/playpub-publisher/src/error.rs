//! Publishing API error types

use thiserror::Error;

/// Errors returned by the publishing API client
#[derive(Debug, Error)]
pub enum StoreError {
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Error reported by the publishing API.
    ///
    /// Rendered as `Error <status>: <message>`, the message being the
    /// `error.message` field of Google's error envelope.
    #[error("Error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited { retry_after: Option<u64> },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Result type for publishing API operations
pub type Result<T> = std::result::Result<T, StoreError>;
