//! Error types for specgen operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the code-generation service or
/// handling local project files.
#[derive(Debug, Error)]
pub enum SpecgenError {
    /// Client configuration is missing or incomplete.
    #[error("specgen configuration required: {0}")]
    ConfigMissing(String),

    /// The project configuration file does not exist.
    #[error("project configuration not found at {}", .0.display())]
    ProjectConfigNotFound(PathBuf),

    /// The project configuration file could not be parsed.
    #[error("invalid project configuration {}: {source}", path.display())]
    ProjectConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A command argument was rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The service rejected the request as invalid or conflicting.
    #[error("request rejected: {}", messages.join("; "))]
    Conflict { messages: Vec<String> },

    /// API request failed.
    #[error("specgen API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Local filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

/// Result type alias for specgen operations.
pub type Result<T> = core::result::Result<T, SpecgenError>;
