//! The seam between the sync engine and the remote service.

use async_trait::async_trait;
use thiserror::Error;

use crate::client::SpecgenClient;
use crate::error::SpecgenError;
use crate::models::{FileSet, GenerationRequest};
use crate::traits::Get;

/// Why a generator's output could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The service has no output for this organization, application,
    /// version and generator.
    #[error("no generated output")]
    NotFound,

    /// The service rejected the request; holds its messages.
    #[error("rejected: {}", .0.join("; "))]
    Conflict(Vec<String>),

    /// Any other failure, including transport errors (no status code).
    #[error(
        "service error{}: {message}",
        .status_code.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
    )]
    ServerError {
        status_code: Option<u16>,
        message: String,
    },
}

impl From<SpecgenError> for FetchError {
    fn from(err: SpecgenError) -> Self {
        match err {
            SpecgenError::NotFound { .. } => Self::NotFound,
            SpecgenError::Conflict { messages } => Self::Conflict(messages),
            SpecgenError::ApiError {
                message,
                status_code,
            } => Self::ServerError {
                status_code,
                message,
            },
            SpecgenError::HttpError(e) => Self::ServerError {
                status_code: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            SpecgenError::RateLimited { retry_after_secs } => Self::ServerError {
                status_code: Some(429),
                message: match retry_after_secs {
                    Some(secs) => format!("rate limited, retry after {secs} seconds"),
                    None => "rate limited".to_string(),
                },
            },
            other => Self::ServerError {
                status_code: None,
                message: other.to_string(),
            },
        }
    }
}

/// Source of generated code.
///
/// Implemented by [`SpecgenClient`]; tests substitute in-memory providers.
#[async_trait]
pub trait CodeProvider: Send + Sync {
    /// Fetch the files one generator produces for one application version.
    async fn fetch(&self, request: &GenerationRequest) -> Result<FileSet, FetchError>;
}

#[async_trait]
impl CodeProvider for SpecgenClient {
    async fn fetch(&self, request: &GenerationRequest) -> Result<FileSet, FetchError> {
        FileSet::get(self, request.clone())
            .await
            .map_err(FetchError::from)
    }
}
