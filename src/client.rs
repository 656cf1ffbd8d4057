//! specgen API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::{Result, SpecgenError};

/// Default service endpoint used when `SPECGEN_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.specgen.dev/v1";
const USER_AGENT: &str = concat!("specgen/", env!("CARGO_PKG_VERSION"));

/// Connection settings for a [`SpecgenClient`].
///
/// Built once per invocation and handed to the client explicitly.
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Base URL of the service.
    pub api_url: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Read settings from the environment.
    ///
    /// Uses `SPECGEN_API_KEY` for authentication and optionally
    /// `SPECGEN_API_URL` for the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `SPECGEN_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("SPECGEN_API_KEY").map_err(|_| {
            SpecgenError::ConfigMissing("SPECGEN_API_KEY environment variable not set".to_string())
        })?;

        let api_url = env::var("SPECGEN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self { api_key, api_url })
    }

    /// Replace the base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Low-level specgen API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, and `Upload` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use specgen::{ClientConfig, SpecgenClient};
///
/// # fn example() -> specgen::Result<()> {
/// let client = SpecgenClient::from_config(&ClientConfig::from_env()?)?;
///
/// // Or configure manually
/// let client = SpecgenClient::new("your-api-key", "https://api.specgen.dev/v1")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SpecgenClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for SpecgenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecgenClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SpecgenClient {
    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_key, &config.api_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(SpecgenError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(SpecgenError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(SpecgenError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(SpecgenError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => {
                let id = response.url().path().to_string();
                Err(SpecgenError::NotFound {
                    entity_type: "resource",
                    id,
                })
            }
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(SpecgenError::Conflict {
                    messages: Self::extract_conflict_messages(&body, status),
                })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                Err(SpecgenError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            _ => {
                let message = Self::extract_error_message(response, status).await;
                Err(SpecgenError::ApiError {
                    message,
                    status_code: Some(status.as_u16()),
                })
            }
        }
    }

    /// Pull the human-readable messages out of a validation failure body.
    ///
    /// Accepts `{"errors": ["..."]}`, `{"errors": [{"message": "..."}]}`,
    /// `{"message": "..."}` or a plain-text body.
    fn extract_conflict_messages(body: &str, status: StatusCode) -> Vec<String> {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
                let messages: Vec<String> = errors
                    .iter()
                    .filter_map(|e| {
                        e.as_str()
                            .or_else(|| e.get("message").and_then(|m| m.as_str()))
                            .map(str::to_string)
                    })
                    .collect();
                if !messages.is_empty() {
                    return messages;
                }
            }
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return vec![msg.to_string()];
            }
        }

        let trimmed = body.trim();
        if trimmed.is_empty() {
            vec![format!("HTTP {status}")]
        } else {
            vec![trimmed.to_string()]
        }
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // Try to parse as JSON and extract message field
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        body
    }
}
