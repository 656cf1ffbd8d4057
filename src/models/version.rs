//! Published specification versions and spec uploads.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::SpecgenClient;
use crate::error::{Result, SpecgenError};
use crate::models::application::ApplicationRef;
use crate::pagination::{ListResponse, Page, PaginationParams};
use crate::traits::{List, Upload};

/// One published version of an application's specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVersion {
    /// Version string (e.g., "1.2.0").
    pub version: String,

    #[serde(default)]
    pub organization: String,

    #[serde(default)]
    pub application: String,

    /// Specification format reported by the service (e.g., "openapi-3.0").
    #[serde(default)]
    pub format: Option<String>,

    /// Whether this is the version `latest` currently resolves to.
    #[serde(default)]
    pub latest: bool,

    /// When the version was published.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Query parameters for listing versions of one application.
#[derive(Debug, Clone, Default)]
pub struct VersionListQuery {
    pub organization: String,
    pub application: String,
}

impl VersionListQuery {
    pub fn new(organization: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            application: application.into(),
        }
    }
}

/// A specification file to publish as a new version.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecUpload {
    /// Version to publish under. When absent the service assigns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// File name of the uploaded spec, used by the service to detect its format.
    pub filename: String,

    /// Raw file contents.
    pub content: String,
}

impl SpecUpload {
    /// Read a spec file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name or cannot be read.
    pub fn from_path(path: &Path, version: Option<String>) -> Result<Self> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SpecgenError::InvalidArgument(format!("not a file: {}", path.display()))
            })?;
        let content = std::fs::read_to_string(path)?;

        Ok(Self {
            version,
            filename,
            content,
        })
    }
}

#[async_trait]
impl List for ApiVersion {
    type Query = VersionListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &SpecgenClient,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        if query.organization.is_empty() || query.application.is_empty() {
            return Err(SpecgenError::InvalidArgument(
                "an organization and application are required to list versions".to_string(),
            ));
        }

        let app = ApplicationRef::new(query.organization.as_str(), query.application.as_str());
        let path = format!("{}/versions", app.path());
        let params = PaginationParams::for_page(page, count);

        let response = client.get_with_query(&path, &params).await?;
        let data: ListResponse<Self> = response.json().await.map_err(SpecgenError::HttpError)?;

        Ok(data.into_page(params))
    }
}

#[async_trait]
impl Upload for ApiVersion {
    type Parent = ApplicationRef;
    type Params = SpecUpload;

    #[tracing::instrument(skip(client, params), fields(filename = %params.filename))]
    async fn upload(
        client: &SpecgenClient,
        parent: ApplicationRef,
        params: SpecUpload,
    ) -> Result<Self> {
        let path = format!("{}/versions", parent.path());

        let response = client.post(&path, &params).await?;
        let version: ApiVersion = response.json().await.map_err(SpecgenError::HttpError)?;
        Ok(version)
    }
}
