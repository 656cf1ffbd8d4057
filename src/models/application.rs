//! Application model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::SpecgenClient;
use crate::error::{Result, SpecgenError};
use crate::pagination::{ListResponse, Page, PaginationParams};
use crate::traits::List;

/// An application: one API whose specification is published in versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// URL-safe key, unique within the organization (e.g., "widgets").
    pub key: String,

    /// Display name.
    pub name: String,

    /// Key of the owning organization.
    #[serde(default)]
    pub organization: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Most recently published version, if any.
    #[serde(default)]
    pub latest_version: Option<String>,

    /// When the application was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Identifies one application within an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationRef {
    pub organization: String,
    pub application: String,
}

impl ApplicationRef {
    pub fn new(organization: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            application: application.into(),
        }
    }

    /// Service path of this application, with each segment percent-encoded.
    pub(crate) fn path(&self) -> String {
        format!(
            "organizations/{}/applications/{}",
            urlencoding::encode(&self.organization),
            urlencoding::encode(&self.application)
        )
    }
}

impl std::fmt::Display for ApplicationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organization, self.application)
    }
}

/// Query parameters for listing applications.
#[derive(Debug, Clone, Default)]
pub struct ApplicationListQuery {
    /// Organization whose applications are listed (required).
    pub organization: String,
}

impl ApplicationListQuery {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }
}

#[async_trait]
impl List for Application {
    type Query = ApplicationListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &SpecgenClient,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        if query.organization.is_empty() {
            return Err(SpecgenError::InvalidArgument(
                "an organization is required to list applications".to_string(),
            ));
        }

        let path = format!(
            "organizations/{}/applications",
            urlencoding::encode(&query.organization)
        );
        let params = PaginationParams::for_page(page, count);

        let response = client.get_with_query(&path, &params).await?;
        let data: ListResponse<Self> = response.json().await.map_err(SpecgenError::HttpError)?;

        Ok(data.into_page(params))
    }
}
