//! Organization model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::SpecgenClient;
use crate::error::{Result, SpecgenError};
use crate::pagination::{ListResponse, Page, PaginationParams};
use crate::traits::List;

/// An organization on the code-generation service.
///
/// Organizations own applications, which in turn own published
/// specification versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// URL-safe key (e.g., "acme").
    pub key: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// When the organization was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Query parameters for listing organizations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationListQuery {}

#[async_trait]
impl List for Organization {
    type Query = OrganizationListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &SpecgenClient,
        _query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        let params = PaginationParams::for_page(page, count);

        let response = client.get_with_query("organizations", &params).await?;
        let data: ListResponse<Self> = response.json().await.map_err(SpecgenError::HttpError)?;

        Ok(data.into_page(params))
    }
}
