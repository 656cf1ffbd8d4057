//! Upload trait for publishing new content to the service.

use async_trait::async_trait;

use crate::client::SpecgenClient;
use crate::error::Result;

/// Create an entity on the service from local content.
///
/// # Example
///
/// ```ignore
/// use specgen::{ApiVersion, ApplicationRef, SpecUpload, SpecgenClient, Upload};
///
/// let client = SpecgenClient::new("token", "https://api.specgen.dev/v1")?;
/// let upload = SpecUpload::from_path("openapi.yaml".as_ref(), Some("1.2.0".into()))?;
/// let version = ApiVersion::upload(&client, ApplicationRef::new("acme", "widgets"), upload).await?;
/// ```
#[async_trait]
pub trait Upload: Sized {
    /// Where the new entity is created.
    type Parent: Send;

    /// Content of the upload.
    type Params: Send;

    /// Upload and return the entity the service created.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpecgenError::Conflict`] when the service rejects the
    /// content, or another error if the request fails.
    async fn upload(
        client: &SpecgenClient,
        parent: Self::Parent,
        params: Self::Params,
    ) -> Result<Self>;
}
