//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::SpecgenClient;
use crate::error::Result;

/// Fetch a single entity by its identifier.
///
/// # Example
///
/// ```ignore
/// use specgen::{FileSet, GenerationRequest, Get, SpecgenClient};
///
/// let client = SpecgenClient::new("token", "https://api.specgen.dev/v1")?;
/// let request = GenerationRequest::new("acme", "widgets", "1.0.0", "go_models");
/// let files = FileSet::get(&client, request).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The identifier type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &SpecgenClient, id: Self::Id) -> Result<Self>;
}
