//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::SpecgenClient;
use crate::error::Result;
use crate::pagination::{Page, PaginationParams};

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use specgen::{ApplicationListQuery, Application, List, SpecgenClient};
///
/// let client = SpecgenClient::new("token", "https://api.specgen.dev/v1")?;
/// let query = ApplicationListQuery::new("acme");
///
/// // Fetch a single page
/// let page = Application::list_page(&client, &query, 1, 50).await?;
///
/// // Fetch all pages
/// let all = Application::list_all(&client, &query).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Scope and filters for the listing.
    type Query: Default + Send + Sync;

    /// List entities matching the query (single page).
    ///
    /// `page` is 1-indexed; `count` is the number of items per page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &SpecgenClient,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>>;

    /// List all entities matching the query, following pages until the
    /// service reports no more results.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &SpecgenClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut params = PaginationParams::for_page(1, DEFAULT_PAGE_SIZE);

        for _ in 0..MAX_PAGES {
            let page = Self::list_page(client, query, params.page, params.count).await?;
            let next = page.next_params();
            all_items.extend(page.items);

            match next {
                Some(next) => params = next,
                None => return Ok(all_items),
            }
        }

        tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
        Ok(all_items)
    }
}
