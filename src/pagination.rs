//! Paging for the service's list endpoints.
//!
//! Every list endpoint takes `page` (1-indexed) and `count` query parameters
//! and answers with its items under the collection name, plus a `total` when
//! the service knows it:
//!
//! ```json
//! { "organizations": [{ "key": "acme", "name": "Acme Corp" }], "total": 42 }
//! ```

use serde::{Deserialize, Serialize};

/// The `page` and `count` query parameters of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationParams {
    /// Page number, starting at 1.
    pub page: u32,
    /// Items per page.
    pub count: u32,
}

impl PaginationParams {
    /// Parameters for `page`, clamping both values to at least 1.
    #[must_use]
    pub fn for_page(page: u32, count: u32) -> Self {
        Self {
            page: page.max(1),
            count: count.max(1),
        }
    }

    /// The same page size, one page further.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Items across all pages, when reported.
    pub total: Option<u64>,
    pub page: u32,
    pub count: u32,
    pub has_more: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, params: PaginationParams, total: Option<u64>) -> Self {
        // Without a total, only a full page hints at another one.
        let has_more = match total {
            Some(total) => u64::from(params.page) * u64::from(params.count) < total,
            None => items.len() >= params.count as usize,
        };
        Self {
            items,
            total,
            page: params.page,
            count: params.count,
            has_more,
        }
    }

    /// Number of pages implied by `total`.
    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.total
            .map(|total| total.div_ceil(u64::from(self.count.max(1))))
    }

    /// Parameters for the following page; `None` on the last or an empty page.
    #[must_use]
    pub fn next_params(&self) -> Option<PaginationParams> {
        if !self.has_more || self.items.is_empty() {
            return None;
        }
        Some(PaginationParams::for_page(self.page, self.count).next())
    }
}

/// Body of any list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(alias = "organizations", alias = "applications", alias = "versions")]
    items: Vec<T>,
    #[serde(default)]
    total: Option<u64>,
}

impl<T> ListResponse<T> {
    pub(crate) fn into_page(self, params: PaginationParams) -> Page<T> {
        Page::new(self.items, params, self.total)
    }
}
