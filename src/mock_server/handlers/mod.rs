//! HTTP request handlers for the mock server.

pub mod applications;
pub mod generators;
pub mod organizations;
pub mod versions;

pub use applications::*;
pub use generators::*;
pub use organizations::*;
pub use versions::*;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Deserialize;

/// Pagination query accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub count: Option<u32>,
}

impl ListQuery {
    /// Slice `items` to the requested page.
    pub fn paginate<T: Clone>(&self, items: &[&T]) -> Vec<T> {
        let page = self.page.unwrap_or(1).max(1);
        let count = self.count.unwrap_or(20);

        let start = ((page - 1) * count) as usize;
        let end = (start + count as usize).min(items.len());

        if start < items.len() {
            items[start..end].iter().map(|item| (*item).clone()).collect()
        } else {
            vec![]
        }
    }
}

/// A 404 response in the service's error shape.
pub(crate) fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "message": message
        })),
    )
        .into_response()
}
