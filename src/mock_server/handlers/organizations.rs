//! Organization endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tokio::sync::RwLock;

use super::ListQuery;
use crate::mock_server::state::MockState;
use crate::Organization;

/// Response for listing organizations.
#[derive(Debug, Serialize)]
pub struct ListOrganizationsResponse {
    pub organizations: Vec<Organization>,
    pub total: u64,
}

/// GET /organizations
pub async fn list_organizations(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let state = state.read().await;

    let all = state.list_organizations();
    let total = all.len() as u64;

    (
        StatusCode::OK,
        Json(ListOrganizationsResponse {
            organizations: query.paginate(&all),
            total,
        }),
    )
}
