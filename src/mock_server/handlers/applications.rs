//! Application endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tokio::sync::RwLock;

use super::{not_found, ListQuery};
use crate::mock_server::state::MockState;
use crate::Application;

/// Response for listing applications.
#[derive(Debug, Serialize)]
pub struct ListApplicationsResponse {
    pub applications: Vec<Application>,
    pub total: u64,
}

/// GET /organizations/{org}/applications
pub async fn list_applications(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(organization): Path<String>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let state = state.read().await;

    if !state.has_organization(&organization) {
        return not_found(format!("No organization with key: {organization}"));
    }

    let all = state.list_applications(&organization);
    let total = all.len() as u64;

    (
        StatusCode::OK,
        Json(ListApplicationsResponse {
            applications: query.paginate(&all),
            total,
        }),
    )
        .into_response()
}
