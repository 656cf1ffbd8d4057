//! Version listing and spec upload handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{not_found, ListQuery};
use crate::mock_server::state::MockState;
use crate::ApiVersion;

/// Response for listing versions.
#[derive(Debug, Serialize)]
pub struct ListVersionsResponse {
    pub versions: Vec<ApiVersion>,
    pub total: u64,
}

/// Body of a spec upload.
#[derive(Debug, Deserialize)]
pub struct UploadSpecParams {
    pub version: Option<String>,
    #[allow(dead_code)] // Format detection is not simulated
    pub filename: String,
    pub content: String,
}

/// GET /organizations/{org}/applications/{app}/versions
pub async fn list_versions(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((organization, application)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let state = state.read().await;

    if !state.has_application(&organization, &application) {
        return not_found(format!(
            "No application {application} in organization {organization}"
        ));
    }

    let all = state.list_versions(&organization, &application);
    let total = all.len() as u64;

    (
        StatusCode::OK,
        Json(ListVersionsResponse {
            versions: query.paginate(&all),
            total,
        }),
    )
        .into_response()
}

/// POST /organizations/{org}/applications/{app}/versions
pub async fn upload_spec(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((organization, application)): Path<(String, String)>,
    Json(params): Json<UploadSpecParams>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if !state.has_application(&organization, &application) {
        return not_found(format!(
            "No application {application} in organization {organization}"
        ));
    }

    match state.publish(&organization, &application, params.version, &params.content) {
        Ok(version) => (StatusCode::CREATED, Json(version)).into_response(),
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "errors": errors })),
        )
            .into_response(),
    }
}
