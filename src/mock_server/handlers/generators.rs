//! Generated code handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::not_found;
use crate::mock_server::state::MockState;

/// GET /organizations/{org}/applications/{app}/versions/{version}/generators/{generator}
///
/// Answers with a bare file when the generator produced one file and with a
/// `files` list otherwise, like the real service.
pub async fn get_generated(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((organization, application, version, generator)): Path<(String, String, String, String)>,
) -> impl IntoResponse {
    let state = state.read().await;

    match state.generated_files(&organization, &application, &version, &generator) {
        Some(files) if files.len() == 1 => (StatusCode::OK, Json(files[0].clone())).into_response(),
        Some(files) => (
            StatusCode::OK,
            Json(serde_json::json!({ "files": files })),
        )
            .into_response(),
        None => not_found(format!(
            "No {generator} output for {organization}/{application}@{version}"
        )),
    }
}
