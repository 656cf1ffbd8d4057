//! Mock code-generation server.
//!
//! Provides an axum-based HTTP server that simulates the remote service.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock code-generation server for testing.
///
/// The server runs in the background and can be used to test the client and
/// the sync engine against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `SpecgenClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        state_from_scenario(Fixtures::default_scenario())
    }
}

fn state_from_scenario(scenario: DefaultScenario) -> MockState {
    let mut state = MockState::new();

    for organization in scenario.organizations {
        state = state.with_organization(organization);
    }
    for application in scenario.applications {
        state = state.with_application(application);
    }
    for version in scenario.versions {
        state = state.with_version(version);
    }
    for ((organization, application, version, generator), files) in scenario.generated {
        state = state.with_generated(&organization, &application, &version, &generator, files);
    }

    state
}

/// Create the axum router with all routes.
pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
    let api = Router::new()
        .route("/organizations", get(handlers::list_organizations))
        .route(
            "/organizations/:org/applications",
            get(handlers::list_applications),
        )
        .route(
            "/organizations/:org/applications/:app/versions",
            get(handlers::list_versions).post(handlers::upload_spec),
        )
        .route(
            "/organizations/:org/applications/:app/versions/:version/generators/:generator",
            get(handlers::get_generated),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .merge(api)
        // Health check stays open
        .route("/health", get(health_check))
        .with_state(state)
}

/// Reject requests without the configured bearer token.
async fn require_token(
    State(state): State<Arc<RwLock<MockState>>>,
    request: Request,
    next: Next,
) -> Response {
    let required = state.read().await.required_token.clone();

    if let Some(token) = required {
        let expected = format!("Bearer {token}");
        let provided = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if provided != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "invalid API key" })),
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::{FileSet, GenerationRequest, Get, List, Organization, SpecgenClient};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_router_requires_token_when_configured() {
        let state = MockState::new().with_required_token("secret").shared();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/organizations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/organizations")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_organizations_with_client() {
        let server = MockServer::start().await;
        let client = SpecgenClient::new("test-token", server.url()).unwrap();

        let page = Organization::list_page(&client, &Default::default(), 1, 20)
            .await
            .expect("Failed to list organizations");

        assert_eq!(page.items[0].key, "acme");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server_has_no_generated_code() {
        let server = MockServer::start_empty().await;
        let client = SpecgenClient::new("test-token", server.url()).unwrap();

        let request = GenerationRequest::new("acme", "widgets", "1.0.0", "go_models");
        let result = FileSet::get(&client, request).await;

        assert!(matches!(result, Err(crate::SpecgenError::NotFound { .. })));

        server.shutdown().await;
    }
}
