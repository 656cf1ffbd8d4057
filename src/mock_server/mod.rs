//! Mock code-generation service for E2E testing.
//!
//! An in-memory axum server that simulates the remote service. Unlike
//! wiremock, which mocks individual HTTP exchanges per test, this server keeps
//! state across requests, so uploads become visible to later listings and
//! `latest` resolves against what has been published.
//!
//! # Example
//!
//! ```ignore
//! use specgen::mock_server::MockServer;
//! use specgen::{FileSet, GenerationRequest, Get, SpecgenClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = SpecgenClient::new("test-token", server.url()).unwrap();
//!
//!     let request = GenerationRequest::new("acme", "widgets", "1.0.0", "go_models");
//!     let files = FileSet::get(&client, request).await.unwrap();
//!     assert_eq!(files.files()[0].name, "types.go");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::MockState;
