//! specgen client library.
//!
//! A Rust library for a remote API specification and code-generation
//! service, plus the project synchronization engine behind the `specgen`
//! command-line tool.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use specgen::{
//!     apply_updates, ClientConfig, ProjectConfig, SpecgenClient, SyncEvent, SyncOptions, Syncer,
//! };
//!
//! #[tokio::main]
//! async fn main() -> specgen::Result<()> {
//!     let config = ProjectConfig::load(Path::new("specgen.yml"))?;
//!     let client = SpecgenClient::from_config(&ClientConfig::from_env()?)?;
//!
//!     let syncer = Syncer::new(client, SyncOptions::default());
//!     let plan = syncer
//!         .plan_updates(&config.projects, |event| {
//!             if let SyncEvent::Status(record) = event {
//!                 println!("{}: {}", record.path.display(), record.status);
//!             }
//!         })
//!         .await;
//!
//!     let report = apply_updates(&plan.updates, |_, _| {});
//!     println!("wrote {} files", report.written.len());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Service operations are traits implemented by model types:
//!
//! - [`Get`] - Fetch a single entity (generated code for a [`GenerationRequest`])
//! - [`List`] - Fetch paginated collections ([`Organization`], [`Application`], [`ApiVersion`])
//! - [`Upload`] - Publish a specification file as a new [`ApiVersion`]
//!
//! Synchronization goes through the [`CodeProvider`] trait, which
//! [`SpecgenClient`] implements, so the engine can run against any source of
//! generated code.
//!
//! # Configuration
//!
//! [`ClientConfig::from_env`] reads:
//!
//! - `SPECGEN_API_KEY` (required) - API key
//! - `SPECGEN_API_URL` (optional) - Base URL (defaults to `https://api.specgen.dev/v1`)

pub mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod pagination;
mod sync;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{ClientConfig, SpecgenClient, DEFAULT_API_URL};
pub use error::{Result, SpecgenError};
pub use output::PrettyPrint;
pub use pagination::{Page, PaginationParams};

// Re-export traits
pub use traits::{Get, List, Upload, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    ApiVersion, Application, ApplicationListQuery, ApplicationRef, FileSet, GeneratedFile,
    GenerationRequest, Organization, OrganizationListQuery, SpecUpload, VersionListQuery,
    LATEST_VERSION,
};

// Project configuration
pub use config::{GeneratorTarget, Project, ProjectConfig, DEFAULT_CONFIG_FILE};

// Synchronization
pub use sync::{
    apply_updates, contents_match, read_existing, staged_paths, ApplyReport, CodeProvider,
    FetchError, StatusRecord, SyncEvent, SyncOptions, SyncPlan, SyncStatus, Syncer, TargetError,
    TargetFailure, UnsafeFileName, UpdateItem, VersionPolicy, WriteFailure,
};
