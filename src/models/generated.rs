//! Generated code returned by the service's generators.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::SpecgenClient;
use crate::error::{Result, SpecgenError};
use crate::models::application::ApplicationRef;
use crate::traits::Get;

/// Version sentinel that the service resolves to the newest published version.
pub const LATEST_VERSION: &str = "latest";

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Output file name (e.g., "types.go").
    pub name: String,
    /// Full text content.
    pub content: String,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// The files one generator produced for one application version.
///
/// Always holds at least one file; single-file and multi-file generator
/// responses both land here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSet {
    generator: String,
    files: Vec<GeneratedFile>,
}

impl FileSet {
    /// Build a file set, or `None` when `files` is empty.
    pub fn new(generator: impl Into<String>, files: Vec<GeneratedFile>) -> Option<Self> {
        if files.is_empty() {
            return None;
        }
        Some(Self {
            generator: generator.into(),
            files,
        })
    }

    /// A file set holding exactly one file.
    pub fn single(generator: impl Into<String>, file: GeneratedFile) -> Self {
        Self {
            generator: generator.into(),
            files: vec![file],
        }
    }

    /// Key of the generator that produced these files.
    pub fn generator(&self) -> &str {
        &self.generator
    }

    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<GeneratedFile> {
        self.files
    }
}

/// Identifies one generator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub organization: String,
    pub application: String,
    /// Literal version or [`LATEST_VERSION`].
    pub version: String,
    pub generator: String,
}

impl GenerationRequest {
    pub fn new(
        organization: impl Into<String>,
        application: impl Into<String>,
        version: impl Into<String>,
        generator: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            application: application.into(),
            version: version.into(),
            generator: generator.into(),
        }
    }

    fn path(&self) -> String {
        let app = ApplicationRef::new(self.organization.as_str(), self.application.as_str());
        format!(
            "{}/versions/{}/generators/{}",
            app.path(),
            urlencoding::encode(&self.version),
            urlencoding::encode(&self.generator)
        )
    }
}

impl std::fmt::Display for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{} ({})",
            self.organization, self.application, self.version, self.generator
        )
    }
}

/// Generators answer with either a bare file or a list of files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedResponse {
    Many { files: Vec<GeneratedFile> },
    Single(GeneratedFile),
}

impl GeneratedResponse {
    fn into_files(self) -> Vec<GeneratedFile> {
        match self {
            Self::Many { files } => files,
            Self::Single(file) => vec![file],
        }
    }
}

#[async_trait]
impl Get for FileSet {
    type Id = GenerationRequest;

    #[tracing::instrument(skip(client), fields(request = %request))]
    async fn get(client: &SpecgenClient, request: GenerationRequest) -> Result<Self> {
        let response = client.get(&request.path()).await.map_err(|e| match e {
            SpecgenError::NotFound { .. } => SpecgenError::NotFound {
                entity_type: "generated code",
                id: request.to_string(),
            },
            other => other,
        })?;

        let data: GeneratedResponse = response.json().await.map_err(SpecgenError::HttpError)?;

        FileSet::new(request.generator.as_str(), data.into_files()).ok_or_else(|| {
            SpecgenError::ApiError {
                message: format!("generator returned no files for {request}"),
                status_code: None,
            }
        })
    }
}
