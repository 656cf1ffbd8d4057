//! Project configuration file.
//!
//! Describes which generators to sync for a working tree and where their
//! output lands:
//!
//! ```yaml
//! projects:
//!   - organization: acme
//!     application: widgets
//!     version: 1.0.0
//!     targets:
//!       - generator: go_models
//!         path: ./models
//! ```
//!
//! Target paths are resolved relative to the directory holding the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SpecgenError};
use crate::models::LATEST_VERSION;

/// File name looked up in the current directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "specgen.yml";

/// One generator and the local path its output is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorTarget {
    pub generator: String,
    /// File or directory, already joined with the configuration directory.
    pub path: PathBuf,
}

impl GeneratorTarget {
    pub fn new(generator: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            generator: generator.into(),
            path: path.into(),
        }
    }
}

/// An application version and the generators synced for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub organization: String,
    pub application: String,
    /// Literal version or [`LATEST_VERSION`].
    pub version: String,
    pub targets: Vec<GeneratorTarget>,
}

/// Parsed project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Path the configuration was loaded from.
    pub path: PathBuf,
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    projects: Vec<RawProject>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    organization: String,
    application: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    generator: String,
    path: PathBuf,
}

impl ProjectConfig {
    /// Load and resolve the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecgenError::ProjectConfigNotFound`] if the file does not
    /// exist and [`SpecgenError::ProjectConfigInvalid`] if it cannot be parsed.
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SpecgenError::ProjectConfigNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        // A bare file name has an empty parent; targets then stay as written.
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        let projects =
            Self::parse(&text, base).map_err(|source| SpecgenError::ProjectConfigInvalid {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            projects,
        })
    }

    /// Parse configuration text, resolving target paths against `base`.
    fn parse(text: &str, base: &Path) -> std::result::Result<Vec<Project>, serde_yaml::Error> {
        let raw: RawConfig = serde_yaml::from_str(text)?;

        let projects = raw
            .projects
            .into_iter()
            .map(|project| Project {
                organization: project.organization,
                application: project.application,
                version: project
                    .version
                    .unwrap_or_else(|| LATEST_VERSION.to_string()),
                targets: project
                    .targets
                    .into_iter()
                    .map(|target| GeneratorTarget {
                        generator: target.generator,
                        path: base.join(target.path),
                    })
                    .collect(),
            })
            .collect();

        Ok(projects)
    }
}
