//! Update planning: fetch, compare, stage.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::{GeneratorTarget, Project};
use crate::models::{FileSet, GeneratedFile, GenerationRequest, LATEST_VERSION};
use crate::sync::provider::{CodeProvider, FetchError};

/// Which version of each project is requested from the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Use the version written in the project configuration.
    #[default]
    Configured,
    /// Always request [`LATEST_VERSION`].
    Latest,
}

/// Settings for a [`Syncer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    pub version_policy: VersionPolicy,
}

/// Outcome of comparing one generated file (or target) with disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    Unchanged,
    Changed,
    NotFound,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unchanged => "unchanged",
            Self::Changed => "changed",
            Self::NotFound => "not found",
        })
    }
}

/// Status of one generated file, or of a whole target when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub organization: String,
    pub application: String,
    /// Version that was requested.
    pub version: String,
    pub generator: String,
    /// Resolved file path; the configured target for [`SyncStatus::NotFound`].
    pub path: PathBuf,
    pub status: SyncStatus,
}

/// A pending write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateItem {
    pub path: PathBuf,
    /// New content exactly as the service returned it.
    pub content: String,
    pub generator: String,
}

/// Why a target could not be evaluated.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    UnsafeName(#[from] UnsafeFileName),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A generated file name that would resolve outside its target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generated file name {name:?} escapes the target directory")]
pub struct UnsafeFileName {
    pub name: String,
}

/// A target skipped because of an error other than not-found.
#[derive(Debug)]
pub struct TargetFailure {
    pub organization: String,
    pub application: String,
    pub version: String,
    pub generator: String,
    /// Configured target path.
    pub path: PathBuf,
    pub error: TargetError,
}

/// Progress notification emitted while planning.
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    Status(&'a StatusRecord),
    Failed(&'a TargetFailure),
}

/// Everything [`Syncer::plan_updates`] found.
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Writes to perform, in discovery order.
    pub updates: Vec<UpdateItem>,
    pub statuses: Vec<StatusRecord>,
    pub failures: Vec<TargetFailure>,
}

impl SyncPlan {
    /// True when every target was evaluated.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of records carrying `status`.
    pub fn count(&self, status: SyncStatus) -> usize {
        self.statuses.iter().filter(|r| r.status == status).count()
    }
}

/// Compares generator output with local files.
///
/// Requests are issued one at a time, in configuration order.
#[derive(Debug)]
pub struct Syncer<P> {
    provider: P,
    options: SyncOptions,
}

impl<P: CodeProvider> Syncer<P> {
    pub fn new(provider: P, options: SyncOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The version requested for `project` under the configured policy.
    pub fn resolve_version<'a>(&self, project: &'a Project) -> &'a str {
        match self.options.version_policy {
            VersionPolicy::Configured => &project.version,
            VersionPolicy::Latest => LATEST_VERSION,
        }
    }

    /// Fetch every configured target and stage updates for files that differ.
    ///
    /// `on_event` is called as soon as each status or failure is known. A
    /// not-found generator or a failing target never stops the remaining
    /// targets; failures are collected in [`SyncPlan::failures`]. Nothing is
    /// written to disk.
    pub async fn plan_updates<F>(&self, projects: &[Project], mut on_event: F) -> SyncPlan
    where
        F: FnMut(SyncEvent<'_>),
    {
        let mut plan = SyncPlan::default();

        for project in projects {
            let version = self.resolve_version(project);
            for target in &project.targets {
                self.plan_target(project, version, target, &mut plan, &mut on_event)
                    .await;
            }
        }

        tracing::info!(
            updates = plan.updates.len(),
            failures = plan.failures.len(),
            "planning finished"
        );
        plan
    }

    async fn plan_target<F>(
        &self,
        project: &Project,
        version: &str,
        target: &GeneratorTarget,
        plan: &mut SyncPlan,
        on_event: &mut F,
    ) where
        F: FnMut(SyncEvent<'_>),
    {
        let request = GenerationRequest::new(
            project.organization.as_str(),
            project.application.as_str(),
            version,
            target.generator.as_str(),
        );
        let record = |path: PathBuf, status: SyncStatus| StatusRecord {
            organization: project.organization.clone(),
            application: project.application.clone(),
            version: version.to_string(),
            generator: target.generator.clone(),
            path,
            status,
        };
        let failure = |error: TargetError| TargetFailure {
            organization: project.organization.clone(),
            application: project.application.clone(),
            version: version.to_string(),
            generator: target.generator.clone(),
            path: target.path.clone(),
            error,
        };

        let file_set = match self.provider.fetch(&request).await {
            Ok(file_set) => file_set,
            Err(FetchError::NotFound) => {
                tracing::warn!(%request, "no generated output");
                let not_found = record(target.path.clone(), SyncStatus::NotFound);
                on_event(SyncEvent::Status(push(&mut plan.statuses, not_found)));
                return;
            }
            Err(err) => {
                tracing::warn!(%request, error = %err, "fetch failed");
                on_event(SyncEvent::Failed(push(&mut plan.failures, failure(err.into()))));
                return;
            }
        };

        let staged = match staged_paths(&target.path, &file_set) {
            Ok(staged) => staged,
            Err(err) => {
                tracing::warn!(%request, error = %err, "rejected generated output");
                on_event(SyncEvent::Failed(push(&mut plan.failures, failure(err.into()))));
                return;
            }
        };

        for (path, file) in staged {
            let existing = match read_existing(&path) {
                Ok(existing) => existing,
                Err(source) => {
                    tracing::warn!(path = %path.display(), error = %source, "read failed");
                    let failed = failure(TargetError::Read { path, source });
                    on_event(SyncEvent::Failed(push(&mut plan.failures, failed)));
                    continue;
                }
            };

            let status = if contents_match(&file.content, &existing) {
                SyncStatus::Unchanged
            } else {
                plan.updates.push(UpdateItem {
                    path: path.clone(),
                    content: file.content.clone(),
                    generator: target.generator.clone(),
                });
                SyncStatus::Changed
            };
            tracing::debug!(path = %path.display(), %status, "compared");

            on_event(SyncEvent::Status(push(&mut plan.statuses, record(path, status))));
        }
    }
}

/// Append `item` and hand back a reference to it.
fn push<T>(items: &mut Vec<T>, item: T) -> &T {
    let index = items.len();
    items.push(item);
    &items[index]
}

/// Pair each file in `file_set` with the local path it is written to.
///
/// `target` names a single file when it is an existing regular file, or when
/// it does not exist, has an extension, does not end in a separator and the
/// set holds exactly one file. Otherwise it is a directory and each file lands
/// at `target/<name>`.
///
/// # Errors
///
/// Returns [`UnsafeFileName`] if any file name is empty, absolute or climbs
/// out of the target with `..`.
pub fn staged_paths<'a>(
    target: &Path,
    file_set: &'a FileSet,
) -> Result<Vec<(PathBuf, &'a GeneratedFile)>, UnsafeFileName> {
    if let Some(file) = file_set.files().iter().find(|f| !is_contained(&f.name)) {
        return Err(UnsafeFileName {
            name: file.name.clone(),
        });
    }

    let single = is_file_target(target, file_set.len());
    Ok(file_set
        .files()
        .iter()
        .map(|file| {
            let path = if single {
                target.to_path_buf()
            } else {
                target.join(&file.name)
            };
            (path, file)
        })
        .collect())
}

/// Whether `name` stays below the directory it is joined onto.
fn is_contained(name: &str) -> bool {
    let mut has_name = false;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_name
}

fn is_file_target(target: &Path, file_count: usize) -> bool {
    if target.is_file() {
        return true;
    }
    if target.exists() {
        return false;
    }

    let trailing_separator = target
        .as_os_str()
        .to_string_lossy()
        .ends_with(|c| c == '/' || c == std::path::MAIN_SEPARATOR);

    file_count == 1 && !trailing_separator && target.extension().is_some()
}

/// Current content at `path`; a missing file reads as empty.
pub fn read_existing(path: &Path) -> io::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err),
    }
}

/// Whether two texts are equal once surrounding whitespace is ignored.
pub fn contents_match(new: &str, existing: &str) -> bool {
    new.trim() == existing.trim()
}
