//! Writing staged updates to disk.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::sync::plan::UpdateItem;

/// A staged update that could not be written.
#[derive(Debug)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub generator: String,
    pub error: io::Error,
}

/// Result of [`apply_updates`].
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Paths written, in order.
    pub written: Vec<PathBuf>,
    pub failed: Vec<WriteFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write every update in order, overwriting existing files.
///
/// Parent directories are created as needed. A failed write is recorded and
/// the remaining items are still attempted. `on_write` is called after each
/// item with its outcome.
pub fn apply_updates<F>(updates: &[UpdateItem], mut on_write: F) -> ApplyReport
where
    F: FnMut(&UpdateItem, Result<(), &io::Error>),
{
    let mut report = ApplyReport::default();

    for item in updates {
        match write_file(&item.path, &item.content) {
            Ok(()) => {
                tracing::info!(path = %item.path.display(), generator = %item.generator, "wrote");
                on_write(item, Ok(()));
                report.written.push(item.path.clone());
            }
            Err(error) => {
                tracing::warn!(path = %item.path.display(), %error, "write failed");
                on_write(item, Err(&error));
                report.failed.push(WriteFailure {
                    path: item.path.clone(),
                    generator: item.generator.clone(),
                    error,
                });
            }
        }
    }

    report
}

/// Write through a sibling temp file so a failed write never truncates the
/// existing file.
fn write_file(path: &Path, content: &str) -> io::Result<()> {
    write_with(path, |file| file.write_all(content.as_bytes()))
}

/// Create `<path>.specgen.tmp`, let `fill` write it, then rename it over
/// `path`. The temp file is removed on any failure.
fn write_with<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = tmp_path(path);
    let result = fill_and_rename(&tmp, path, fill);
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn fill_and_rename<F>(tmp: &Path, path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = File::create(tmp)?;
    fill(&mut file)?;
    drop(file);
    std::fs::rename(tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.specgen.tmp", path.display()))
}
