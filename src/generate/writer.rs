// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! All-or-nothing output writing.
//!
//! ```text
//! rendered files
//!      |
//!      v
//! compare with disk ---- same bytes ----> unchanged (not touched)
//!      | differs
//!      v
//! stage: NamedTempFile in output dir (write + flush)
//!      |  all staged?
//!      v
//! persist (rename) each, recording it in OutputGuard
//!      |
//!      v
//! guard.keep()   -- on any error before this, the guard restores
//!                   overwritten files, removes new ones and removes
//!                   the output directory if this run created it
//! ```

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::GenerateError;

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Files created or replaced by this run.
    pub written: Vec<PathBuf>,
    /// Files whose content was already up to date.
    pub unchanged: Vec<PathBuf>,
}

impl GenerateReport {
    /// Every generated file, written or not, in path order.
    #[must_use]
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.written.iter().chain(&self.unchanged).cloned().collect();
        files.sort();
        files
    }
}

/// Rolls back a partially written output directory on drop.
struct OutputGuard {
    created_dir: Option<PathBuf>,
    /// Persisted files with their previous content, if any.
    written: Vec<(PathBuf, Option<Vec<u8>>)>,
    keep: bool,
}

impl OutputGuard {
    const fn new(created_dir: Option<PathBuf>) -> Self {
        Self {
            created_dir,
            written: Vec::new(),
            keep: false,
        }
    }

    fn record(&mut self, path: PathBuf, previous: Option<Vec<u8>>) {
        self.written.push((path, previous));
    }

    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for (path, previous) in self.written.drain(..).rev() {
            let restored = match previous {
                Some(content) => std::fs::write(&path, content),
                None => std::fs::remove_file(&path),
            };
            if let Err(e) = restored {
                warn!(path = %path.display(), error = %e, "Failed to roll back generated file");
            }
        }
        if let Some(dir) = self.created_dir.take() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

struct Staged {
    file: NamedTempFile,
    target: PathBuf,
    previous: Option<Vec<u8>>,
}

/// Writes `files` (paths relative to `output_dir`) so that either all of them
/// end up on disk or none of this run's changes remain.
///
/// # Errors
///
/// - `OutsideOutputDir`, before anything is touched, if a key is not a
///   single plain file name.
/// - `Write` for the first file that cannot be staged or persisted.
pub fn write_all(
    output_dir: &Path,
    files: &BTreeMap<PathBuf, String>,
) -> Result<GenerateReport, GenerateError> {
    if let Some(bad) = files.keys().find(|relative| !is_plain_file_name(relative)) {
        return Err(GenerateError::OutsideOutputDir(bad.display().to_string()));
    }
    write_files(output_dir, files)
}

/// `write_all` without the file name check.
pub(super) fn write_files(
    output_dir: &Path,
    files: &BTreeMap<PathBuf, String>,
) -> Result<GenerateReport, GenerateError> {
    let created_dir = create_output_dir(output_dir)?;
    let mut guard = OutputGuard::new(created_dir);
    let mut report = GenerateReport::default();

    let mut staged = Vec::new();
    for (relative, content) in files {
        let target = output_dir.join(relative);
        let previous = match std::fs::read(&target) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => return Err(write_error(&target, source)),
        };
        if previous.as_deref() == Some(content.as_bytes()) {
            debug!(path = %target.display(), "Unchanged");
            report.unchanged.push(target);
            continue;
        }

        let mut file = NamedTempFile::new_in(output_dir).map_err(|e| write_error(&target, e))?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| write_error(&target, e))?;
        staged.push(Staged {
            file,
            target,
            previous,
        });
    }

    for Staged {
        file,
        target,
        previous,
    } in staged
    {
        file.persist(&target)
            .map_err(|e| write_error(&target, e.error))?;
        debug!(path = %target.display(), "Written");
        guard.record(target.clone(), previous);
        report.written.push(target);
    }

    guard.keep();
    Ok(report)
}

fn is_plain_file_name(relative: &Path) -> bool {
    let mut components = relative.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Creates the output directory, returning the topmost directory this call
/// created so it can be removed on failure.
fn create_output_dir(output_dir: &Path) -> Result<Option<PathBuf>, GenerateError> {
    if output_dir.is_dir() {
        return Ok(None);
    }
    let mut topmost = output_dir;
    while let Some(parent) = topmost.parent() {
        if parent.as_os_str().is_empty() || parent.exists() {
            break;
        }
        topmost = parent;
    }
    std::fs::create_dir_all(output_dir).map_err(|e| write_error(output_dir, e))?;
    Ok(Some(topmost.to_path_buf()))
}

fn write_error(path: &Path, source: std::io::Error) -> GenerateError {
    GenerateError::Write {
        path: path.display().to_string(),
        source,
    }
}
