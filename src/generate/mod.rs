// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `CMake` toolchain generation.
//!
//! # Pipeline
//!
//! ```text
//! GenerateRequest
//!      |
//!      v
//! probe.locate(backend) --- None ---> BackendUnavailable (nothing written)
//!      |
//!      v
//! render()  (pure, in memory)
//!   cmt_toolchain.cmake
//!   CMakePresets.json
//!   <file>-config.cmake           \  with CMakeDeps,
//!   <file>-config-version.cmake   /  one pair per package
//!      |
//!      v
//! writer::write_all()  (staged, rolled back on failure)
//! ```

pub mod deps;
pub mod probe;
pub mod toolchain;
pub mod writer;


use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use bon::Builder;
use tracing::{debug, info};

use crate::error::GenerateError;
use crate::manifest::generators::{GeneratorSet, ToolchainBackend};
use crate::manifest::reference::Reference;
use crate::manifest::settings::{Settings, SettingsAxis};
use crate::resolver::DependencyGraph;

pub use probe::{BackendProbe, SystemProbe};
pub use writer::GenerateReport;

/// File name of the generated toolchain file.
pub const TOOLCHAIN_FILE: &str = "cmt_toolchain.cmake";
/// File name of the generated presets file.
pub const PRESETS_FILE: &str = "CMakePresets.json";

/// Everything generation needs, borrowed from the caller.
#[derive(Debug, Clone, Builder)]
pub struct GenerateRequest<'a> {
    /// Package the files are generated for.
    package: &'a Reference,
    graph: &'a DependencyGraph,
    settings: &'a Settings,
    /// Axes the manifest declares; others are left to `CMake` defaults.
    axes: &'a BTreeSet<SettingsAxis>,
    #[builder(default)]
    generators: GeneratorSet,
    #[builder(default)]
    backend: ToolchainBackend,
    output_dir: &'a Path,
    cache_root: &'a Path,
}

impl GenerateRequest<'_> {
    #[must_use]
    pub const fn package(&self) -> &Reference {
        self.package
    }

    #[must_use]
    pub const fn graph(&self) -> &DependencyGraph {
        self.graph
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        self.settings
    }

    #[must_use]
    pub fn declares(&self, axis: SettingsAxis) -> bool {
        self.axes.contains(&axis)
    }

    #[must_use]
    pub const fn generators(&self) -> GeneratorSet {
        self.generators
    }

    #[must_use]
    pub const fn backend(&self) -> ToolchainBackend {
        self.backend
    }

    #[must_use]
    pub const fn output_dir(&self) -> &Path {
        self.output_dir
    }

    #[must_use]
    pub const fn cache_root(&self) -> &Path {
        self.cache_root
    }
}

/// Renders every output file in memory, keyed by path relative to the
/// output directory.
///
/// # Errors
///
/// Returns `GenerateError::Render` if a file cannot be rendered or the graph
/// has a cycle, and `FileCollision` if two packages map to the same config
/// file name (compared case-insensitively, as `find_package` does).
pub fn render(request: &GenerateRequest<'_>) -> Result<BTreeMap<PathBuf, String>, GenerateError> {
    let mut files = BTreeMap::new();

    files.insert(
        PathBuf::from(TOOLCHAIN_FILE),
        toolchain::render_toolchain(request),
    );
    files.insert(
        PathBuf::from(PRESETS_FILE),
        toolchain::render_presets(request)?,
    );

    if request.generators.contains(GeneratorSet::CMAKE_DEPS) {
        let order = request
            .graph
            .topological_order()
            .map_err(|e| GenerateError::Render {
                file: "package config files".to_string(),
                message: e.to_string(),
            })?;
        let mut owners: BTreeMap<String, &Reference> = BTreeMap::new();
        for package in order {
            let file_name = deps::config_file_stem(&package.recipe);
            if let Some(first) = owners.insert(file_name.clone(), &package.reference) {
                return Err(GenerateError::FileCollision {
                    file: format!("{file_name}-config.cmake"),
                    first: first.to_string(),
                    second: package.reference.to_string(),
                });
            }
            files.insert(
                PathBuf::from(format!("{file_name}-config.cmake")),
                deps::render_config(request, package),
            );
            files.insert(
                PathBuf::from(format!("{file_name}-config-version.cmake")),
                deps::render_config_version(package),
            );
        }
    }

    Ok(files)
}

/// Checks the backend, renders and writes all files.
///
/// # Errors
///
/// - `BackendUnavailable` before anything is written when `probe` cannot
///   find the backend's executable.
/// - `Render` or `Write` otherwise; no partial output remains.
pub fn generate(
    request: &GenerateRequest<'_>,
    probe: &dyn BackendProbe,
) -> Result<GenerateReport, GenerateError> {
    let backend = request.backend;
    let program = probe
        .locate(backend)
        .ok_or_else(|| GenerateError::BackendUnavailable {
            backend: backend.to_string(),
            program: backend.program().to_string(),
        })?;
    debug!(%backend, program = %program.display(), "Backend available");

    let files = render(request)?;
    let report = writer::write_all(request.output_dir, &files)?;

    info!(
        output = %request.output_dir.display(),
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        "Toolchain generated"
    );
    Ok(report)
}

/// Cache folder holding one binary package.
#[must_use]
pub fn package_folder(cache_root: &Path, reference: &Reference, package_id: &str) -> PathBuf {
    cache_root
        .join("p")
        .join(reference.name())
        .join(reference.version())
        .join(package_id)
}

/// Path rendered with forward slashes, as `CMake` expects.
pub(crate) fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
