// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Manifest processing pipeline.
//!
//! ```text
//! ManifestProcessor::new(root).with_manifest(extra)...
//!   run()
//!     requirements(ctx)   every manifest, declaration order
//!     configure(ctx)      manifest options, then command-line options
//!     ctx.resolve(index)  -> DependencyGraph
//!     generate(graph)     root package, axes, generators and backend
//! ```
//!
//! The sequence is linear; nothing is retried here.


use std::collections::BTreeSet;
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::paths::PathsConfig;
use crate::error::{GenerateError, Result};
use crate::generate::{self, BackendProbe, GenerateReport, GenerateRequest};
use crate::index::PackageIndex;
use crate::manifest::ManifestDescriptor;
use crate::manifest::generators::ToolchainBackend;
use crate::manifest::options::{DependencyOption, OptionAssignment};
use crate::manifest::settings::{Settings, SettingsAxis};
use crate::resolver::{DependencyGraph, ResolverContext};

/// Where generated files and package folders go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub output_dir: PathBuf,
    pub cache_root: PathBuf,
}

impl From<&PathsConfig> for OutputLayout {
    fn from(paths: &PathsConfig) -> Self {
        Self {
            output_dir: paths.output.clone(),
            cache_root: paths.cache.clone(),
        }
    }
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct Installation {
    pub graph: DependencyGraph,
    pub report: GenerateReport,
}

/// Drives one or more manifests through resolution and generation.
///
/// The first manifest is the root: its package identity, settings axes,
/// generators and backend decide what is generated. Every manifest
/// contributes requirements and options.
#[derive(Debug, Clone)]
pub struct ManifestProcessor {
    manifests: Vec<ManifestDescriptor>,
    options: Vec<OptionAssignment>,
    backend: Option<ToolchainBackend>,
}

impl ManifestProcessor {
    #[must_use]
    pub fn new(root: ManifestDescriptor) -> Self {
        Self {
            manifests: vec![root],
            options: Vec::new(),
            backend: None,
        }
    }

    /// Adds a manifest whose requirements join the root's.
    #[must_use]
    pub fn with_manifest(mut self, manifest: ManifestDescriptor) -> Self {
        self.manifests.push(manifest);
        self
    }

    /// Adds command-line options; they win over manifest options.
    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = OptionAssignment>) -> Self {
        self.options.extend(options);
        self
    }

    /// Replaces the root manifest's backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: Option<ToolchainBackend>) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn root(&self) -> &ManifestDescriptor {
        &self.manifests[0]
    }

    #[must_use]
    pub fn manifests(&self) -> &[ManifestDescriptor] {
        &self.manifests
    }

    /// Backend used for generation.
    #[must_use]
    pub fn backend(&self) -> ToolchainBackend {
        self.backend.unwrap_or_else(|| self.root().backend())
    }

    /// Settings axes of the root manifest.
    #[must_use]
    pub fn axes(&self) -> &BTreeSet<SettingsAxis> {
        self.root().settings()
    }

    /// Creates the request-scoped resolver context for `settings`.
    #[must_use]
    pub fn context(&self, settings: Settings, cancel: CancellationToken) -> ResolverContext {
        ResolverContext::new(settings, self.axes().clone()).with_cancellation(cancel)
    }

    /// Registers every requirement, manifest by manifest, in declaration
    /// order.
    pub fn requirements(&self, ctx: &mut ResolverContext) {
        for manifest in &self.manifests {
            for spec in manifest.requires() {
                ctx.require(manifest.package(), spec);
            }
        }
    }

    /// Sets declared build options before resolution.
    ///
    /// A manifest without options leaves every dependency on its recipe
    /// defaults.
    pub fn configure(&self, ctx: &mut ResolverContext) {
        for manifest in &self.manifests {
            if !manifest.has_options() {
                debug!(package = %manifest.package(), "No build options declared");
                continue;
            }
            for spec in manifest.requires() {
                for option in spec.options() {
                    set_option(ctx, spec.name(), *option);
                }
            }
            for (name, options) in manifest.transitive_options() {
                for option in options {
                    set_option(ctx, name, *option);
                }
            }
        }
        for assignment in &self.options {
            set_option(ctx, &assignment.dependency, assignment.option);
        }
    }

    /// Registers requirements and options, then resolves against `index`.
    ///
    /// # Errors
    ///
    /// Any `ResolveError`, unchanged.
    pub async fn resolve(
        &self,
        ctx: &mut ResolverContext,
        index: &dyn PackageIndex,
    ) -> crate::error::ResolveResult<DependencyGraph> {
        self.requirements(ctx);
        self.configure(ctx);
        ctx.resolve(index).await
    }

    /// Emits the toolchain files for `graph`.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` before anything is written, or a render/write
    /// failure after which no partial output remains.
    pub fn generate(
        &self,
        graph: &DependencyGraph,
        settings: &Settings,
        output: &OutputLayout,
        probe: &dyn BackendProbe,
    ) -> std::result::Result<GenerateReport, GenerateError> {
        let request = GenerateRequest::builder()
            .package(self.root().package())
            .graph(graph)
            .settings(settings)
            .axes(self.axes())
            .generators(self.root().generators())
            .backend(self.backend())
            .output_dir(&output.output_dir)
            .cache_root(&output.cache_root)
            .build();
        generate::generate(&request, probe)
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first resolve or generate error; in both cases the
    /// output folder is left as it was.
    #[instrument(skip_all, fields(package = %self.root().package(), backend = %self.backend()))]
    pub async fn run(
        &self,
        settings: Settings,
        index: &dyn PackageIndex,
        output: &OutputLayout,
        probe: &dyn BackendProbe,
        cancel: CancellationToken,
    ) -> Result<Installation> {
        let mut ctx = self.context(settings, cancel);
        let graph = self.resolve(&mut ctx, index).await?;
        info!(packages = graph.len(), "Dependencies resolved");

        let report = self.generate(&graph, ctx.settings(), output, probe)?;
        Ok(Installation { graph, report })
    }
}

fn set_option(ctx: &mut ResolverContext, name: &str, option: DependencyOption) {
    debug!(dependency = name, %option, "Build option");
    ctx.set_option(name, option);
}
