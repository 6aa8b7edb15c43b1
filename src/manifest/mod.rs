// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dependency manifests.
//!
//! # File Format
//!
//! ```toml
//! requires = ["boost/1.80.0", { ref = "fmt/9.1.0", force = true }]
//!
//! [package]
//! name = "cmake-tools-conan-integration"
//! version = "0.0.1"
//! generators = ["CMakeDeps"]
//! settings = ["os", "arch", "compiler", "build_type"]
//!
//! [options.boost]
//! header_only = true
//!
//! [toolchain]
//! generator = "Ninja"
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! TOML / preset --> ManifestBuilder --> ManifestDescriptor (immutable)
//!                                            |
//!                          ManifestProcessor::requirements/configure
//! ```

pub mod generators;
pub mod options;
pub mod presets;
pub mod reference;
pub mod settings;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

use generators::{GeneratorSet, ToolchainBackend};
use options::DependencyOption;
use reference::Reference;
use settings::SettingsAxis;

/// One declared requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    reference: Reference,
    options: Vec<DependencyOption>,
    force: bool,
}

impl DependencySpec {
    #[must_use]
    pub const fn new(reference: Reference) -> Self {
        Self {
            reference,
            options: Vec::new(),
            force: false,
        }
    }

    /// Marks this requirement as an explicit override of transitive versions.
    #[must_use]
    pub const fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    /// Adds an option, replacing any earlier value of the same kind.
    #[must_use]
    pub fn with_option(mut self, option: DependencyOption) -> Self {
        self.options.retain(|o| o.kind() != option.kind());
        self.options.push(option);
        self
    }

    #[must_use]
    pub const fn reference(&self) -> &Reference {
        &self.reference
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.reference.name()
    }

    #[must_use]
    pub fn options(&self) -> &[DependencyOption] {
        &self.options
    }

    #[must_use]
    pub const fn is_forced(&self) -> bool {
        self.force
    }
}

/// A complete, validated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDescriptor {
    package: Reference,
    generators: GeneratorSet,
    settings: BTreeSet<SettingsAxis>,
    requires: Vec<DependencySpec>,
    /// Options for dependencies that are not direct requirements.
    transitive_options: BTreeMap<String, Vec<DependencyOption>>,
    backend: ToolchainBackend,
}

impl ManifestDescriptor {
    /// Starts building a manifest for `package`.
    #[must_use]
    pub fn builder(package: Reference) -> ManifestBuilder {
        ManifestBuilder::new(package)
    }

    /// Parses a TOML manifest.
    ///
    /// # Errors
    ///
    /// Returns a `ManifestError` for invalid TOML or invalid declarations.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Self::parse_named(content, "<string>")
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Read` if the file cannot be read, or any
    /// parse/validation error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_named(&content, &path.display().to_string())
    }

    fn parse_named(content: &str, origin: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(content).map_err(|e| ManifestError::Parse {
            path: origin.to_string(),
            message: e.message().to_string(),
        })?;
        raw.into_descriptor()
    }

    /// Renders the manifest back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Parse` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ManifestError> {
        toml::to_string_pretty(&RawManifest::from(self)).map_err(|e| ManifestError::Parse {
            path: self.package.to_string(),
            message: e.to_string(),
        })
    }

    /// Package identity of the manifest itself.
    #[must_use]
    pub const fn package(&self) -> &Reference {
        &self.package
    }

    #[must_use]
    pub const fn generators(&self) -> GeneratorSet {
        self.generators
    }

    #[must_use]
    pub const fn settings(&self) -> &BTreeSet<SettingsAxis> {
        &self.settings
    }

    /// Requirements in declaration order.
    #[must_use]
    pub fn requires(&self) -> &[DependencySpec] {
        &self.requires
    }

    #[must_use]
    pub const fn transitive_options(&self) -> &BTreeMap<String, Vec<DependencyOption>> {
        &self.transitive_options
    }

    #[must_use]
    pub const fn backend(&self) -> ToolchainBackend {
        self.backend
    }

    /// Whether the manifest declares any build option.
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.transitive_options.is_empty() || self.requires.iter().any(|r| !r.options.is_empty())
    }
}

/// Builder validating a manifest before it becomes immutable.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    package: Reference,
    generators: GeneratorSet,
    settings: BTreeSet<SettingsAxis>,
    requires: Vec<DependencySpec>,
    options: Vec<(String, DependencyOption)>,
    backend: ToolchainBackend,
}

impl ManifestBuilder {
    fn new(package: Reference) -> Self {
        Self {
            package,
            generators: GeneratorSet::default(),
            settings: SettingsAxis::ALL.into_iter().collect(),
            requires: Vec::new(),
            options: Vec::new(),
            backend: ToolchainBackend::default(),
        }
    }

    #[must_use]
    pub fn generators(mut self, generators: GeneratorSet) -> Self {
        self.generators = generators | GeneratorSet::CMAKE_TOOLCHAIN;
        self
    }

    #[must_use]
    pub fn settings(mut self, axes: impl IntoIterator<Item = SettingsAxis>) -> Self {
        self.settings = axes.into_iter().collect();
        self
    }

    #[must_use]
    pub fn require(mut self, spec: DependencySpec) -> Self {
        self.requires.push(spec);
        self
    }

    /// Sets an option on a dependency, direct or transitive.
    #[must_use]
    pub fn option(mut self, dependency: impl Into<String>, option: DependencyOption) -> Self {
        self.options.push((dependency.into(), option));
        self
    }

    #[must_use]
    pub const fn backend(mut self, backend: ToolchainBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Validates and freezes the manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::DuplicateRequirement` when a dependency name is
    /// required twice.
    pub fn build(self) -> Result<ManifestDescriptor, ManifestError> {
        let mut seen: BTreeMap<&str, &Reference> = BTreeMap::new();
        for spec in &self.requires {
            if let Some(first) = seen.insert(spec.name(), spec.reference()) {
                return Err(ManifestError::DuplicateRequirement {
                    name: spec.name().to_string(),
                    first: first.to_string(),
                    second: spec.reference().to_string(),
                });
            }
        }

        let mut requires = self.requires;
        let mut transitive_options: BTreeMap<String, Vec<DependencyOption>> = BTreeMap::new();
        for (dependency, option) in self.options {
            if let Some(spec) = requires.iter_mut().find(|s| s.name() == dependency) {
                *spec = spec.clone().with_option(option);
            } else {
                let entry = transitive_options.entry(dependency).or_default();
                entry.retain(|o| o.kind() != option.kind());
                entry.push(option);
            }
        }

        Ok(ManifestDescriptor {
            package: self.package,
            generators: self.generators,
            settings: self.settings,
            requires,
            transitive_options,
            backend: self.backend,
        })
    }
}

// --- TOML schema ---

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    requires: Vec<RawRequirement>,
    package: RawPackage,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    options: BTreeMap<String, BTreeMap<String, toml::Value>>,
    #[serde(default)]
    toolchain: RawToolchain,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPackage {
    name: String,
    version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    generators: Vec<String>,
    #[serde(default = "default_settings")]
    settings: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRequirement {
    Plain(String),
    Detailed {
        #[serde(rename = "ref")]
        reference: String,
        #[serde(default)]
        force: bool,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawToolchain {
    #[serde(default)]
    generator: ToolchainBackend,
}

fn default_settings() -> Vec<String> {
    SettingsAxis::ALL
        .iter()
        .map(|axis| axis.as_str().to_string())
        .collect()
}

impl RawManifest {
    fn into_descriptor(self) -> Result<ManifestDescriptor, ManifestError> {
        let package = Reference::new(self.package.name, self.package.version)?;

        let mut generators = GeneratorSet::empty();
        for tag in &self.package.generators {
            generators |= GeneratorSet::parse_tag(tag)?;
        }

        let settings = self
            .package
            .settings
            .iter()
            .map(|s| s.parse::<SettingsAxis>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = ManifestDescriptor::builder(package)
            .generators(generators)
            .settings(settings)
            .backend(self.toolchain.generator);

        for requirement in self.requires {
            let spec = match requirement {
                RawRequirement::Plain(reference) => DependencySpec::new(reference.parse()?),
                RawRequirement::Detailed { reference, force } => {
                    let spec = DependencySpec::new(reference.parse()?);
                    if force { spec.forced() } else { spec }
                }
            };
            builder = builder.require(spec);
        }

        for (dependency, entries) in &self.options {
            for (name, value) in entries {
                builder = builder.option(
                    dependency.clone(),
                    DependencyOption::from_toml(dependency, name, value)?,
                );
            }
        }

        builder.build()
    }
}

impl From<&ManifestDescriptor> for RawManifest {
    fn from(manifest: &ManifestDescriptor) -> Self {
        let requires = manifest
            .requires
            .iter()
            .map(|spec| {
                if spec.force {
                    RawRequirement::Detailed {
                        reference: spec.reference.to_string(),
                        force: true,
                    }
                } else {
                    RawRequirement::Plain(spec.reference.to_string())
                }
            })
            .collect();

        let mut options: BTreeMap<String, BTreeMap<String, toml::Value>> = BTreeMap::new();
        let direct = manifest
            .requires
            .iter()
            .flat_map(|spec| spec.options.iter().map(move |o| (spec.name(), o)));
        let transitive = manifest
            .transitive_options
            .iter()
            .flat_map(|(name, opts)| opts.iter().map(move |o| (name.as_str(), o)));
        for (name, option) in direct.chain(transitive) {
            options.entry(name.to_string()).or_default().insert(
                option.kind().as_str().to_string(),
                toml::Value::Boolean(option.value()),
            );
        }

        Self {
            requires,
            package: RawPackage {
                name: manifest.package.name().to_string(),
                version: manifest.package.version().to_string(),
                generators: manifest
                    .generators
                    .difference(GeneratorSet::CMAKE_TOOLCHAIN)
                    .tags()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                settings: manifest
                    .settings
                    .iter()
                    .map(|axis| axis.as_str().to_string())
                    .collect(),
            },
            options,
            toolchain: RawToolchain {
                generator: manifest.backend,
            },
        }
    }
}
