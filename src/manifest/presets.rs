// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Built-in manifest variants.
//!
//! ```text
//! runtime   boost (header-only), spdlog, cli11, xxhash
//! testing   runtime requirements + catch2, default options only
//! ```

use std::fmt;

use clap::ValueEnum;

use super::generators::{GeneratorSet, ToolchainBackend};
use super::options::DependencyOption;
use super::reference::Reference;
use super::settings::SettingsAxis;
use super::{DependencySpec, ManifestDescriptor};
use crate::error::ManifestError;

pub const PACKAGE_NAME: &str = "cmake-tools-conan-integration";
pub const PACKAGE_VERSION: &str = "0.0.1";

const RUNTIME_REQUIRES: &[(&str, &str)] = &[
    ("boost", "1.80.0"),
    ("spdlog", "1.10.0"),
    ("cli11", "2.2.0"),
    ("xxhash", "0.8.1"),
];

const TESTING_REQUIRES: &[(&str, &str)] = &[("catch2", "3.1.0")];

/// Which built-in manifest to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Runtime and header dependencies, boost consumed header-only.
    #[default]
    Runtime,
    /// Runtime dependencies plus the test/benchmark framework.
    Testing,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime => f.write_str("runtime"),
            Self::Testing => f.write_str("testing"),
        }
    }
}

/// Builds the manifest for `variant`.
///
/// # Errors
///
/// Only fails if the built-in references are invalid.
pub fn manifest(variant: Variant) -> Result<ManifestDescriptor, ManifestError> {
    match variant {
        Variant::Runtime => runtime(),
        Variant::Testing => testing(),
    }
}

/// Runtime manifest: boost is forced header-only before resolution.
///
/// # Errors
///
/// Only fails if the built-in references are invalid.
pub fn runtime() -> Result<ManifestDescriptor, ManifestError> {
    base(RUNTIME_REQUIRES)?
        .option("boost", DependencyOption::HeaderOnly(true))
        .build()
}

/// Testing manifest: adds catch2 and keeps every default build option.
///
/// # Errors
///
/// Only fails if the built-in references are invalid.
pub fn testing() -> Result<ManifestDescriptor, ManifestError> {
    let requires: Vec<_> = RUNTIME_REQUIRES
        .iter()
        .chain(TESTING_REQUIRES)
        .copied()
        .collect();
    base(&requires)?.build()
}

fn base(requires: &[(&str, &str)]) -> Result<super::ManifestBuilder, ManifestError> {
    let mut builder = ManifestDescriptor::builder(Reference::new(PACKAGE_NAME, PACKAGE_VERSION)?)
        .generators(GeneratorSet::CMAKE_DEPS)
        .settings(SettingsAxis::ALL)
        .backend(ToolchainBackend::Ninja);
    for (name, version) in requires {
        builder = builder.require(DependencySpec::new(Reference::new(*name, *version)?));
    }
    Ok(builder)
}
