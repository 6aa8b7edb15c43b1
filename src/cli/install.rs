// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the commands that talk to recipe indexes.
//!
//! # Architecture
//!
//! ```text
//! cmt-deps graph   [MANIFEST...]   resolve only, print graph
//! cmt-deps install [MANIFEST...]   resolve + generate
//! cmt-deps search  PATTERN         glob over name/version
//!
//! The first MANIFEST is the root; the others add requirements.
//!
//! USAGE:
//! $ cmt-deps install -S build_type=Debug -O boost:header_only=False
//! $ cmt-deps install cmtdeps.toml tests/cmtdeps.toml -g "Unix Makefiles"
//! $ cmt-deps graph --format json
//! $ cmt-deps search 'boost/*'
//! ```

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::DEFAULT_MANIFEST;
use crate::manifest::generators::ToolchainBackend;
use crate::manifest::options::OptionAssignment;

/// Manifest paths shared by `graph` and `install`.
#[derive(Debug, Clone, Args)]
pub struct ManifestArgs {
    /// Manifests to process; the first one is the root.
    #[arg(value_name = "MANIFEST", default_value = DEFAULT_MANIFEST)]
    pub manifests: Vec<PathBuf>,

    /// Setting override such as 'build_type=Debug' or 'compiler.cppstd=20'.
    #[arg(short = 'S', long = "settings", value_name = "AXIS=VALUE", action = clap::ArgAction::Append)]
    pub settings: Vec<String>,

    /// Dependency option such as 'boost:header_only=True'.
    #[arg(short = 'O', long = "options", value_name = "DEP:OPTION=VALUE", action = clap::ArgAction::Append)]
    pub options: Vec<OptionAssignment>,
}

/// Output format of the `graph` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GraphFormat {
    /// One line per package, dependencies first.
    #[default]
    Text,
    /// The resolved graph as pretty JSON.
    Json,
}

/// Arguments for the `graph` command.
#[derive(Debug, Clone, Args)]
pub struct GraphArgs {
    #[command(flatten)]
    pub manifests: ManifestArgs,

    #[arg(long, value_enum, default_value_t = GraphFormat::Text)]
    pub format: GraphFormat,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Args)]
pub struct InstallArgs {
    #[command(flatten)]
    pub manifests: ManifestArgs,

    /// Build-file generator, overriding the root manifest's.
    #[arg(short = 'g', long = "generator", value_name = "BACKEND")]
    pub backend: Option<ToolchainBackend>,
}

/// Arguments for the `search` command.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Glob matched against 'name/version' (or the name alone if it has no '/').
    #[arg(value_name = "PATTERN")]
    pub pattern: String,
}
