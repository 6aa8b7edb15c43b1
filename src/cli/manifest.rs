// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the manifest-only commands.
//!
//! ```text
//! $ cmt-deps new                      # runtime variant -> ./cmtdeps.toml
//! $ cmt-deps new --variant testing tests/cmtdeps.toml
//! $ cmt-deps inspect tests/cmtdeps.toml
//! ```

use std::path::PathBuf;

use clap::Args;

use super::DEFAULT_MANIFEST;
use crate::manifest::presets::Variant;

/// Arguments for the `new` command.
#[derive(Debug, Clone, Args)]
pub struct NewArgs {
    /// Built-in manifest to write.
    #[arg(long, value_enum, default_value_t = Variant::Runtime)]
    pub variant: Variant,

    /// Overwrites an existing file.
    #[arg(short, long)]
    pub force: bool,

    #[arg(value_name = "PATH", default_value = DEFAULT_MANIFEST)]
    pub path: PathBuf,
}

/// Arguments for the `inspect` command.
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    #[arg(value_name = "MANIFEST", default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
}
