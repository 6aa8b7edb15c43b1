// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line interface.
//!
//! # Command Structure
//!
//! ```text
//! cmt-deps [global options] <command>
//! version
//! options
//! inis
//! new [--variant runtime|testing] [--force] [PATH]
//! inspect [MANIFEST]
//! graph [MANIFEST...] [--format text|json]
//! install [MANIFEST...] [-S axis=value]... [-O dep:opt=value]... [-g BACKEND]
//! search PATTERN
//! ```

pub mod global;
pub mod install;
pub mod manifest;


use crate::cli::global::GlobalOptions;
use crate::cli::install::{GraphArgs, InstallArgs, SearchArgs};
use crate::cli::manifest::{InspectArgs, NewArgs};
use clap::{Parser, Subcommand};

/// Manifest file looked up when none is given.
pub const DEFAULT_MANIFEST: &str = "cmtdeps.toml";

/// CMake Tools Dependency Manifest Processor
///
/// Resolves a dependency manifest and emits `CMake` toolchain files.
#[derive(Debug, Parser)]
#[command(
    name = "cmt-deps",
    author,
    version,
    about = "CMake Tools Dependency Manifest Processor",
    long_about = "cmt-deps Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Resolves the requirements declared in a dependency manifest\n\
                  against the configured recipe indexes and writes a CMake\n\
                  toolchain file, presets and package config files.\n\n\
                  `cmt-deps new` writes a starter manifest, `cmt-deps install`\n\
                  runs the full pipeline. See `cmt-deps <command> --help`.",
    after_help = "CONFIG FILES:\n\n\
                  cmt-deps loads `cmt.toml` from the current directory unless\n\
                  --no-default-inis is given. Files passed with --ini are loaded\n\
                  after it and override it. CMT_* environment variables (e.g. CMT_INDEX__LOCAL)\n\
                  and --set overrides are applied last."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the config files that were loaded.
    Inis,

    /// Writes a built-in manifest.
    New(NewArgs),

    /// Shows a parsed manifest.
    Inspect(InspectArgs),

    /// Resolves manifests and prints the dependency graph.
    Graph(GraphArgs),

    /// Resolves manifests and generates toolchain files.
    Install(InstallArgs),

    /// Searches the configured recipe indexes.
    Search(SearchArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
