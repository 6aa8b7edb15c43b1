// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `new` and `inspect`.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::bail;
use tracing::info;

use crate::cli::manifest::{InspectArgs, NewArgs};
use crate::error::{FsError, Result};
use crate::manifest::{ManifestDescriptor, presets};

/// Writes the selected built-in manifest.
///
/// # Errors
///
/// Fails if the file exists and `--force` was not given, or on I/O errors.
pub fn run_new_command(args: &NewArgs) -> Result<()> {
    write_preset(args)?;
    println!("Wrote {} manifest to {}", args.variant, args.path.display());
    Ok(())
}

pub(crate) fn write_preset(args: &NewArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "'{}' already exists (use --force to overwrite)",
            args.path.display()
        );
    }
    let content = presets::manifest(args.variant)?.to_toml()?;
    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| FsError::from_io(parent.display().to_string(), e))?;
    }
    std::fs::write(&args.path, content)
        .map_err(|e| FsError::from_io(args.path.display().to_string(), e))?;
    info!(variant = %args.variant, path = %args.path.display(), "Manifest written");
    Ok(())
}

/// Prints a parsed manifest.
///
/// # Errors
///
/// Returns the manifest's read or parse error.
pub fn run_inspect_command(args: &InspectArgs) -> Result<()> {
    let manifest = load_manifest(&args.manifest)?;
    for line in describe(&manifest) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn load_manifest(path: &Path) -> Result<ManifestDescriptor> {
    let manifest = ManifestDescriptor::from_file(path)?;
    info!(path = %path.display(), package = %manifest.package(), "Manifest loaded");
    Ok(manifest)
}

/// Human readable summary, one item per line.
pub(crate) fn describe(manifest: &ManifestDescriptor) -> Vec<String> {
    let axes: Vec<String> = manifest.settings().iter().map(ToString::to_string).collect();
    let mut lines = vec![
        format!("package:    {}", manifest.package()),
        format!("generators: {}", manifest.generators().tags().join(", ")),
        format!("settings:   {}", axes.join(", ")),
        format!("backend:    {}", manifest.backend()),
        "requires:".to_string(),
    ];
    for spec in manifest.requires() {
        let mut line = format!("  {}", spec.reference());
        if spec.is_forced() {
            line.push_str(" (force)");
        }
        for option in spec.options() {
            let _ = write!(line, " {option}");
        }
        lines.push(line);
    }
    if !manifest.transitive_options().is_empty() {
        lines.push("options:".to_string());
        for (name, options) in manifest.transitive_options() {
            let options: Vec<String> = options.iter().map(ToString::to_string).collect();
            lines.push(format!("  {name}: {}", options.join(" ")));
        }
    }
    lines
}
