// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `graph` and `install`.
//!
//! ```text
//! ManifestArgs --> ManifestProcessor (root + extra manifests, -O options)
//! Config       --> Settings ([settings] then -S), IndexChain, SystemProbe
//! Ctrl+C       --> CancellationToken
//! ```

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::manifest::load_manifest;
use crate::cli::install::{GraphArgs, GraphFormat, InstallArgs, ManifestArgs};
use crate::config::Config;
use crate::error::Result;
use crate::generate::SystemProbe;
use crate::index::IndexChain;
use crate::manifest::settings::Settings;
use crate::processor::{ManifestProcessor, OutputLayout};
use crate::resolver::DependencyGraph;

/// Resolves the manifests and prints the graph.
///
/// # Errors
///
/// Returns manifest, index or resolve errors.
pub async fn run_graph_command(args: &GraphArgs, config: &Config) -> Result<()> {
    let processor = build_processor(&args.manifests)?;
    let settings = effective_settings(config, &args.manifests.settings)?;
    let index = IndexChain::from_config(&config.index)?;

    let mut ctx = processor.context(settings, ctrl_c_token());
    let graph = processor.resolve(&mut ctx, &index).await?;

    match args.format {
        GraphFormat::Text => {
            for line in format_graph(&graph)? {
                println!("{line}");
            }
        }
        GraphFormat::Json => {
            let json = serde_json::to_string_pretty(&graph).context("failed to serialize graph")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Resolves the manifests and writes the toolchain files.
///
/// # Errors
///
/// Returns manifest, index, resolve or generate errors. Nothing is left in
/// the output folder on failure.
pub async fn run_install_command(args: &InstallArgs, config: &Config) -> Result<()> {
    let processor = build_processor(&args.manifests)?.with_backend(args.backend);
    let settings = effective_settings(config, &args.manifests.settings)?;
    let index = IndexChain::from_config(&config.index)?;
    let probe = SystemProbe::new(config.tools.clone());
    let output = OutputLayout::from(&config.paths);

    let installation = processor
        .run(settings, &index, &output, &probe, ctrl_c_token())
        .await?;

    for path in &installation.report.written {
        println!("written    {}", path.display());
    }
    for path in &installation.report.unchanged {
        println!("unchanged  {}", path.display());
    }
    info!(
        packages = installation.graph.len(),
        output = %output.output_dir.display(),
        "Install completed successfully"
    );
    Ok(())
}

/// Loads every manifest; the first becomes the root.
pub(crate) fn build_processor(args: &ManifestArgs) -> Result<ManifestProcessor> {
    let mut paths = args.manifests.iter();
    let root = paths
        .next()
        .context("at least one manifest is required")?;
    let mut processor = ManifestProcessor::new(load_manifest(root)?);
    for path in paths {
        processor = processor.with_manifest(load_manifest(path)?);
    }
    Ok(processor.with_options(args.options.iter().cloned()))
}

/// Profile from `[settings]`, then each `-S` assignment in order.
pub(crate) fn effective_settings(config: &Config, overrides: &[String]) -> Result<Settings> {
    let mut settings = config.settings.to_settings();
    for assignment in overrides {
        settings.apply(assignment)?;
    }
    Ok(settings)
}

/// One line per package, dependencies first.
pub(crate) fn format_graph(graph: &DependencyGraph) -> Result<Vec<String>> {
    let order = graph.topological_order()?;
    let width = order
        .iter()
        .map(|p| p.reference.to_string().len())
        .max()
        .unwrap_or(0);
    Ok(order
        .into_iter()
        .map(|package| {
            let reference = package.reference.to_string();
            let mut line = format!(
                "{reference:<width$}  {:<11}  {}",
                package.artifact, package.package_id
            );
            if !package.requires.is_empty() {
                let requires: Vec<String> =
                    package.requires.iter().map(ToString::to_string).collect();
                line.push_str("  -> ");
                line.push_str(&requires.join(", "));
            }
            line
        })
        .collect())
}

fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, interrupting resolution...");
            cancel.cancel();
        }
    });
    token
}
