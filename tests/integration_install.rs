// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the full install pipeline.
//!
//! Drives `ManifestProcessor::run` against an in-memory index, a fake
//! backend probe and a temporary output folder, covering:
//! - Byte-identical regeneration
//! - Header-only boost
//! - Unresolvable references leaving nothing on disk
//! - Missing backend leaving nothing on disk
//! - Version conflicts across manifests and forced overrides
//! - Declaration order independence

use std::path::{Path, PathBuf};

use cmt_deps::error::{GenerateError, ResolveError};
use cmt_deps::index::{MemoryIndex, PackageType, Recipe};
use cmt_deps::manifest::ManifestDescriptor;
use cmt_deps::manifest::generators::ToolchainBackend;
use cmt_deps::manifest::options::OptionKind;
use cmt_deps::manifest::presets;
use cmt_deps::manifest::settings::Settings;
use cmt_deps::processor::{Installation, ManifestProcessor, OutputLayout};
use cmt_deps::resolver::ArtifactKind;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn layout(dir: &TempDir) -> OutputLayout {
    OutputLayout {
        output_dir: dir.path().join("build").join("cmt"),
        cache_root: dir.path().join("cache"),
    }
}

fn settings() -> Settings {
    let mut settings = Settings::detect();
    for assignment in ["os=Linux", "arch=x86_64", "compiler=gcc", "build_type=Release"] {
        settings.apply(assignment).unwrap();
    }
    settings
}

fn index() -> MemoryIndex {
    let recipes = [
        Recipe::new("boost", "1.80.0")
            .cmake_names("Boost", "Boost::boost")
            .option(OptionKind::HeaderOnly, false)
            .option(OptionKind::Shared, false)
            .libs(["boost_system", "boost_filesystem"]),
        Recipe::new("spdlog", "1.10.0")
            .require("fmt/8.1.1".parse().unwrap())
            .option(OptionKind::Shared, false)
            .libs(["spdlog"]),
        Recipe::new("fmt", "8.1.1").option(OptionKind::Fpic, true).libs(["fmt"]),
        Recipe::new("fmt", "9.1.0").option(OptionKind::Fpic, true).libs(["fmt"]),
        Recipe::new("cli11", "2.2.0")
            .cmake_names("CLI11", "CLI11::CLI11")
            .package_type(PackageType::HeaderLibrary),
        Recipe::new("xxhash", "0.8.1").libs(["xxhash"]),
        Recipe::new("catch2", "3.1.0")
            .cmake_names("Catch2", "Catch2::Catch2WithMain")
            .libs(["Catch2Main", "Catch2"]),
    ];
    let mut index = MemoryIndex::new();
    for recipe in recipes {
        index.insert(recipe).unwrap();
    }
    index
}

fn ninja_found(backend: ToolchainBackend) -> Option<PathBuf> {
    (backend == ToolchainBackend::Ninja).then(|| PathBuf::from("/usr/bin/ninja"))
}

fn nothing_found(_: ToolchainBackend) -> Option<PathBuf> {
    None
}

fn manifest(requires: &str) -> ManifestDescriptor {
    ManifestDescriptor::parse(&format!(
        "requires = [{requires}]\n\
         [package]\nname = \"app\"\nversion = \"1.0\"\ngenerators = [\"CMakeDeps\"]\n"
    ))
    .unwrap()
}

async fn install(
    processor: &ManifestProcessor,
    output: &OutputLayout,
) -> cmt_deps::error::Result<Installation> {
    processor
        .run(settings(), &index(), output, &ninja_found, CancellationToken::new())
        .await
}

fn snapshot_dir(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let path = e.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            (name, std::fs::read(&path).unwrap())
        })
        .collect();
    files.sort();
    files
}

// =============================================================================
// Idempotence
// =============================================================================

#[tokio::test]
async fn install_twice_is_byte_identical() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(presets::runtime().unwrap());

    let first = install(&processor, &output).await.unwrap();
    assert_eq!(first.report.written.len(), 2 + 2 * 5);
    let before = snapshot_dir(&output.output_dir);

    let second = install(&processor, &output).await.unwrap();
    assert!(second.report.written.is_empty());
    assert_eq!(second.report.unchanged.len(), first.report.written.len());
    assert_eq!(snapshot_dir(&output.output_dir), before);
}

#[tokio::test]
async fn install_changed_settings_rewrites_only_affected_files() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(presets::runtime().unwrap());
    install(&processor, &output).await.unwrap();

    let mut debug = settings();
    debug.apply("build_type=Debug").unwrap();
    let report = processor
        .run(debug, &index(), &output, &ninja_found, CancellationToken::new())
        .await
        .unwrap()
        .report;

    let written: Vec<String> = report
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(written.contains(&"cmt_toolchain.cmake".to_string()));
    assert!(written.contains(&"spdlog-config.cmake".to_string()));
    // Header-only package ids ignore settings.
    assert!(!written.contains(&"boost-config.cmake".to_string()));
    assert!(!written.contains(&"cli11-config.cmake".to_string()));
}

// =============================================================================
// Header-only boost
// =============================================================================

#[tokio::test]
async fn install_runtime_boost_is_header_only() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(presets::runtime().unwrap());
    let installation = install(&processor, &output).await.unwrap();

    let boost = installation.graph.get("boost").unwrap();
    assert_eq!(boost.artifact, ArtifactKind::HeaderOnly);

    let config = std::fs::read_to_string(output.output_dir.join("boost-config.cmake")).unwrap();
    assert!(!config.contains("find_library"));
    assert!(!config.contains("boost_system"));

    let mut other = settings();
    other.apply("compiler=clang").unwrap();
    other.apply("build_type=Debug").unwrap();
    let elsewhere = processor
        .run(other, &index(), &layout(&temp_dir()), &ninja_found, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(elsewhere.graph.get("boost").unwrap().package_id, boost.package_id);
}

#[tokio::test]
async fn install_testing_variant_links_boost_libraries() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(presets::testing().unwrap());
    install(&processor, &output).await.unwrap();

    let config = std::fs::read_to_string(output.output_dir.join("boost-config.cmake")).unwrap();
    assert!(config.contains("find_library(Boost_BOOST_SYSTEM_LIBRARY NAMES boost_system"));
    assert!(output.output_dir.join("catch2-config.cmake").is_file());
}

// =============================================================================
// Failures leave nothing behind
// =============================================================================

#[tokio::test]
async fn install_unresolvable_writes_nothing() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(manifest(r#""boost/1.80.0", "nonexistent/9.9.9""#));

    let err = install(&processor, &output).await.unwrap_err();
    let resolve = err.downcast_ref::<ResolveError>().unwrap();
    insta::assert_snapshot!(resolve.to_string(), @"unresolvable dependency 'nonexistent/9.9.9' (required by app/1.0)");
    assert!(!dir.path().join("build").exists());
}

#[tokio::test]
async fn install_backend_unavailable_writes_nothing() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(presets::runtime().unwrap());

    let err = processor
        .run(settings(), &index(), &output, &nothing_found, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GenerateError>(),
        Some(GenerateError::BackendUnavailable { .. })
    ));
    assert!(!dir.path().join("build").exists());
}

#[tokio::test]
async fn install_backend_override_is_probed() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(presets::runtime().unwrap())
        .with_backend(Some(ToolchainBackend::UnixMakefiles));

    let err = install(&processor, &output).await.unwrap_err();
    insta::assert_snapshot!(
        err.downcast_ref::<GenerateError>().unwrap().to_string(),
        @"toolchain backend 'Unix Makefiles' is unavailable ('make' not found in PATH)"
    );
}

#[tokio::test]
async fn install_failure_keeps_previous_output() {
    let dir = temp_dir();
    let output = layout(&dir);
    install(&ManifestProcessor::new(presets::runtime().unwrap()), &output)
        .await
        .unwrap();
    let before = snapshot_dir(&output.output_dir);

    let broken = ManifestProcessor::new(manifest(r#""nonexistent/9.9.9""#));
    assert!(install(&broken, &output).await.is_err());
    assert_eq!(snapshot_dir(&output.output_dir), before);
}

// =============================================================================
// Conflicts across manifests
// =============================================================================

#[tokio::test]
async fn install_conflicting_manifests_fail() {
    let dir = temp_dir();
    let processor = ManifestProcessor::new(manifest(r#""spdlog/1.10.0""#))
        .with_manifest(manifest(r#""fmt/9.1.0""#));

    let err = install(&processor, &layout(&dir)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ResolveError>(),
        Some(ResolveError::ConflictingVersionConstraint { .. })
    ));
}

#[tokio::test]
async fn install_forced_override_wins() {
    let dir = temp_dir();
    let output = layout(&dir);
    let processor = ManifestProcessor::new(manifest(r#""spdlog/1.10.0""#))
        .with_manifest(manifest(r#"{ ref = "fmt/9.1.0", force = true }"#));

    let installation = install(&processor, &output).await.unwrap();
    assert_eq!(installation.graph.get("fmt").unwrap().reference.version(), "9.1.0");

    let version =
        std::fs::read_to_string(output.output_dir.join("fmt-config-version.cmake")).unwrap();
    assert!(version.contains("set(PACKAGE_VERSION \"9.1.0\")"));
}

// =============================================================================
// Declaration order
// =============================================================================

#[tokio::test]
async fn install_declaration_order_does_not_matter() {
    let dir = temp_dir();
    let forward = OutputLayout {
        output_dir: dir.path().join("forward"),
        cache_root: dir.path().join("cache"),
    };
    let backward = OutputLayout {
        output_dir: dir.path().join("backward"),
        cache_root: dir.path().join("cache"),
    };
    let a = ManifestProcessor::new(manifest(
        r#""boost/1.80.0", "spdlog/1.10.0", "cli11/2.2.0", "xxhash/0.8.1""#,
    ));
    let b = ManifestProcessor::new(manifest(
        r#""xxhash/0.8.1", "cli11/2.2.0", "spdlog/1.10.0", "boost/1.80.0""#,
    ));

    let first = install(&a, &forward).await.unwrap();
    let second = install(&b, &backward).await.unwrap();

    let ids = |i: &Installation| -> Vec<(String, String)> {
        i.graph
            .iter()
            .map(|p| (p.reference.to_string(), p.package_id.clone()))
            .collect()
    };
    assert_eq!(ids(&first), ids(&second));

    // Only the presets file embeds the output folder.
    let strip = |files: Vec<(String, Vec<u8>)>| -> Vec<(String, Vec<u8>)> {
        files
            .into_iter()
            .filter(|(name, _)| name != "CMakePresets.json")
            .collect()
    };
    assert_eq!(
        strip(snapshot_dir(&forward.output_dir)),
        strip(snapshot_dir(&backward.output_dir))
    );
}
