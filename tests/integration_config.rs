// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML files on disk.

use std::path::Path;

use cmt_deps::config::Config;
use cmt_deps::config::loader::ConfigLoader;
use cmt_deps::logging::LogLevel;
use cmt_deps::manifest::generators::ToolchainBackend;
use cmt_deps::manifest::settings::{BuildType, CompilerKind, Os};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading from files
// =============================================================================

#[test]
fn config_from_file_all_sections() {
    let dir = temp_dir();
    let path = write(
        dir.path(),
        "cmt.toml",
        r#"
[global]
output_log_level = 2
log_file = "cmt.log"

[paths]
output = "out/toolchain"
cache = "/var/cache/cmt"

[index]
local = "/srv/recipes"
remotes = ["https://recipes.example.com"]
timeout_secs = 10

[settings]
os = "Windows"
build_type = "RelWithDebInfo"

[tools]
ninja = "/opt/ninja/bin/ninja"
"#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.global.output_log_level, LogLevel::WARN);
    assert!(config.paths.output.is_absolute());
    assert!(config.paths.output.ends_with("out/toolchain"));
    assert_eq!(config.index.remotes, ["https://recipes.example.com"]);
    assert_eq!(config.index.timeout_secs, 10);
    assert_eq!(
        config.tools.program_for(ToolchainBackend::Ninja),
        Some(Path::new("/opt/ninja/bin/ninja"))
    );
    assert_eq!(config.tools.program_for(ToolchainBackend::UnixMakefiles), None);

    let settings = config.settings.to_settings();
    assert_eq!(settings.os, Os::Windows);
    assert_eq!(settings.compiler.kind, CompilerKind::Msvc);
    assert_eq!(settings.build_type, BuildType::RelWithDebInfo);
}

#[test]
fn config_missing_required_file() {
    let dir = temp_dir();
    let result = Config::from_file(dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn config_missing_optional_file_uses_defaults() {
    let dir = temp_dir();
    let config = ConfigLoader::new()
        .add_toml_file_optional(dir.path().join("cmt.toml"))
        .build()
        .unwrap();
    assert_eq!(config.index.timeout_secs, 30);
    assert!(config.paths.output.ends_with("build/cmt"));
    assert!(config.paths.cache.ends_with(".cmt/cache"));
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_override_earlier() {
    let dir = temp_dir();
    let base = write(
        dir.path(),
        "base.toml",
        r#"
[index]
local = "/srv/recipes"
timeout_secs = 60

[settings]
build_type = "Debug"
"#,
    );
    let ci = write(
        dir.path(),
        "ci.toml",
        r#"
[index]
timeout_secs = 5
"#,
    );

    let config = ConfigLoader::new()
        .add_toml_file(&base)
        .add_toml_file(&ci)
        .build()
        .unwrap();
    assert_eq!(config.index.timeout_secs, 5);
    assert_eq!(config.index.local.as_deref(), Some(Path::new("/srv/recipes")));
    assert_eq!(config.settings.build_type, Some(BuildType::Debug));
}

#[test]
fn config_overrides_beat_files() {
    let dir = temp_dir();
    let base = write(dir.path(), "base.toml", "[settings]\nbuild_type = \"Debug\"\n");

    let config = ConfigLoader::new()
        .add_toml_file(&base)
        .with_overrides(&["settings/build_type=MinSizeRel", "paths/output=elsewhere"])
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.settings.build_type, Some(BuildType::MinSizeRel));
    assert!(config.paths.output.ends_with("elsewhere"));
}

#[test]
fn config_env_layering() {
    // SAFETY: the prefix is unique to this test, so no other test reads
    // or writes these variables.
    unsafe {
        std::env::set_var(
            "CMTENVTEST_INDEX__REMOTES",
            "https://a.example.com,https://b.example.com",
        );
        std::env::set_var("CMTENVTEST_INDEX__TIMEOUT_SECS", "7");
    }

    let result = ConfigLoader::new()
        .add_toml_str("[index]\ntimeout_secs = 60\nremotes = [\"https://file.example.com\"]\n")
        .with_env_prefix("CMTENVTEST")
        .build();

    // SAFETY: see above.
    unsafe {
        std::env::remove_var("CMTENVTEST_INDEX__REMOTES");
        std::env::remove_var("CMTENVTEST_INDEX__TIMEOUT_SECS");
    }

    let config = result.unwrap();
    assert_eq!(
        config.index.remotes,
        ["https://a.example.com", "https://b.example.com"]
    );
    assert_eq!(config.index.timeout_secs, 7);
}

#[test]
fn config_malformed_override() {
    let result = ConfigLoader::new().with_overrides(&["timeout_secs=5"]);
    assert!(result.is_err());
}

#[test]
fn config_loaded_files_listing() {
    let dir = temp_dir();
    let base = write(dir.path(), "base.toml", "");
    let loader = ConfigLoader::new()
        .add_toml_file_optional(dir.path().join("cmt.toml"))
        .add_toml_file(&base);

    let listing = loader.format_loaded_files();
    assert_eq!(listing.len(), loader.loaded_files().len());
    assert!(listing.last().unwrap().ends_with("base.toml"));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn config_unknown_section_rejected() {
    let dir = temp_dir();
    let path = write(dir.path(), "cmt.toml", "[profiles.default]\ncompiler = \"gcc\"\n");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn config_invalid_enum_value_rejected() {
    let dir = temp_dir();
    let path = write(dir.path(), "cmt.toml", "[settings]\nbuild_type = \"Fast\"\n");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn config_zero_timeout_rejected() {
    let err = Config::parse("[index]\ntimeout_secs = 0\n").unwrap_err();
    assert!(format!("{err:#}").contains("timeout_secs"));
}

// =============================================================================
// Options listing
// =============================================================================

#[test]
fn config_format_options_index_section() {
    let config = Config::parse(
        r#"
[index]
local = "/srv/recipes"
remotes = ["https://a.example.com", "https://b.example.com"]
"#,
    )
    .unwrap();

    let index: Vec<_> = config
        .format_options()
        .into_iter()
        .filter(|line| line.starts_with("index."))
        .map(|line| line.trim_end().to_string())
        .collect();
    insta::assert_snapshot!(index.join("\n"), @r"
    index.local               = /srv/recipes
    index.remotes             = https://a.example.com, https://b.example.com
    index.timeout_secs        = 30
    ");
}
