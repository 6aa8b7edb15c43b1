// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for cmt-deps.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. cmt.toml (cwd, unless --no-default-inis)
//! 3. --ini
//! 4. CMT_* env vars
//! 5. --set / CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! CMT_GLOBAL__OUTPUT_LOG_LEVEL=4    → global.output_log_level = 4
//! CMT_INDEX__LOCAL=/srv/recipes     → index.local = "/srv/recipes"
//! CMT_INDEX__REMOTES=https://a,https://b
//! CMT_SETTINGS__BUILD_TYPE=Debug    → settings.build_type = "Debug"
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{GlobalConfig, IndexConfig, SettingsConfig, ToolsConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Output and cache locations.
    pub paths: PathsConfig,
    /// Package index sources.
    pub index: IndexConfig,
    /// Profile overrides.
    pub settings: SettingsConfig,
    /// Backend executable overrides.
    pub tools: ToolsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cmt_deps::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("cmt.toml")
    ///     .with_env_prefix("CMT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be made absolute or a value is out
    /// of range.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve()?;
        types::validate_timeout(self.index.timeout_secs)?;
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered and column aligned.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_index_options(&mut options);
        self.format_settings_options(&mut options);
        self.format_tools_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file".into(), fmt_path(self.global.log_file.as_ref()));
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("paths.output".into(), self.paths.output.display().to_string());
        options.insert("paths.cache".into(), self.paths.cache.display().to_string());
    }

    fn format_index_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("index.local".into(), fmt_path(self.index.local.as_ref()));
        options.insert("index.remotes".into(), self.index.remotes.join(", "));
        options.insert(
            "index.timeout_secs".into(),
            self.index.timeout_secs.to_string(),
        );
    }

    fn format_settings_options(&self, options: &mut BTreeMap<String, String>) {
        let effective = self.settings.to_settings();
        options.insert("settings.os".into(), effective.os.to_string());
        options.insert("settings.arch".into(), effective.arch.to_string());
        options.insert("settings.compiler".into(), effective.compiler.kind.to_string());
        options.insert(
            "settings.compiler_version".into(),
            effective.compiler.version.clone(),
        );
        options.insert(
            "settings.cppstd".into(),
            effective.compiler.cppstd.unwrap_or_default(),
        );
        options.insert(
            "settings.libcxx".into(),
            effective.compiler.libcxx.unwrap_or_default(),
        );
        options.insert("settings.build_type".into(), effective.build_type.to_string());
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("tools.ninja".into(), self.tools.ninja.display().to_string());
        options.insert("tools.make".into(), self.tools.make.display().to_string());
        options.insert("tools.nmake".into(), self.tools.nmake.display().to_string());
        options.insert(
            "tools.msbuild".into(),
            self.tools.msbuild.display().to_string(),
        );
        options.insert(
            "tools.xcodebuild".into(),
            self.tools.xcodebuild.display().to_string(),
        );
    }
}

fn fmt_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(String::new, |p| p.display().to_string())
}
