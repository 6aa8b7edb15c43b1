// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for cmt-deps.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, IndexConfig, SettingsConfig, ToolsConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::logging::LogLevel;
use crate::manifest::generators::ToolchainBackend;
use crate::manifest::settings::{Arch, BuildType, CompilerKind, Os, Settings};

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Package index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Local index directory, consulted first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<PathBuf>,
    /// Remote index base URLs, consulted in order.
    pub remotes: Vec<String>,
    /// HTTP timeout for remote lookups.
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            local: None,
            remotes: Vec::new(),
            timeout_secs: 30,
        }
    }
}

/// Profile overrides; unset values fall back to host detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Os>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler: Option<CompilerKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cppstd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libcxx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
}

impl SettingsConfig {
    /// Detected host settings with configured overrides applied.
    #[must_use]
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::detect();
        if let Some(os) = self.os {
            settings.os = os;
            settings.compiler = crate::manifest::settings::Compiler::default_for(os);
        }
        if let Some(arch) = self.arch {
            settings.arch = arch;
        }
        if let Some(kind) = self.compiler {
            settings.compiler.kind = kind;
        }
        if let Some(ref version) = self.compiler_version {
            settings.compiler.version.clone_from(version);
        }
        if let Some(ref cppstd) = self.cppstd {
            settings.compiler.cppstd = Some(cppstd.clone());
        }
        if let Some(ref libcxx) = self.libcxx {
            settings.compiler.libcxx = Some(libcxx.clone());
        }
        if let Some(build_type) = self.build_type {
            settings.build_type = build_type;
        }
        settings
    }
}

/// Backend executable overrides.
///
/// An empty path means "look it up in PATH".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub ninja: PathBuf,
    pub make: PathBuf,
    pub nmake: PathBuf,
    pub msbuild: PathBuf,
    pub xcodebuild: PathBuf,
}

impl ToolsConfig {
    /// Configured executable for a backend, if any.
    #[must_use]
    pub fn program_for(&self, backend: ToolchainBackend) -> Option<&Path> {
        let path = match backend {
            ToolchainBackend::Ninja => &self.ninja,
            ToolchainBackend::UnixMakefiles => &self.make,
            ToolchainBackend::NMakeMakefiles => &self.nmake,
            ToolchainBackend::VisualStudio17 => &self.msbuild,
            ToolchainBackend::Xcode => &self.xcodebuild,
        };
        (!path.as_os_str().is_empty()).then_some(path.as_path())
    }
}

/// Validates that a timeout is usable.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for a zero timeout.
pub fn validate_timeout(timeout_secs: u64) -> Result<(), ConfigError> {
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            section: "index".to_string(),
            key: "timeout_secs".to_string(),
            message: "timeout must be at least 1 second".to_string(),
        });
    }
    Ok(())
}
