// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment axes and their values.
//!
//! # Axes
//!
//! ```text
//! os          Linux | Windows | Macos | FreeBSD
//! arch        x86 | x86_64 | armv8
//! compiler    gcc | clang | apple-clang | msvc  (+ version, cppstd, libcxx)
//! build_type  Debug | Release (default) | RelWithDebInfo | MinSizeRel
//! ```
//!
//! A manifest names the axes it depends on; only those take part in the
//! package id and the generated toolchain.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ManifestError};

/// One environment axis a manifest can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsAxis {
    Os,
    Arch,
    Compiler,
    BuildType,
}

impl SettingsAxis {
    pub const ALL: [Self; 4] = [Self::Os, Self::Arch, Self::Compiler, Self::BuildType];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::Arch => "arch",
            Self::Compiler => "compiler",
            Self::BuildType => "build_type",
        }
    }
}

impl FromStr for SettingsAxis {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "os" => Ok(Self::Os),
            "arch" => Ok(Self::Arch),
            "compiler" => Ok(Self::Compiler),
            "build_type" => Ok(Self::BuildType),
            _ => Err(ManifestError::UnknownSetting(s.to_string())),
        }
    }
}

impl fmt::Display for SettingsAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn invalid_setting(key: &str, expected: &str, got: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: "settings".to_string(),
        key: key.to_string(),
        message: format!("expected {expected}, got '{got}'"),
    }
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    #[serde(rename = "FreeBSD")]
    FreeBsd,
}

impl Os {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Macos => "Macos",
            Self::FreeBsd => "FreeBSD",
        }
    }

    /// The running host's OS, falling back to Linux.
    #[must_use]
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::Macos,
            "freebsd" => Self::FreeBsd,
            _ => Self::Linux,
        }
    }
}

impl FromStr for Os {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::Macos),
            "freebsd" => Ok(Self::FreeBsd),
            _ => Err(invalid_setting(
                "os",
                "'Linux', 'Windows', 'Macos' or 'FreeBSD'",
                s,
            )),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X86,
    X86_64,
    Armv8,
}

impl Arch {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Armv8 => "armv8",
        }
    }

    /// The running host's architecture, falling back to `x86_64`.
    #[must_use]
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::X86,
            "aarch64" => Self::Armv8,
            _ => Self::X86_64,
        }
    }
}

impl FromStr for Arch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86" | "i686" => Ok(Self::X86),
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            "armv8" | "aarch64" | "arm64" => Ok(Self::Armv8),
            _ => Err(invalid_setting("arch", "'x86', 'x86_64' or 'armv8'", s)),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerKind {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl CompilerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
        }
    }

    /// C and C++ compiler executables for the toolchain file.
    #[must_use]
    pub const fn executables(self) -> (&'static str, &'static str) {
        match self {
            Self::Gcc => ("gcc", "g++"),
            Self::Clang | Self::AppleClang => ("clang", "clang++"),
            Self::Msvc => ("cl", "cl"),
        }
    }
}

impl FromStr for CompilerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcc" => Ok(Self::Gcc),
            "clang" => Ok(Self::Clang),
            "apple-clang" => Ok(Self::AppleClang),
            "msvc" => Ok(Self::Msvc),
            _ => Err(invalid_setting(
                "compiler",
                "'gcc', 'clang', 'apple-clang' or 'msvc'",
                s,
            )),
        }
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiler setting with its sub-settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
    pub kind: CompilerKind,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cppstd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libcxx: Option<String>,
}

impl Compiler {
    /// Typical default compiler for an OS.
    #[must_use]
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Windows => Self {
                kind: CompilerKind::Msvc,
                version: "193".to_string(),
                cppstd: Some("17".to_string()),
                libcxx: None,
            },
            Os::Macos => Self {
                kind: CompilerKind::AppleClang,
                version: "14".to_string(),
                cppstd: Some("17".to_string()),
                libcxx: Some("libc++".to_string()),
            },
            Os::FreeBsd => Self {
                kind: CompilerKind::Clang,
                version: "14".to_string(),
                cppstd: Some("17".to_string()),
                libcxx: Some("libc++".to_string()),
            },
            Os::Linux => Self {
                kind: CompilerKind::Gcc,
                version: "12".to_string(),
                cppstd: Some("17".to_string()),
                libcxx: Some("libstdc++11".to_string()),
            },
        }
    }
}

/// Build configuration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            "relwithdebinfo" => Ok(Self::RelWithDebInfo),
            "minsizerel" => Ok(Self::MinSizeRel),
            _ => Err(invalid_setting(
                "build_type",
                "'Debug', 'Release', 'RelWithDebInfo' or 'MinSizeRel'",
                s,
            )),
        }
    }
}

/// Concrete values for every axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub arch: Arch,
    pub compiler: Compiler,
    pub build_type: BuildType,
}

impl Default for Settings {
    fn default() -> Self {
        Self::detect()
    }
}

impl Settings {
    /// Detects a profile for the running host.
    #[must_use]
    pub fn detect() -> Self {
        let os = Os::host();
        Self {
            os,
            arch: Arch::host(),
            compiler: Compiler::default_for(os),
            build_type: BuildType::default(),
        }
    }

    /// Applies a `key=value` assignment such as `compiler.cppstd=20`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown keys or values.
    pub fn apply(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
            section: "settings".to_string(),
            key: assignment.to_string(),
            message: "expected 'key=value'".to_string(),
        })?;
        let value = value.trim();
        match key.trim() {
            "os" => self.os = value.parse()?,
            "arch" => self.arch = value.parse()?,
            "compiler" => self.compiler.kind = value.parse()?,
            "compiler.version" => self.compiler.version = value.to_string(),
            "compiler.cppstd" => self.compiler.cppstd = non_empty(value),
            "compiler.libcxx" => self.compiler.libcxx = non_empty(value),
            "build_type" => self.build_type = value.parse()?,
            other => {
                return Err(ConfigError::InvalidValue {
                    section: "settings".to_string(),
                    key: other.to_string(),
                    message: "unknown setting".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Flattened values for the given axes, keyed like `compiler.version`.
    #[must_use]
    pub fn values_for(&self, axes: &BTreeSet<SettingsAxis>) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        for axis in axes {
            match axis {
                SettingsAxis::Os => {
                    values.insert("os".to_string(), self.os.to_string());
                }
                SettingsAxis::Arch => {
                    values.insert("arch".to_string(), self.arch.to_string());
                }
                SettingsAxis::Compiler => {
                    values.insert("compiler".to_string(), self.compiler.kind.to_string());
                    values.insert(
                        "compiler.version".to_string(),
                        self.compiler.version.clone(),
                    );
                    if let Some(ref cppstd) = self.compiler.cppstd {
                        values.insert("compiler.cppstd".to_string(), cppstd.clone());
                    }
                    if let Some(ref libcxx) = self.compiler.libcxx {
                        values.insert("compiler.libcxx".to_string(), libcxx.clone());
                    }
                }
                SettingsAxis::BuildType => {
                    values.insert("build_type".to_string(), self.build_type.to_string());
                }
            }
        }
        values
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
