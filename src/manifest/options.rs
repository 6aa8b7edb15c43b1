// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed per-dependency build options.
//!
//! ```text
//! [options.boost]            DependencyOption::HeaderOnly(true)
//! header_only = true   -->
//! -O boost:shared=false      DependencyOption::Shared(false)
//! ```
//!
//! Option names are checked when the manifest is parsed; whether a recipe
//! honours an option is decided at resolution time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Option name, independent of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    #[serde(rename = "header_only")]
    HeaderOnly,
    #[serde(rename = "shared")]
    Shared,
    #[serde(rename = "fPIC", alias = "fpic")]
    Fpic,
}

impl OptionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeaderOnly => "header_only",
            Self::Shared => "shared",
            Self::Fpic => "fPIC",
        }
    }

    /// Looks up an option by name, accepting `fpic` for `fPIC`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "header_only" => Some(Self::HeaderOnly),
            "shared" => Some(Self::Shared),
            "fPIC" | "fpic" => Some(Self::Fpic),
            _ => None,
        }
    }

    /// Pairs this kind with a value.
    #[must_use]
    pub const fn with_value(self, value: bool) -> DependencyOption {
        match self {
            Self::HeaderOnly => DependencyOption::HeaderOnly(value),
            Self::Shared => DependencyOption::Shared(value),
            Self::Fpic => DependencyOption::Fpic(value),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A build option set on one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyOption {
    /// Consume the library without compiled binaries.
    HeaderOnly(bool),
    /// Build shared instead of static libraries.
    Shared(bool),
    /// Build position independent code.
    Fpic(bool),
}

impl DependencyOption {
    #[must_use]
    pub const fn kind(self) -> OptionKind {
        match self {
            Self::HeaderOnly(_) => OptionKind::HeaderOnly,
            Self::Shared(_) => OptionKind::Shared,
            Self::Fpic(_) => OptionKind::Fpic,
        }
    }

    #[must_use]
    pub const fn value(self) -> bool {
        match self {
            Self::HeaderOnly(v) | Self::Shared(v) | Self::Fpic(v) => v,
        }
    }

    /// Builds an option from a manifest `[options.<dependency>]` entry.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` for unrecognised names and
    /// `InvalidOptionValue` for non-boolean values.
    pub fn from_toml(
        dependency: &str,
        name: &str,
        value: &toml::Value,
    ) -> Result<Self, ManifestError> {
        let kind = OptionKind::from_name(name).ok_or_else(|| ManifestError::UnknownOption {
            dependency: dependency.to_string(),
            option: name.to_string(),
        })?;
        let value = match value {
            toml::Value::Boolean(b) => *b,
            toml::Value::String(s) => parse_bool(s).ok_or_else(|| invalid(dependency, name))?,
            _ => return Err(invalid(dependency, name)),
        };
        Ok(kind.with_value(value))
    }
}

impl fmt::Display for DependencyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.value())
    }
}

/// A command-line option assignment: `dependency:option=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAssignment {
    pub dependency: String,
    pub option: DependencyOption,
}

impl FromStr for OptionAssignment {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ManifestError::MalformedAssignment(s.to_string());
        let (dependency, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (name, value) = rest.split_once('=').ok_or_else(malformed)?;
        if dependency.trim().is_empty() {
            return Err(malformed());
        }
        let option = DependencyOption::from_toml(
            dependency,
            name.trim(),
            &toml::Value::String(value.trim().to_string()),
        )?;
        Ok(Self {
            dependency: dependency.trim().to_string(),
            option,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(dependency: &str, option: &str) -> ManifestError {
    ManifestError::InvalidOptionValue {
        dependency: dependency.to_string(),
        option: option.to_string(),
        expected: "a boolean",
    }
}
