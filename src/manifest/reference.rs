// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `name/version` package references.
//!
//! ```text
//! "boost/1.80.0" --> Reference { name: "boost", version: "1.80.0" }
//! ordering: name, then semver (if both parse) else lexical
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ManifestError;

const NAME_PATTERN: &str = r"^[a-z0-9_][a-z0-9_.+-]{0,100}$";
const VERSION_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_.+-]{0,50}$";

fn name_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(NAME_PATTERN).ok()).as_ref()
}

fn version_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(VERSION_PATTERN).ok()).as_ref()
}

/// A resolvable package identity: `name/version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    name: String,
    version: String,
}

impl Reference {
    /// Creates a reference after validating both parts.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidReference` if the name or version
    /// contains characters outside the allowed set.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, ManifestError> {
        let name = name.into();
        let version = version.into();
        let display = format!("{name}/{version}");

        if !name_regex().is_some_and(|re| re.is_match(&name)) {
            return Err(ManifestError::InvalidReference {
                reference: display,
                message: "name must be lower-case alphanumeric with '_', '.', '+' or '-'"
                    .to_string(),
            });
        }
        if !version_regex().is_some_and(|re| re.is_match(&version)) {
            return Err(ManifestError::InvalidReference {
                reference: display,
                message: "version must be alphanumeric with '_', '.', '+' or '-'".to_string(),
            });
        }

        Ok(Self { name, version })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The version as semver, when it is one.
    #[must_use]
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }

    /// Leading numeric component of the version (`"1.80.0"` -> `"1"`).
    #[must_use]
    pub fn major(&self) -> &str {
        self.version.split(['.', '-', '+']).next().unwrap_or(&self.version)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Reference {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) =
            s.trim()
                .split_once('/')
                .ok_or_else(|| ManifestError::InvalidReference {
                    reference: s.to_string(),
                    message: "expected 'name/version'".to_string(),
                })?;
        Self::new(name, version)
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then_with(|| {
            match (self.semver(), other.semver()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.version.cmp(&other.version),
            }
        })
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Reference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
