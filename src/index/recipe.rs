// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recipe metadata served by package indexes.
//!
//! ```toml
//! # <index>/boost/1.80.0/recipe.toml
//! name = "boost"
//! version = "1.80.0"
//! package_type = "library"
//! requires = ["zlib/1.2.13"]
//! cmake_file_name = "Boost"
//! cmake_target_name = "Boost::boost"
//! libs = ["boost_system"]
//!
//! [options]
//! header_only = false
//! shared = false
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::manifest::options::OptionKind;
use crate::manifest::reference::Reference;

/// `cmake_file_name` becomes a file name in the output directory, so it
/// may not contain separators or start with a dot.
const CMAKE_FILE_NAME_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_.+-]{0,100}$";

fn cmake_file_name_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(CMAKE_FILE_NAME_PATTERN).ok())
        .as_ref()
}

/// Kind of package a recipe produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageType {
    /// Compiled library, may be switched to header-only by option.
    #[default]
    Library,
    /// Always header-only.
    HeaderLibrary,
    /// Executable tool.
    Application,
}

/// Build description of one `name/version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub package_type: PackageType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Reference>,
    /// Declared options with their default values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<OptionKind, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmake_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmake_target_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl Recipe {
    /// Creates a library recipe with no requirements or options.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            package_type: PackageType::Library,
            requires: Vec::new(),
            options: BTreeMap::new(),
            cmake_file_name: None,
            cmake_target_name: None,
            libs: Vec::new(),
            license: None,
        }
    }

    #[must_use]
    pub const fn package_type(mut self, package_type: PackageType) -> Self {
        self.package_type = package_type;
        self
    }

    #[must_use]
    pub fn require(mut self, reference: Reference) -> Self {
        self.requires.push(reference);
        self
    }

    /// Declares an option and its default.
    #[must_use]
    pub fn option(mut self, kind: OptionKind, default: bool) -> Self {
        self.options.insert(kind, default);
        self
    }

    #[must_use]
    pub fn cmake_names(mut self, file_name: impl Into<String>, target: impl Into<String>) -> Self {
        self.cmake_file_name = Some(file_name.into());
        self.cmake_target_name = Some(target.into());
        self
    }

    #[must_use]
    pub fn libs<I, S>(mut self, libs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.libs = libs.into_iter().map(Into::into).collect();
        self
    }

    /// The recipe's own reference.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidReference` if the recipe's name or
    /// version is malformed.
    pub fn reference(&self) -> Result<Reference, ManifestError> {
        Reference::new(self.name.clone(), self.version.clone())
    }

    /// Checks everything an index hands over before the recipe is used:
    /// the reference and the CMake file name.
    ///
    /// # Errors
    ///
    /// `InvalidReference` or `InvalidCMakeName`.
    pub fn validate(&self) -> Result<Reference, ManifestError> {
        let reference = self.reference()?;
        if let Some(ref value) = self.cmake_file_name
            && !cmake_file_name_regex().is_some_and(|re| re.is_match(value))
        {
            return Err(ManifestError::InvalidCMakeName {
                reference: reference.to_string(),
                value: value.clone(),
                message: "must be a plain file name without path separators",
            });
        }
        Ok(reference)
    }

    #[must_use]
    pub fn declares(&self, kind: OptionKind) -> bool {
        self.options.contains_key(&kind)
    }

    /// Base name of the `<file>-config.cmake` files.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.cmake_file_name.as_deref().unwrap_or(&self.name)
    }

    /// Imported target name, `<name>::<name>` unless overridden.
    #[must_use]
    pub fn target_name(&self) -> String {
        self.cmake_target_name
            .clone()
            .unwrap_or_else(|| format!("{0}::{0}", self.name))
    }
}
