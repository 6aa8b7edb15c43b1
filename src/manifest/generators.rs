// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output-format tags and toolchain backends.
//!
//! ```text
//! GeneratorSet   CMakeDeps | CMakeToolchain
//! Backend        Ninja, Unix Makefiles, NMake Makefiles,
//!                Visual Studio 17 2022, Xcode
//! ```

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ManifestError;

bitflags! {
    /// Set of output-format tags a manifest asks for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GeneratorSet: u8 {
        /// Package config files for `find_package`.
        const CMAKE_DEPS = 1 << 0;
        /// Toolchain file and `CMakePresets.json`.
        const CMAKE_TOOLCHAIN = 1 << 1;
    }
}

impl Default for GeneratorSet {
    fn default() -> Self {
        Self::CMAKE_TOOLCHAIN
    }
}

impl GeneratorSet {
    /// Parses one tag such as `"CMakeDeps"`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::UnknownGenerator` for unknown tags.
    pub fn parse_tag(tag: &str) -> Result<Self, ManifestError> {
        match tag {
            "CMakeDeps" => Ok(Self::CMAKE_DEPS),
            "CMakeToolchain" => Ok(Self::CMAKE_TOOLCHAIN),
            _ => Err(ManifestError::UnknownGenerator(tag.to_string())),
        }
    }

    /// Tag names in a stable order.
    #[must_use]
    pub fn tags(self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.contains(Self::CMAKE_DEPS) {
            tags.push("CMakeDeps");
        }
        if self.contains(Self::CMAKE_TOOLCHAIN) {
            tags.push("CMakeToolchain");
        }
        tags
    }
}

/// Build-file generator the downstream `CMake` run will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ToolchainBackend {
    #[default]
    Ninja,
    UnixMakefiles,
    NMakeMakefiles,
    VisualStudio17,
    Xcode,
}

impl ToolchainBackend {
    /// Name passed to `cmake -G`.
    #[must_use]
    pub const fn cmake_generator(self) -> &'static str {
        match self {
            Self::Ninja => "Ninja",
            Self::UnixMakefiles => "Unix Makefiles",
            Self::NMakeMakefiles => "NMake Makefiles",
            Self::VisualStudio17 => "Visual Studio 17 2022",
            Self::Xcode => "Xcode",
        }
    }

    /// Executable whose presence makes the backend usable.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Ninja => "ninja",
            Self::UnixMakefiles => "make",
            Self::NMakeMakefiles => "nmake",
            Self::VisualStudio17 => "msbuild",
            Self::Xcode => "xcodebuild",
        }
    }

    /// Multi-config backends pick the build type at build time.
    #[must_use]
    pub const fn is_multi_config(self) -> bool {
        matches!(self, Self::VisualStudio17 | Self::Xcode)
    }
}

impl fmt::Display for ToolchainBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmake_generator())
    }
}

impl FromStr for ToolchainBackend {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ninja" => Ok(Self::Ninja),
            "unix makefiles" | "make" => Ok(Self::UnixMakefiles),
            "nmake makefiles" | "nmake" => Ok(Self::NMakeMakefiles),
            "visual studio 17 2022" | "vs2022" | "msbuild" => Ok(Self::VisualStudio17),
            "xcode" => Ok(Self::Xcode),
            _ => Err(ManifestError::UnknownBackend(s.to_string())),
        }
    }
}

impl Serialize for ToolchainBackend {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.cmake_generator())
    }
}

impl<'de> Deserialize<'de> for ToolchainBackend {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
