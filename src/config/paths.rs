// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! output/                 (default: build/cmt)
//!   cmt_toolchain.cmake
//!   CMakePresets.json
//!   <pkg>-config.cmake
//! cache/                  (default: .cmt/cache)
//!   p/<name>/<version>/<package_id>
//! ```
//!
//! Relative paths are made absolute against the current directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Output and cache locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory receiving generated toolchain files.
    pub output: PathBuf,
    /// Package cache root referenced by generated config files.
    pub cache: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("build").join("cmt"),
            cache: PathBuf::from(".cmt").join("cache"),
        }
    }
}

impl PathsConfig {
    /// Makes every path absolute.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is empty or the current directory cannot be
    /// determined.
    pub fn resolve(&mut self) -> Result<()> {
        self.output = absolutize("output", &self.output)?;
        self.cache = absolutize("cache", &self.cache)?;
        Ok(())
    }
}

fn absolutize(key: &str, path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingKey {
            section: "paths".to_string(),
            key: key.to_string(),
        }
        .into());
    }
    Ok(std::path::absolute(path)?)
}
