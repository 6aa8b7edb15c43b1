// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backend availability checks.
//!
//! ```text
//! SystemProbe::locate(Ninja)
//!   [tools] ninja = "..." set?  --> existing file, or PATH lookup of that name
//!   otherwise                   --> PATH lookup of "ninja" (cached)
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use tracing::trace;

use crate::config::types::ToolsConfig;
use crate::manifest::generators::ToolchainBackend;

/// Finds the executable that makes a backend usable.
pub trait BackendProbe: Send + Sync {
    fn locate(&self, backend: ToolchainBackend) -> Option<PathBuf>;
}

impl<F> BackendProbe for F
where
    F: Fn(ToolchainBackend) -> Option<PathBuf> + Send + Sync,
{
    fn locate(&self, backend: ToolchainBackend) -> Option<PathBuf> {
        self(backend)
    }
}

/// Probe that consults `[tools]` overrides, then `PATH`.
#[derive(Debug, Clone, Default)]
pub struct SystemProbe {
    tools: ToolsConfig,
}

impl SystemProbe {
    #[must_use]
    pub const fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }
}

impl BackendProbe for SystemProbe {
    fn locate(&self, backend: ToolchainBackend) -> Option<PathBuf> {
        match self.tools.program_for(backend) {
            Some(path) if path.is_file() => Some(path.to_path_buf()),
            Some(path) => find(path),
            None => find(Path::new(backend.program())),
        }
    }
}

fn exe_cache() -> &'static RwLock<HashMap<PathBuf, PathBuf>> {
    static CACHE: OnceLock<RwLock<HashMap<PathBuf, PathBuf>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolves an executable via `PATH`, caching hits.
fn find(program: &Path) -> Option<PathBuf> {
    {
        let cache = exe_cache()
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(path) = cache.get(program) {
            return Some(path.clone());
        }
    }

    let path = which::which(program).ok()?;
    trace!(program = %program.display(), path = %path.display(), "Executable found");
    exe_cache()
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .insert(program.to_path_buf(), path.clone());
    Some(path)
}
