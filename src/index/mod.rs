// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Package indexes mapping references to recipes.
//!
//! ```text
//! PackageIndex (trait)
//!   lookup(name/version) -> Option<Recipe>
//!   search(glob)         -> [Reference]
//!      |
//!      +-- LocalIndex   <root>/<name>/<version>/recipe.toml
//!      +-- RemoteIndex  GET {base}/v1/recipes/{name}/{version}
//!      +-- MemoryIndex  in-process recipes
//!      +-- IndexChain   ordered, first hit wins
//! ```

pub mod local;
pub mod memory;
pub mod recipe;
pub mod remote;


use std::collections::BTreeSet;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::{debug, warn};
use wax::Program as _;

use crate::config::types::IndexConfig;
use crate::error::IndexError;
use crate::manifest::reference::Reference;

pub use local::LocalIndex;
pub use memory::MemoryIndex;
pub use recipe::{PackageType, Recipe};
pub use remote::RemoteIndex;

/// Result type for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Source of recipes consulted by the resolver.
///
/// A missing recipe is `Ok(None)`; `Err` is reserved for the index itself
/// failing (I/O, HTTP, malformed data).
pub trait PackageIndex: Send + Sync {
    /// Human readable name used in logs.
    fn name(&self) -> &str;

    /// Looks up the recipe for an exact reference.
    fn lookup<'a>(&'a self, reference: &'a Reference) -> BoxFuture<'a, IndexResult<Option<Recipe>>>;

    /// Lists references matching a glob pattern.
    fn search<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, IndexResult<Vec<Reference>>>;
}

/// Compiled search pattern.
///
/// Patterns without `/` match the package name only; patterns with `/` match
/// the full `name/version`.
pub struct SearchPattern<'t> {
    glob: wax::Glob<'t>,
    full: bool,
}

impl<'t> SearchPattern<'t> {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidPattern` if the glob is malformed.
    pub fn new(pattern: &'t str) -> IndexResult<Self> {
        let glob = wax::Glob::new(pattern)
            .map_err(|e| IndexError::InvalidPattern(format!("{pattern}: {e}")))?;
        Ok(Self {
            glob,
            full: pattern.contains('/'),
        })
    }

    #[must_use]
    pub fn matches(&self, reference: &Reference) -> bool {
        if self.full {
            self.glob.is_match(reference.to_string().as_str())
        } else {
            self.glob.is_match(reference.name())
        }
    }
}

/// Ordered list of indexes; the first one that knows a reference wins.
#[derive(Default)]
pub struct IndexChain {
    indexes: Vec<Box<dyn PackageIndex>>,
}

impl IndexChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an index with the lowest priority so far.
    #[must_use]
    pub fn with_index(mut self, index: impl PackageIndex + 'static) -> Self {
        self.indexes.push(Box::new(index));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Builds the chain from configuration: local index first, then remotes
    /// in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if a remote URL is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &IndexConfig) -> IndexResult<Self> {
        let mut chain = Self::new();
        if let Some(ref root) = config.local {
            chain = chain.with_index(LocalIndex::new(root));
        }
        let timeout = Duration::from_secs(config.timeout_secs);
        for url in &config.remotes {
            chain = chain.with_index(RemoteIndex::new(url, timeout)?);
        }
        if chain.is_empty() {
            warn!("No package index configured; every lookup will fail");
        }
        Ok(chain)
    }
}

impl PackageIndex for IndexChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn lookup<'a>(&'a self, reference: &'a Reference) -> BoxFuture<'a, IndexResult<Option<Recipe>>> {
        Box::pin(async move {
            for index in &self.indexes {
                if let Some(recipe) = index.lookup(reference).await? {
                    debug!(%reference, index = index.name(), "Recipe found");
                    return Ok(Some(recipe));
                }
            }
            Ok(None)
        })
    }

    fn search<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, IndexResult<Vec<Reference>>> {
        Box::pin(async move {
            let mut found = BTreeSet::new();
            for index in &self.indexes {
                found.extend(index.search(pattern).await?);
            }
            Ok(found.into_iter().collect())
        })
    }
}
