// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Directory-backed index.
//!
//! ```text
//! <root>/
//!   boost/
//!     1.80.0/recipe.toml
//!   spdlog/
//!     1.10.0/recipe.toml
//! ```

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tokio::fs;
use tracing::trace;

use super::{IndexResult, PackageIndex, Recipe, SearchPattern};
use crate::error::IndexError;
use crate::manifest::reference::Reference;

const RECIPE_FILE: &str = "recipe.toml";

/// Index reading `recipe.toml` files from a directory tree.
#[derive(Debug, Clone)]
pub struct LocalIndex {
    root: PathBuf,
    label: String,
}

impl LocalIndex {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let label = format!("local:{}", root.display());
        Self { root, label }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn recipe_path(&self, reference: &Reference) -> PathBuf {
        self.root
            .join(reference.name())
            .join(reference.version())
            .join(RECIPE_FILE)
    }

    async fn read_recipe(&self, reference: &Reference) -> IndexResult<Option<Recipe>> {
        let path = self.recipe_path(reference);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "No recipe file");
                return Ok(None);
            }
            Err(e) => return Err(IndexError::Io(e)),
        };

        let recipe: Recipe = toml::from_str(&content).map_err(|e| IndexError::Decode {
            source_name: path.display().to_string(),
            message: e.message().to_string(),
        })?;

        if recipe.name != reference.name() || recipe.version != reference.version() {
            return Err(IndexError::Decode {
                source_name: path.display().to_string(),
                message: format!(
                    "recipe declares {}/{} but is stored as {reference}",
                    recipe.name, recipe.version
                ),
            });
        }
        recipe.validate().map_err(|e| IndexError::Decode {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Some(recipe))
    }

    async fn subdirectories(dir: &Path) -> IndexResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(IndexError::Io(e)),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

impl PackageIndex for LocalIndex {
    fn name(&self) -> &str {
        &self.label
    }

    fn lookup<'a>(&'a self, reference: &'a Reference) -> BoxFuture<'a, IndexResult<Option<Recipe>>> {
        Box::pin(self.read_recipe(reference))
    }

    fn search<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, IndexResult<Vec<Reference>>> {
        Box::pin(async move {
            let pattern = SearchPattern::new(pattern)?;
            let mut found = Vec::new();
            for name in Self::subdirectories(&self.root).await? {
                for version in Self::subdirectories(&self.root.join(&name)).await? {
                    let Ok(reference) = Reference::new(name.clone(), version) else {
                        continue;
                    };
                    if pattern.matches(&reference)
                        && fs::try_exists(self.recipe_path(&reference))
                            .await
                            .unwrap_or(false)
                    {
                        found.push(reference);
                    }
                }
            }
            found.sort();
            Ok(found)
        })
    }
}
