// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-process index for embedders and tests.

use std::collections::BTreeMap;

use futures_util::future::BoxFuture;

use super::{IndexResult, PackageIndex, Recipe, SearchPattern};
use crate::error::IndexError;
use crate::manifest::reference::Reference;

/// Index holding recipes in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    recipes: BTreeMap<Reference, Recipe>,
}

impl MemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recipe, replacing any recipe with the same reference.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Decode` if the recipe's name or version is not a
    /// valid reference, or its CMake file name is not a plain file name.
    pub fn insert(&mut self, recipe: Recipe) -> IndexResult<()> {
        let reference = recipe.validate().map_err(|e| IndexError::Decode {
            source_name: "memory index".to_string(),
            message: e.to_string(),
        })?;
        self.recipes.insert(reference, recipe);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn with_recipe(mut self, recipe: Recipe) -> IndexResult<Self> {
        self.insert(recipe)?;
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl PackageIndex for MemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    fn lookup<'a>(&'a self, reference: &'a Reference) -> BoxFuture<'a, IndexResult<Option<Recipe>>> {
        Box::pin(async move { Ok(self.recipes.get(reference).cloned()) })
    }

    fn search<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, IndexResult<Vec<Reference>>> {
        Box::pin(async move {
            let pattern = SearchPattern::new(pattern)?;
            Ok(self
                .recipes
                .keys()
                .filter(|r| pattern.matches(r))
                .cloned()
                .collect())
        })
    }
}
