// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resolved dependency graph.
//!
//! ```text
//!   app (manifest)
//!    |-- boost/1.80.0
//!    |-- spdlog/1.10.0
//!    |      |
//!    |      +------> fmt/9.1.0      topological_order():
//!    +-- cli11/2.2.0                  boost, cli11, fmt, spdlog
//! ```
//!
//! Nodes are keyed by package name in a `BTreeMap`, so iteration and
//! ordering never depend on the order requirements were declared in.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{ResolveError, ResolveResult};
use crate::index::Recipe;
use crate::manifest::options::OptionKind;
use crate::manifest::reference::Reference;

/// How a resolved package is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Compiled libraries are linked.
    Library,
    /// Only headers are used; no libraries and a settings-free package id.
    HeaderOnly,
    /// Executable tool.
    Application,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Library => "library",
            Self::HeaderOnly => "header-only",
            Self::Application => "application",
        })
    }
}

/// One node of the graph.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPackage {
    pub reference: Reference,
    #[serde(skip)]
    pub recipe: Recipe,
    /// Effective options: recipe defaults with accepted overrides applied.
    pub options: BTreeMap<OptionKind, bool>,
    pub artifact: ArtifactKind,
    pub package_id: String,
    /// Resolved references this package depends on.
    pub requires: Vec<Reference>,
    /// References of the packages (or manifests) that require this one.
    pub required_by: BTreeSet<String>,
    /// Required directly by a manifest.
    pub direct: bool,
}

impl ResolvedPackage {
    #[must_use]
    pub fn name(&self) -> &str {
        self.reference.name()
    }

    #[must_use]
    pub fn is_header_only(&self) -> bool {
        self.artifact == ArtifactKind::HeaderOnly
    }

    #[must_use]
    pub fn option(&self, kind: OptionKind) -> Option<bool> {
        self.options.get(&kind).copied()
    }
}

/// Graph of resolved packages.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, ResolvedPackage>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, package: ResolvedPackage) {
        self.nodes.insert(package.name().to_string(), package);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedPackage> {
        self.nodes.get(name)
    }

    /// Nodes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.nodes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Packages required directly by a manifest.
    pub fn direct(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.nodes.values().filter(|p| p.direct)
    }

    /// Names of the in-graph dependencies of `name`.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.nodes.get(name).map_or_else(Vec::new, |p| {
            p.requires
                .iter()
                .map(Reference::name)
                .filter(|dep| self.nodes.contains_key(*dep))
                .collect()
        })
    }

    /// Resolved references, sorted.
    #[must_use]
    pub fn references(&self) -> Vec<&Reference> {
        self.nodes.values().map(|p| &p.reference).collect()
    }

    /// Packages with every dependency before its dependents.
    ///
    /// Ties are broken by name, so the order is deterministic.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::CircularDependency` if the graph has a cycle.
    pub fn topological_order(&self) -> ResolveResult<Vec<&ResolvedPackage>> {
        let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for name in self.nodes.keys() {
            let deps = self.dependencies(name);
            pending.insert(name.as_str(), deps.len());
            for dep in deps {
                dependents.entry(dep).or_default().push(name.as_str());
            }
        }

        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&name, _)| name)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(name) = ready.pop_first() {
            if let Some(package) = self.nodes.get(name) {
                order.push(package);
            }
            for &dependent in dependents.get(name).into_iter().flatten() {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let cycle = self.detect_cycle().unwrap_or_default();
            return Err(ResolveError::CircularDependency { cycle });
        }
        Ok(order)
    }

    /// Finds one cycle, listed from its first node back to that node.
    #[must_use]
    pub fn detect_cycle(&self) -> Option<Vec<String>> {
        let mut visited = BTreeSet::new();
        let mut stack = Vec::new();
        for name in self.nodes.keys() {
            if !visited.contains(name.as_str())
                && let Some(cycle) = self.dfs_cycle(name, &mut visited, &mut stack)
            {
                return Some(cycle);
            }
        }
        None
    }

    fn dfs_cycle<'g>(
        &'g self,
        name: &'g str,
        visited: &mut BTreeSet<&'g str>,
        stack: &mut Vec<&'g str>,
    ) -> Option<Vec<String>> {
        visited.insert(name);
        stack.push(name);

        for dep in self.dependencies(name) {
            if let Some(pos) = stack.iter().position(|&n| n == dep) {
                let mut cycle: Vec<String> = stack[pos..].iter().map(|n| (*n).to_string()).collect();
                cycle.push(dep.to_string());
                return Some(cycle);
            }
            if !visited.contains(dep)
                && let Some(cycle) = self.dfs_cycle(dep, visited, stack)
            {
                return Some(cycle);
            }
        }

        stack.pop();
        None
    }
}
