// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dependency resolution.
//!
//! # Flow
//!
//! ```text
//! ResolverContext (per run)
//!   require(origin, spec)  x N
//!   set_option(name, opt)  x M
//!        |
//!        v
//! resolve(&dyn PackageIndex)
//!   1. pin forced requirements
//!   2. pin direct requirements        (conflict unless forced)
//!   3. BFS over recipe requirements   (missing -> Unresolvable,
//!                                      ancestor -> Circular)
//!   4. apply options, package ids
//!   5. final cycle check
//!        |
//!        v
//! DependencyGraph
//! ```

pub mod graph;
pub mod package_id;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ResolveError, ResolveResult};
use crate::index::{PackageIndex, PackageType, Recipe};
use crate::manifest::DependencySpec;
use crate::manifest::options::{DependencyOption, OptionKind};
use crate::manifest::reference::Reference;
use crate::manifest::settings::{Settings, SettingsAxis};

pub use graph::{ArtifactKind, DependencyGraph, ResolvedPackage};

/// A requirement together with the manifest that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub origin: Reference,
    pub spec: DependencySpec,
}

/// Request-scoped resolver state.
///
/// Created once per run and passed explicitly to every step that
/// contributes requirements or options.
#[derive(Debug, Clone)]
pub struct ResolverContext {
    settings: Settings,
    axes: BTreeSet<SettingsAxis>,
    requirements: Vec<Requirement>,
    options: BTreeMap<String, Vec<DependencyOption>>,
    cancel: CancellationToken,
}

impl ResolverContext {
    #[must_use]
    pub fn new(settings: Settings, axes: BTreeSet<SettingsAxis>) -> Self {
        Self {
            settings,
            axes,
            requirements: Vec::new(),
            options: BTreeMap::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned token, e.g. one cancelled on Ctrl+C.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn axes(&self) -> &BTreeSet<SettingsAxis> {
        &self.axes
    }

    /// Registers a requirement declared by `origin`.
    ///
    /// Options attached to the requirement are not applied here; they take effect
    /// once passed to [`set_option`](Self::set_option).
    pub fn require(&mut self, origin: &Reference, spec: &DependencySpec) {
        debug!(%origin, reference = %spec.reference(), forced = spec.is_forced(), "Requirement");
        self.requirements.push(Requirement {
            origin: origin.clone(),
            spec: spec.clone(),
        });
    }

    /// Sets an option for a package, replacing an earlier value of the same kind.
    pub fn set_option(&mut self, name: &str, option: DependencyOption) {
        let entry = self.options.entry(name.to_string()).or_default();
        entry.retain(|o| o.kind() != option.kind());
        entry.push(option);
    }

    /// Requirements in registration order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    #[must_use]
    pub fn options_for(&self, name: &str) -> &[DependencyOption] {
        self.options.get(name).map_or(&[], Vec::as_slice)
    }

    /// Resolves every registered requirement against `index`.
    ///
    /// # Errors
    ///
    /// - `UnresolvableDependency` when no recipe exists for a reference.
    /// - `ConflictingVersionConstraint` when one name is pinned to two
    ///   versions without a forced override.
    /// - `CircularDependency` when recipes require each other.
    /// - `Interrupted` when the cancellation token fires.
    /// - `Index` when the index itself fails.
    pub async fn resolve(&self, index: &dyn PackageIndex) -> ResolveResult<DependencyGraph> {
        info!(
            requirements = self.requirements.len(),
            index = index.name(),
            "Resolving dependencies"
        );

        let mut pins = self.pin_direct()?;
        let mut queue: VecDeque<(Reference, Vec<Reference>)> = VecDeque::new();
        let mut queued = BTreeSet::new();
        for requirement in &self.requirements {
            let Some(pin) = pins.get(requirement.spec.name()) else {
                continue;
            };
            if queued.insert(pin.reference.name().to_string()) {
                queue.push_back((pin.reference.clone(), pin.chain.clone()));
            }
        }

        let mut found: BTreeMap<String, (Reference, Recipe, Vec<Reference>)> = BTreeMap::new();
        let mut required_by: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for requirement in &self.requirements {
            required_by
                .entry(requirement.spec.name().to_string())
                .or_default()
                .insert(requirement.origin.to_string());
        }

        while let Some((reference, chain)) = queue.pop_front() {
            if self.cancel.is_cancelled() {
                return Err(ResolveError::Interrupted);
            }

            let recipe = self.lookup(index, &reference, &chain).await?;
            debug!(%reference, requires = recipe.requires.len(), "Recipe resolved");

            let mut dep_chain = chain.clone();
            dep_chain.push(reference.clone());
            let mut requires = Vec::with_capacity(recipe.requires.len());

            for dep in &recipe.requires {
                if let Some(pos) = dep_chain.iter().position(|r| r.name() == dep.name()) {
                    let mut cycle: Vec<String> =
                        dep_chain[pos..].iter().map(ToString::to_string).collect();
                    cycle.push(dep.to_string());
                    return Err(ResolveError::CircularDependency { cycle });
                }

                let pinned = match pins.get(dep.name()) {
                    Some(pin) if pin.reference.version() != dep.version() => {
                        if !pin.forced {
                            return Err(ResolveError::ConflictingVersionConstraint {
                                name: dep.name().to_string(),
                                existing: pin.reference.to_string(),
                                existing_chain: render_chain(&pin.chain),
                                requested: dep.to_string(),
                                requested_chain: render_chain(&dep_chain),
                            });
                        }
                        debug!(requested = %dep, forced = %pin.reference, "Forced override applied");
                        pin.reference.clone()
                    }
                    Some(pin) => pin.reference.clone(),
                    None => {
                        pins.insert(
                            dep.name().to_string(),
                            Pin {
                                reference: dep.clone(),
                                chain: dep_chain.clone(),
                                forced: false,
                            },
                        );
                        dep.clone()
                    }
                };

                required_by
                    .entry(pinned.name().to_string())
                    .or_default()
                    .insert(reference.to_string());
                if queued.insert(pinned.name().to_string()) {
                    queue.push_back((pinned.clone(), dep_chain.clone()));
                }
                requires.push(pinned);
            }

            found.insert(reference.name().to_string(), (reference, recipe, requires));
        }

        let graph = self.build_graph(found, required_by);
        if let Some(cycle) = graph.detect_cycle() {
            return Err(ResolveError::CircularDependency { cycle });
        }

        info!(packages = graph.len(), "Dependencies resolved");
        Ok(graph)
    }

    /// Pins forced requirements first, then the remaining direct ones, so
    /// the outcome does not depend on registration order.
    fn pin_direct(&self) -> ResolveResult<BTreeMap<String, Pin>> {
        let mut pins: BTreeMap<String, Pin> = BTreeMap::new();
        let (forced, regular): (Vec<&Requirement>, Vec<&Requirement>) = self
            .requirements
            .iter()
            .partition(|r| r.spec.is_forced());

        for (requirement, is_forced) in forced
            .into_iter()
            .map(|r| (r, true))
            .chain(regular.into_iter().map(|r| (r, false)))
        {
            let reference = requirement.spec.reference();
            let chain = vec![requirement.origin.clone()];
            match pins.get(reference.name()) {
                Some(pin) if pin.reference == *reference => {}
                Some(pin) if pin.forced && !is_forced => {
                    debug!(requested = %reference, forced = %pin.reference, "Forced override applied");
                }
                Some(pin) => {
                    return Err(ResolveError::ConflictingVersionConstraint {
                        name: reference.name().to_string(),
                        existing: pin.reference.to_string(),
                        existing_chain: render_chain(&pin.chain),
                        requested: reference.to_string(),
                        requested_chain: render_chain(&chain),
                    });
                }
                None => {
                    pins.insert(
                        reference.name().to_string(),
                        Pin {
                            reference: reference.clone(),
                            chain,
                            forced: is_forced,
                        },
                    );
                }
            }
        }
        Ok(pins)
    }

    async fn lookup(
        &self,
        index: &dyn PackageIndex,
        reference: &Reference,
        chain: &[Reference],
    ) -> ResolveResult<Recipe> {
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(ResolveError::Interrupted),
            result = index.lookup(reference) => result,
        };
        match result {
            Ok(Some(recipe)) => Ok(recipe),
            Ok(None) => Err(ResolveError::UnresolvableDependency {
                reference: reference.to_string(),
                required_by: render_chain(chain),
            }),
            Err(source) => Err(ResolveError::Index {
                reference: reference.to_string(),
                source,
            }),
        }
    }

    fn build_graph(
        &self,
        found: BTreeMap<String, (Reference, Recipe, Vec<Reference>)>,
        mut required_by: BTreeMap<String, BTreeSet<String>>,
    ) -> DependencyGraph {
        let direct: BTreeSet<&str> = self.requirements.iter().map(|r| r.spec.name()).collect();
        let settings = self.settings.values_for(&self.axes);

        for name in self.options.keys() {
            if !found.contains_key(name) {
                warn!(package = %name, "Options set for a package that is not in the graph");
            }
        }

        let mut graph = DependencyGraph::new();
        for (name, (reference, recipe, requires)) in found {
            let options = self.effective_options(&name, &recipe);
            let artifact = artifact_kind(&recipe, &options);
            let package_id = if artifact == ArtifactKind::HeaderOnly {
                package_id::compute(&BTreeMap::new(), &options, &requires)
            } else {
                package_id::compute(&settings, &options, &requires)
            };
            graph.insert(ResolvedPackage {
                reference,
                options,
                artifact,
                package_id,
                requires,
                required_by: required_by.remove(&name).unwrap_or_default(),
                direct: direct.contains(name.as_str()),
                recipe,
            });
        }
        graph
    }

    fn effective_options(&self, name: &str, recipe: &Recipe) -> BTreeMap<OptionKind, bool> {
        let mut options = recipe.options.clone();
        for option in self.options_for(name) {
            if recipe.declares(option.kind()) {
                options.insert(option.kind(), option.value());
            } else {
                warn!(
                    package = name,
                    option = %option,
                    "Recipe does not declare this option; ignoring it"
                );
            }
        }
        options
    }
}

#[derive(Debug, Clone)]
struct Pin {
    reference: Reference,
    chain: Vec<Reference>,
    forced: bool,
}

fn render_chain(chain: &[Reference]) -> Vec<String> {
    chain.iter().map(ToString::to_string).collect()
}

fn artifact_kind(recipe: &Recipe, options: &BTreeMap<OptionKind, bool>) -> ArtifactKind {
    match recipe.package_type {
        PackageType::HeaderLibrary => ArtifactKind::HeaderOnly,
        PackageType::Application => ArtifactKind::Application,
        PackageType::Library if options.get(&OptionKind::HeaderOnly) == Some(&true) => {
            ArtifactKind::HeaderOnly
        }
        PackageType::Library => ArtifactKind::Library,
    }
}
