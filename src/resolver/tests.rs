// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::{BTreeMap, BTreeSet};

use super::graph::{ArtifactKind, DependencyGraph, ResolvedPackage};
use super::{ResolverContext, package_id};
use crate::error::ResolveError;
use crate::index::{MemoryIndex, PackageType, Recipe};
use crate::manifest::DependencySpec;
use crate::manifest::options::{DependencyOption, OptionKind};
use crate::manifest::reference::Reference;
use crate::manifest::settings::{Settings, SettingsAxis};

fn reference(s: &str) -> Reference {
    s.parse().unwrap()
}

fn spec(s: &str) -> DependencySpec {
    DependencySpec::new(reference(s))
}

fn linux_release() -> Settings {
    let mut settings = Settings::detect();
    settings.apply("os=Linux").unwrap();
    settings.apply("arch=x86_64").unwrap();
    settings.apply("compiler=gcc").unwrap();
    settings.apply("compiler.version=12").unwrap();
    settings.apply("build_type=Release").unwrap();
    settings
}

fn context() -> ResolverContext {
    ResolverContext::new(linux_release(), SettingsAxis::ALL.into_iter().collect())
}

fn index() -> MemoryIndex {
    let recipes = [
        Recipe::new("boost", "1.80.0")
            .cmake_names("Boost", "Boost::boost")
            .option(OptionKind::HeaderOnly, false)
            .option(OptionKind::Shared, false)
            .libs(["boost_system"]),
        Recipe::new("spdlog", "1.10.0")
            .require(reference("fmt/8.1.1"))
            .option(OptionKind::Shared, false),
        Recipe::new("fmt", "8.1.1").option(OptionKind::Fpic, true),
        Recipe::new("fmt", "9.1.0").option(OptionKind::Fpic, true),
        Recipe::new("cli11", "2.2.0").package_type(PackageType::HeaderLibrary),
        Recipe::new("xxhash", "0.8.1"),
        Recipe::new("loop-a", "1.0").require(reference("loop-b/1.0")),
        Recipe::new("loop-b", "1.0").require(reference("loop-a/1.0")),
    ];
    let mut index = MemoryIndex::new();
    for recipe in recipes {
        index.insert(recipe).unwrap();
    }
    index
}

fn app() -> Reference {
    reference("app/1.0")
}

#[tokio::test]
async fn test_resolves_transitive_requirements() {
    let mut ctx = context();
    ctx.require(&app(), &spec("spdlog/1.10.0"));
    ctx.require(&app(), &spec("xxhash/0.8.1"));

    let graph = ctx.resolve(&index()).await.unwrap();
    assert_eq!(graph.len(), 3);

    let fmt = graph.get("fmt").unwrap();
    assert_eq!(fmt.reference, reference("fmt/8.1.1"));
    assert!(!fmt.direct);
    assert_eq!(fmt.required_by, BTreeSet::from(["spdlog/1.10.0".to_string()]));
    assert_eq!(graph.get("spdlog").unwrap().requires, [reference("fmt/8.1.1")]);

    let direct: Vec<&str> = graph.direct().map(ResolvedPackage::name).collect();
    assert_eq!(direct, ["spdlog", "xxhash"]);
}

#[tokio::test]
async fn test_declaration_order_does_not_change_result() {
    let names = ["boost/1.80.0", "spdlog/1.10.0", "cli11/2.2.0", "xxhash/0.8.1"];

    let mut forward = context();
    for name in names {
        forward.require(&app(), &spec(name));
    }
    let mut backward = context();
    for name in names.iter().rev() {
        backward.require(&app(), &spec(name));
    }

    let a = forward.resolve(&index()).await.unwrap();
    let b = backward.resolve(&index()).await.unwrap();
    let ids = |g: &DependencyGraph| -> Vec<(String, String)> {
        g.iter()
            .map(|p| (p.reference.to_string(), p.package_id.clone()))
            .collect()
    };
    assert_eq!(ids(&a), ids(&b));
}

#[tokio::test]
async fn test_missing_recipe_is_unresolvable() {
    let mut ctx = context();
    ctx.require(&app(), &spec("nonexistent/9.9.9"));

    let err = ctx.resolve(&index()).await.unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unresolvable dependency 'nonexistent/9.9.9' (required by app/1.0)");
}

#[tokio::test]
async fn test_missing_transitive_recipe_reports_chain() {
    let index = MemoryIndex::new()
        .with_recipe(Recipe::new("top", "1.0").require(reference("gone/0.1")))
        .unwrap();
    let mut ctx = context();
    ctx.require(&app(), &spec("top/1.0"));

    match ctx.resolve(&index).await.unwrap_err() {
        ResolveError::UnresolvableDependency {
            reference,
            required_by,
        } => {
            assert_eq!(reference, "gone/0.1");
            assert_eq!(required_by, ["app/1.0", "top/1.0"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_direct_conflict_across_manifests() {
    let mut ctx = context();
    ctx.require(&app(), &spec("fmt/9.1.0"));
    ctx.require(&reference("tests/1.0"), &spec("fmt/8.1.1"));

    let err = ctx.resolve(&index()).await.unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"conflicting versions for 'fmt': fmt/9.1.0 (via app/1.0) vs fmt/8.1.1 (via tests/1.0)");
}

#[tokio::test]
async fn test_transitive_conflict_without_force() {
    let mut ctx = context();
    ctx.require(&app(), &spec("spdlog/1.10.0"));
    ctx.require(&app(), &spec("fmt/9.1.0"));

    let err = ctx.resolve(&index()).await.unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"conflicting versions for 'fmt': fmt/9.1.0 (via app/1.0) vs fmt/8.1.1 (via app/1.0 -> spdlog/1.10.0)");
}

#[tokio::test]
async fn test_forced_requirement_overrides_transitive() {
    for forced_first in [true, false] {
        let mut ctx = context();
        if forced_first {
            ctx.require(&app(), &spec("fmt/9.1.0").forced());
            ctx.require(&app(), &spec("spdlog/1.10.0"));
        } else {
            ctx.require(&app(), &spec("spdlog/1.10.0"));
            ctx.require(&app(), &spec("fmt/9.1.0").forced());
        }

        let graph = ctx.resolve(&index()).await.unwrap();
        assert_eq!(graph.get("fmt").unwrap().reference, reference("fmt/9.1.0"));
        assert_eq!(graph.get("spdlog").unwrap().requires, [reference("fmt/9.1.0")]);
    }
}

#[tokio::test]
async fn test_forced_overrides_other_manifest() {
    let mut ctx = context();
    ctx.require(&reference("tests/1.0"), &spec("fmt/8.1.1"));
    ctx.require(&app(), &spec("fmt/9.1.0").forced());

    let graph = ctx.resolve(&index()).await.unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.get("fmt").unwrap().reference, reference("fmt/9.1.0"));
}

#[tokio::test]
async fn test_two_forced_versions_conflict() {
    let mut ctx = context();
    ctx.require(&app(), &spec("fmt/9.1.0").forced());
    ctx.require(&reference("tests/1.0"), &spec("fmt/8.1.1").forced());

    assert!(matches!(
        ctx.resolve(&index()).await,
        Err(ResolveError::ConflictingVersionConstraint { .. })
    ));
}

#[tokio::test]
async fn test_same_version_from_two_manifests_is_shared() {
    let mut ctx = context();
    ctx.require(&app(), &spec("xxhash/0.8.1"));
    ctx.require(&reference("tests/1.0"), &spec("xxhash/0.8.1"));

    let graph = ctx.resolve(&index()).await.unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.get("xxhash").unwrap().required_by.len(), 2);
}

#[tokio::test]
async fn test_cycle_is_reported() {
    let mut ctx = context();
    ctx.require(&app(), &spec("loop-a/1.0"));

    let err = ctx.resolve(&index()).await.unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"circular dependency: loop-a/1.0 -> loop-b/1.0 -> loop-a/1.0");
}

#[tokio::test]
async fn test_header_only_option() {
    let mut ctx = context();
    ctx.require(&app(), &spec("boost/1.80.0"));
    ctx.set_option("boost", DependencyOption::HeaderOnly(true));
    let header_only = ctx.resolve(&index()).await.unwrap();
    let boost = header_only.get("boost").unwrap();
    assert_eq!(boost.artifact, ArtifactKind::HeaderOnly);
    assert_eq!(boost.option(OptionKind::HeaderOnly), Some(true));
    assert_eq!(boost.option(OptionKind::Shared), Some(false));

    let mut debug = Settings::detect();
    debug.apply("os=Windows").unwrap();
    debug.apply("build_type=Debug").unwrap();
    let mut other = ResolverContext::new(debug, SettingsAxis::ALL.into_iter().collect());
    other.require(&app(), &spec("boost/1.80.0"));
    other.set_option("boost", DependencyOption::HeaderOnly(true));
    let other = other.resolve(&index()).await.unwrap();
    assert_eq!(other.get("boost").unwrap().package_id, boost.package_id);
}

#[tokio::test]
async fn test_compiled_package_id_depends_on_settings() {
    let mut release = context();
    release.require(&app(), &spec("xxhash/0.8.1"));

    let mut settings = linux_release();
    settings.apply("build_type=Debug").unwrap();
    let mut debug = ResolverContext::new(settings, SettingsAxis::ALL.into_iter().collect());
    debug.require(&app(), &spec("xxhash/0.8.1"));

    let a = release.resolve(&index()).await.unwrap();
    let b = debug.resolve(&index()).await.unwrap();
    assert_ne!(
        a.get("xxhash").unwrap().package_id,
        b.get("xxhash").unwrap().package_id
    );
    assert_eq!(a.get("xxhash").unwrap().artifact, ArtifactKind::Library);
}

#[tokio::test]
async fn test_header_library_type() {
    let mut ctx = context();
    ctx.require(&app(), &spec("cli11/2.2.0"));
    let graph = ctx.resolve(&index()).await.unwrap();
    assert!(graph.get("cli11").unwrap().is_header_only());
}

#[tokio::test]
async fn test_undeclared_option_is_ignored() {
    let mut ctx = context();
    ctx.require(&app(), &spec("xxhash/0.8.1"));
    ctx.set_option("xxhash", DependencyOption::Shared(true));
    ctx.set_option("absent", DependencyOption::Fpic(false));

    let graph = ctx.resolve(&index()).await.unwrap();
    let xxhash = graph.get("xxhash").unwrap();
    assert!(xxhash.options.is_empty());
    assert_eq!(xxhash.artifact, ArtifactKind::Library);
}

#[tokio::test]
async fn test_transitive_option_applies() {
    let mut ctx = context();
    ctx.require(&app(), &spec("spdlog/1.10.0"));
    ctx.set_option("fmt", DependencyOption::Fpic(false));

    let graph = ctx.resolve(&index()).await.unwrap();
    assert_eq!(graph.get("fmt").unwrap().option(OptionKind::Fpic), Some(false));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let mut ctx = context();
    ctx.require(&app(), &spec("xxhash/0.8.1"));
    ctx.cancellation_token().cancel();

    assert!(matches!(
        ctx.resolve(&index()).await,
        Err(ResolveError::Interrupted)
    ));
}

#[test]
fn test_set_option_replaces_same_kind() {
    let mut ctx = context();
    ctx.set_option("boost", DependencyOption::HeaderOnly(false));
    ctx.set_option("boost", DependencyOption::Shared(true));
    ctx.set_option("boost", DependencyOption::HeaderOnly(true));
    assert_eq!(
        ctx.options_for("boost"),
        [DependencyOption::Shared(true), DependencyOption::HeaderOnly(true)]
    );
    assert!(ctx.options_for("fmt").is_empty());
}

#[test]
fn test_package_id_stable_and_order_insensitive() {
    let settings = BTreeMap::from([("os".to_string(), "Linux".to_string())]);
    let options = BTreeMap::from([(OptionKind::Shared, false)]);
    let a = package_id::compute(
        &settings,
        &options,
        &[reference("zlib/1.2.13"), reference("bzip2/1.0.8")],
    );
    let b = package_id::compute(
        &settings,
        &options,
        &[reference("bzip2/1.0.8"), reference("zlib/1.2.13")],
    );
    assert_eq!(a, b);
    assert_eq!(a.len(), package_id::PACKAGE_ID_LEN);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, package_id::compute(&BTreeMap::new(), &options, &[]));
}

fn node(name: &str, requires: &[&str]) -> ResolvedPackage {
    let reference = reference(&format!("{name}/1.0"));
    ResolvedPackage {
        recipe: Recipe::new(name, "1.0"),
        options: BTreeMap::new(),
        artifact: ArtifactKind::Library,
        package_id: String::new(),
        requires: requires.iter().map(|r| self::reference(&format!("{r}/1.0"))).collect(),
        required_by: BTreeSet::new(),
        direct: false,
        reference,
    }
}

#[test]
fn test_topological_order_dependencies_first() {
    let mut graph = DependencyGraph::new();
    graph.insert(node("spdlog", &["fmt"]));
    graph.insert(node("fmt", &[]));
    graph.insert(node("app-core", &["spdlog", "boost"]));
    graph.insert(node("boost", &[]));

    let order: Vec<&str> = graph
        .topological_order()
        .unwrap()
        .into_iter()
        .map(ResolvedPackage::name)
        .collect();
    assert_eq!(order, ["boost", "fmt", "spdlog", "app-core"]);
}

#[test]
fn test_topological_order_rejects_cycle() {
    let mut graph = DependencyGraph::new();
    graph.insert(node("a", &["b"]));
    graph.insert(node("b", &["c"]));
    graph.insert(node("c", &["a"]));

    assert_eq!(
        graph.detect_cycle(),
        Some(vec!["a".into(), "b".into(), "c".into(), "a".into()])
    );
    assert!(matches!(
        graph.topological_order(),
        Err(ResolveError::CircularDependency { .. })
    ));
}
