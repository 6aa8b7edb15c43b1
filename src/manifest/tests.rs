// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeSet;

use super::generators::{GeneratorSet, ToolchainBackend};
use super::options::{DependencyOption, OptionAssignment, OptionKind};
use super::presets::{self, Variant};
use super::reference::Reference;
use super::settings::{BuildType, Settings, SettingsAxis};
use super::{DependencySpec, ManifestDescriptor};
use crate::error::ManifestError;

fn reference(s: &str) -> Reference {
    s.parse().unwrap()
}

// --- Reference ---

#[test]
fn test_reference_parse_and_display() {
    let r = reference("boost/1.80.0");
    assert_eq!(r.name(), "boost");
    assert_eq!(r.version(), "1.80.0");
    assert_eq!(r.major(), "1");
    assert_eq!(r.to_string(), "boost/1.80.0");
}

#[test]
fn test_reference_rejects_malformed() {
    for bad in ["boost", "Boost/1.0", "boost/", "/1.0", "bo ost/1.0", "boost/1 0"] {
        assert!(bad.parse::<Reference>().is_err(), "{bad} should be rejected");
    }
    let err = "boost".parse::<Reference>().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid reference 'boost': expected 'name/version'");
}

#[test]
fn test_reference_orders_semver_numerically() {
    let mut refs = vec![
        reference("fmt/10.0.0"),
        reference("fmt/9.1.0"),
        reference("boost/1.80.0"),
    ];
    refs.sort();
    let ordered: Vec<String> = refs.iter().map(ToString::to_string).collect();
    assert_eq!(ordered, ["boost/1.80.0", "fmt/9.1.0", "fmt/10.0.0"]);
}

// --- Options ---

#[test]
fn test_option_from_toml() {
    let opt = DependencyOption::from_toml("boost", "header_only", &toml::Value::Boolean(true))
        .unwrap();
    assert_eq!(opt, DependencyOption::HeaderOnly(true));
    assert_eq!(opt.to_string(), "header_only=true");

    let fpic = DependencyOption::from_toml("zlib", "fpic", &toml::Value::String("no".into()))
        .unwrap();
    assert_eq!(fpic, DependencyOption::Fpic(false));
}

#[test]
fn test_option_unknown_name() {
    let err = DependencyOption::from_toml("boost", "lto", &toml::Value::Boolean(true)).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown option 'lto' for dependency 'boost'");
}

#[test]
fn test_option_non_boolean_value() {
    let err =
        DependencyOption::from_toml("boost", "shared", &toml::Value::Integer(3)).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidOptionValue { .. }));
}

#[test]
fn test_option_assignment_parse() {
    let assignment: OptionAssignment = "spdlog:shared=True".parse().unwrap();
    assert_eq!(assignment.dependency, "spdlog");
    assert_eq!(assignment.option, DependencyOption::Shared(true));
    assert!("spdlog-shared=true".parse::<OptionAssignment>().is_err());
    assert!("spdlog:shared".parse::<OptionAssignment>().is_err());
}

#[test]
fn test_option_assignment_malformed_message() {
    for input in ["boost=true", ":header_only=true", "boost:header_only"] {
        let err = input.parse::<OptionAssignment>().unwrap_err();
        assert!(matches!(err, ManifestError::MalformedAssignment(ref s) if s == input));
    }
    insta::assert_snapshot!(
        "boost=true".parse::<OptionAssignment>().unwrap_err().to_string(),
        @"malformed option 'boost=true': expected 'dependency:option=value'"
    );
}

#[test]
fn test_with_option_replaces_same_kind() {
    let spec = DependencySpec::new(reference("boost/1.80.0"))
        .with_option(DependencyOption::HeaderOnly(false))
        .with_option(DependencyOption::Shared(true))
        .with_option(DependencyOption::HeaderOnly(true));
    assert_eq!(
        spec.options(),
        [DependencyOption::Shared(true), DependencyOption::HeaderOnly(true)]
    );
}

// --- Settings ---

#[test]
fn test_settings_apply() {
    let mut settings = Settings::detect();
    settings.apply("build_type=debug").unwrap();
    settings.apply("compiler.cppstd=20").unwrap();
    settings.apply("compiler.libcxx=").unwrap();
    assert_eq!(settings.build_type, BuildType::Debug);
    assert_eq!(settings.compiler.cppstd.as_deref(), Some("20"));
    assert_eq!(settings.compiler.libcxx, None);

    assert!(settings.apply("optimizer=O3").is_err());
    assert!(settings.apply("build_type").is_err());
}

#[test]
fn test_values_for_only_declared_axes() {
    let mut settings = Settings::detect();
    settings.apply("build_type=Release").unwrap();
    let axes: BTreeSet<_> = [SettingsAxis::BuildType].into_iter().collect();
    let values = settings.values_for(&axes);
    assert_eq!(values.len(), 1);
    assert_eq!(values.get("build_type").map(String::as_str), Some("Release"));
}

#[test]
fn test_unknown_axis() {
    let err = "platform".parse::<SettingsAxis>().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown setting 'platform' (expected os, arch, compiler or build_type)");
}

// --- Generators ---

#[test]
fn test_backend_parse_and_names() {
    let backend: ToolchainBackend = "make".parse().unwrap();
    assert_eq!(backend, ToolchainBackend::UnixMakefiles);
    assert_eq!(backend.cmake_generator(), "Unix Makefiles");
    assert_eq!(backend.program(), "make");
    assert!(!backend.is_multi_config());
    assert!(ToolchainBackend::VisualStudio17.is_multi_config());
    assert!("scons".parse::<ToolchainBackend>().is_err());
}

#[test]
fn test_generator_tags() {
    let set = GeneratorSet::parse_tag("CMakeDeps").unwrap() | GeneratorSet::CMAKE_TOOLCHAIN;
    assert_eq!(set.tags(), ["CMakeDeps", "CMakeToolchain"]);
    assert!(GeneratorSet::parse_tag("Premake").is_err());
}

// --- Descriptor ---

const MANIFEST: &str = r#"
requires = ["boost/1.80.0", { ref = "fmt/9.1.0", force = true }]

[package]
name = "demo"
version = "0.1.0"
generators = ["CMakeDeps"]
settings = ["os", "build_type"]

[options.boost]
header_only = true

[options.zlib]
fPIC = false

[toolchain]
generator = "Unix Makefiles"
"#;

#[test]
fn test_parse_manifest() {
    let manifest = ManifestDescriptor::parse(MANIFEST).unwrap();

    assert_eq!(manifest.package().to_string(), "demo/0.1.0");
    assert!(manifest.generators().contains(GeneratorSet::CMAKE_DEPS));
    assert!(manifest.generators().contains(GeneratorSet::CMAKE_TOOLCHAIN));
    assert_eq!(
        manifest.settings().iter().copied().collect::<Vec<_>>(),
        [SettingsAxis::Os, SettingsAxis::BuildType]
    );
    assert_eq!(manifest.backend(), ToolchainBackend::UnixMakefiles);

    let requires = manifest.requires();
    assert_eq!(requires.len(), 2);
    assert_eq!(requires[0].options(), [DependencyOption::HeaderOnly(true)]);
    assert!(!requires[0].is_forced());
    assert!(requires[1].is_forced());

    assert_eq!(
        manifest.transitive_options().get("zlib"),
        Some(&vec![DependencyOption::Fpic(false)])
    );
    assert!(manifest.has_options());
}

#[test]
fn test_parse_defaults() {
    let manifest =
        ManifestDescriptor::parse("[package]\nname = \"bare\"\nversion = \"1.0\"\n").unwrap();
    assert_eq!(manifest.generators(), GeneratorSet::CMAKE_TOOLCHAIN);
    assert_eq!(manifest.settings().len(), SettingsAxis::ALL.len());
    assert_eq!(manifest.backend(), ToolchainBackend::Ninja);
    assert!(manifest.requires().is_empty());
    assert!(!manifest.has_options());
}

#[test]
fn test_parse_rejects_unknown_section() {
    let err = ManifestDescriptor::parse(
        "[package]\nname = \"a\"\nversion = \"1\"\n\n[build]\njobs = 4\n",
    )
    .unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }));
}

#[test]
fn test_duplicate_requirement_rejected() {
    let err = ManifestDescriptor::parse(
        "requires = [\"fmt/9.1.0\", \"fmt/8.1.1\"]\n[package]\nname = \"a\"\nversion = \"1\"\n",
    )
    .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"dependency 'fmt' is required more than once (fmt/9.1.0 and fmt/8.1.1)");
}

#[test]
fn test_toml_round_trip_preserves_manifest() {
    let manifest = ManifestDescriptor::parse(MANIFEST).unwrap();
    let rendered = manifest.to_toml().unwrap();
    let reparsed = ManifestDescriptor::parse(&rendered).unwrap();
    assert_eq!(manifest, reparsed);
}

// --- Presets ---

#[test]
fn test_runtime_preset() {
    let manifest = presets::manifest(Variant::Runtime).unwrap();
    let names: Vec<&str> = manifest.requires().iter().map(DependencySpec::name).collect();
    assert_eq!(names, ["boost", "spdlog", "cli11", "xxhash"]);
    assert_eq!(
        manifest.requires()[0].options(),
        [DependencyOption::HeaderOnly(true)]
    );
    assert!(manifest.generators().contains(GeneratorSet::CMAKE_DEPS));
    assert_eq!(manifest.package().name(), presets::PACKAGE_NAME);
}

#[test]
fn test_testing_preset_adds_catch2_without_options() {
    let manifest = presets::manifest(Variant::Testing).unwrap();
    assert_eq!(manifest.requires().len(), 5);
    assert_eq!(manifest.requires()[4].reference().to_string(), "catch2/3.1.0");
    assert!(!manifest.has_options());
    assert_eq!(OptionKind::HeaderOnly.to_string(), "header_only");
}
