// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{CmtError, CmtResult, ConfigError, FsError, GenerateError, ResolveError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "paths".to_string(),
        key: "output".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"missing required config key 'output' in section '[paths]'");
}

#[test]
fn test_unresolvable_names_reference_and_chain() {
    let err = ResolveError::UnresolvableDependency {
        reference: "nonexistent/9.9.9".to_string(),
        required_by: vec!["app/0.0.1".to_string()],
    };
    insta::assert_snapshot!(err.to_string(), @"unresolvable dependency 'nonexistent/9.9.9' (required by app/0.0.1)");
}

#[test]
fn test_conflict_display_shows_both_chains() {
    let err = ResolveError::ConflictingVersionConstraint {
        name: "fmt".to_string(),
        existing: "fmt/8.1.1".to_string(),
        existing_chain: vec!["app/1.0".to_string(), "spdlog/1.10.0".to_string()],
        requested: "fmt/9.1.0".to_string(),
        requested_chain: vec!["app/1.0".to_string()],
    };
    insta::assert_snapshot!(err.to_string(), @"conflicting versions for 'fmt': fmt/8.1.1 (via app/1.0 -> spdlog/1.10.0) vs fmt/9.1.0 (via app/1.0)");
}

#[test]
fn test_backend_unavailable_display() {
    let err = GenerateError::BackendUnavailable {
        backend: "Ninja".to_string(),
        program: "ninja".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"toolchain backend 'Ninja' is unavailable ('ninja' not found in PATH)");
}

#[test]
fn test_fs_error_classification() {
    let missing = FsError::from_io("a", std::io::Error::from(std::io::ErrorKind::NotFound));
    let denied = FsError::from_io("b", std::io::Error::from(std::io::ErrorKind::PermissionDenied));
    let other = FsError::from_io("c", std::io::Error::other("boom"));

    assert!(matches!(missing, FsError::NotFound(p) if p == "a"));
    assert!(matches!(denied, FsError::PermissionDenied(p) if p == "b"));
    assert!(matches!(other, FsError::IoError { path, .. } if path == "c"));
}

#[test]
fn test_cmt_error_size() {
    // Box<str> (Other) is 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<CmtError>();
    assert!(size <= 24, "CmtError is {size} bytes, expected <= 24");
}

#[test]
fn test_cmt_result_size() {
    let size = std::mem::size_of::<CmtResult<()>>();
    assert!(size <= 24, "CmtResult<()> is {size} bytes, expected <= 24");
}
