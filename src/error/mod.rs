// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                 CmtError (~24 bytes)
//!                        |
//!     +------+------+------+------+------+------+
//!     |      |      |      |      |      |      |
//!     v      v      v      v      v      v      v
//! Manifest Resolve Index Generate Cfg    Fs  Io/Other
//!   Box     Box     Box    Box     Box   Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Manifest  Parse, InvalidReference, UnknownOption, ...
//!   Resolve   UnresolvableDependency, ConflictingVersionConstraint,
//!             CircularDependency, Interrupted
//!   Index     Http, Request, Decode, InvalidPattern, Io
//!   Generate  BackendUnavailable, Render, FileCollision,
//!             OutsideOutputDir, Write
//!   Config    ParseError, MissingKey, InvalidValue
//!   Fs        NotFound, PermissionDenied, IoError
//!
//! All variants boxed => CmtError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`CmtError`].
pub type CmtResult<T> = std::result::Result<T, CmtError>;

/// Result type for resolver operations.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum CmtError {
    /// Manifest could not be read or is invalid.
    #[error("manifest error: {0}")]
    Manifest(#[from] Box<ManifestError>),

    /// Dependency resolution failed.
    #[error("resolve error: {0}")]
    Resolve(#[from] Box<ResolveError>),

    /// Package index access failed.
    #[error("index error: {0}")]
    Index(#[from] Box<IndexError>),

    /// Toolchain generation failed.
    #[error("generate error: {0}")]
    Generate(#[from] Box<GenerateError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for CmtError {
                fn from(err: $error) -> Self {
                    CmtError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ManifestError => Manifest,
    ResolveError => Resolve,
    IndexError => Index,
    GenerateError => Generate,
    ConfigError => Config,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Manifest Errors ---

/// Errors raised while reading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read the manifest file.
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or does not match the schema.
    #[error("failed to parse manifest '{path}': {message}")]
    Parse { path: String, message: String },

    /// A `name/version` reference is malformed.
    #[error("invalid reference '{reference}': {message}")]
    InvalidReference { reference: String, message: String },

    /// Option name is not a known dependency option.
    #[error("unknown option '{option}' for dependency '{dependency}'")]
    UnknownOption { dependency: String, option: String },

    /// A command-line option is not `dependency:option=value`.
    #[error("malformed option '{0}': expected 'dependency:option=value'")]
    MalformedAssignment(String),

    /// Option value has the wrong type.
    #[error("invalid value for option '{option}' of '{dependency}': expected {expected}")]
    InvalidOptionValue {
        dependency: String,
        option: String,
        expected: &'static str,
    },

    /// The same dependency name was required twice in one manifest.
    #[error("dependency '{name}' is required more than once ({first} and {second})")]
    DuplicateRequirement {
        name: String,
        first: String,
        second: String,
    },

    /// A recipe's `cmake_file_name` is not a plain file name.
    #[error("invalid cmake_file_name '{value}' in recipe {reference}: {message}")]
    InvalidCMakeName {
        reference: String,
        value: String,
        message: &'static str,
    },

    /// Unknown settings axis.
    #[error("unknown setting '{0}' (expected os, arch, compiler or build_type)")]
    UnknownSetting(String),

    /// Unknown generator tag.
    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),

    /// Unknown toolchain backend.
    #[error("unknown toolchain backend '{0}'")]
    UnknownBackend(String),
}

// --- Resolve Errors ---

/// Dependency resolution errors.
///
/// Every variant is fatal for the current invocation.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No configured index has a recipe for the reference.
    #[error("unresolvable dependency '{reference}' (required by {})", required_by.join(" -> "))]
    UnresolvableDependency {
        reference: String,
        required_by: Vec<String>,
    },

    /// Two requirements pin different versions of the same package.
    #[error(
        "conflicting versions for '{name}': {existing} (via {}) vs {requested} (via {})",
        existing_chain.join(" -> "),
        requested_chain.join(" -> ")
    )]
    ConflictingVersionConstraint {
        name: String,
        existing: String,
        existing_chain: Vec<String>,
        requested: String,
        requested_chain: Vec<String>,
    },

    /// Recipes require each other in a loop.
    #[error("circular dependency: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// Resolution was cancelled.
    #[error("resolution interrupted")]
    Interrupted,

    /// The package index failed while looking up a recipe.
    #[error("index lookup for '{reference}' failed: {source}")]
    Index {
        reference: String,
        #[source]
        source: IndexError,
    },
}

// --- Index Errors ---

/// Package index errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    Http { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid index URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Recipe or listing could not be decoded.
    #[error("failed to decode {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    /// Search pattern is not a valid glob.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    /// I/O error while reading a local index.
    #[error("io error reading index: {0}")]
    Io(#[from] std::io::Error),
}

// --- Generate Errors ---

/// Toolchain generation errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The requested build-file generator is not installed.
    #[error("toolchain backend '{backend}' is unavailable ('{program}' not found in PATH)")]
    BackendUnavailable { backend: String, program: String },

    /// A file could not be rendered.
    #[error("failed to render '{file}': {message}")]
    Render { file: String, message: String },

    /// Two packages would write the same config file.
    #[error("packages {first} and {second} both generate '{file}'")]
    FileCollision {
        file: String,
        first: String,
        second: String,
    },

    /// A generated path does not stay inside the output directory.
    #[error("refusing to write '{0}': not a plain file name inside the output directory")]
    OutsideOutputDir(String),

    /// Writing a generated file failed.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Configuration file not found.
    #[error("config file not found: {0}")]
    NotFound(String),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Classify an I/O error on `path`.
    pub fn from_io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::IoError { path, source },
        }
    }
}

#[cfg(test)]
mod tests;
