// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-package `find_package` config files (`CMakeDeps`).

use std::fmt::Write as _;

use super::{GenerateRequest, cmake_path, package_folder};
use crate::index::recipe::Recipe;
use crate::resolver::{ArtifactKind, ResolvedPackage};

/// Base name of a package's config files, lowercased like `CMake` looks
/// them up.
#[must_use]
pub fn config_file_stem(recipe: &Recipe) -> String {
    recipe.file_name().to_lowercase()
}

/// Variable prefix such as `spdlog` or `Boost`, restricted to identifier
/// characters.
fn variable_prefix(recipe: &Recipe) -> String {
    recipe
        .file_name()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Renders `<file>-config.cmake` for one resolved package.
#[must_use]
pub fn render_config(request: &GenerateRequest<'_>, package: &ResolvedPackage) -> String {
    let recipe = &package.recipe;
    let prefix = variable_prefix(recipe);
    let target = recipe.target_name();
    let folder = package_folder(request.cache_root(), &package.reference, &package.package_id);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# Generated by cmt-deps for {} ({}). Do not edit.",
        package.reference, package.package_id
    );
    out.push_str("include_guard(GLOBAL)\ninclude(CMakeFindDependencyMacro)\n");

    let dependencies: Vec<&ResolvedPackage> = package
        .requires
        .iter()
        .filter_map(|r| request.graph().get(r.name()))
        .collect();
    if !dependencies.is_empty() {
        out.push('\n');
        for dep in &dependencies {
            let _ = writeln!(out, "find_dependency({} CONFIG)", dep.recipe.file_name());
        }
    }

    let _ = write!(
        out,
        "\nset({prefix}_VERSION \"{}\")\n\
         set({prefix}_PACKAGE_FOLDER \"{}\")\n\
         set({prefix}_INCLUDE_DIRS \"${{{prefix}_PACKAGE_FOLDER}}/include\")\n",
        package.reference.version(),
        cmake_path(&folder),
    );

    let _ = write!(
        out,
        "\nif(NOT TARGET {target})\n  add_library({target} INTERFACE IMPORTED)\nendif()\n\
         set_property(TARGET {target} PROPERTY INTERFACE_INCLUDE_DIRECTORIES \"${{{prefix}_INCLUDE_DIRS}}\")\n"
    );

    if package.artifact == ArtifactKind::Library {
        for lib in &recipe.libs {
            let var = format!("{prefix}_{}_LIBRARY", lib.to_uppercase().replace('-', "_"));
            let _ = write!(
                out,
                "\nfind_library({var} NAMES {lib} PATHS \"${{{prefix}_PACKAGE_FOLDER}}/lib\" NO_DEFAULT_PATH)\n\
                 if({var})\n  target_link_libraries({target} INTERFACE \"${{{var}}}\")\nendif()\n"
            );
        }
    }

    if !dependencies.is_empty() {
        let targets: Vec<String> = dependencies.iter().map(|d| d.recipe.target_name()).collect();
        let _ = writeln!(
            out,
            "\ntarget_link_libraries({target} INTERFACE {})",
            targets.join(" ")
        );
    }

    let _ = writeln!(out, "\nset({prefix}_FOUND TRUE)");
    out
}

/// Renders `<file>-config-version.cmake`: exact match, or same major
/// version and not older.
#[must_use]
pub fn render_config_version(package: &ResolvedPackage) -> String {
    let version = package.reference.version();
    let major = package.reference.major();
    format!(
        "# Generated by cmt-deps for {reference}. Do not edit.\n\
         set(PACKAGE_VERSION \"{version}\")\n\
         \n\
         if(PACKAGE_FIND_VERSION VERSION_EQUAL PACKAGE_VERSION)\n\
         \x20 set(PACKAGE_VERSION_COMPATIBLE TRUE)\n\
         \x20 set(PACKAGE_VERSION_EXACT TRUE)\n\
         elseif(PACKAGE_FIND_VERSION VERSION_GREATER PACKAGE_VERSION)\n\
         \x20 set(PACKAGE_VERSION_COMPATIBLE FALSE)\n\
         elseif(PACKAGE_FIND_VERSION_MAJOR STREQUAL \"{major}\")\n\
         \x20 set(PACKAGE_VERSION_COMPATIBLE TRUE)\n\
         else()\n\
         \x20 set(PACKAGE_VERSION_COMPATIBLE FALSE)\n\
         endif()\n",
        reference = package.reference,
    )
}
