// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Toolchain file and `CMakePresets.json`.
//!
//! The toolchain file only refers to its own directory through
//! `CMAKE_CURRENT_LIST_DIR`, so moving the output folder does not change
//! its bytes.

use std::fmt::Write as _;

use serde_json::json;

use super::{GenerateRequest, TOOLCHAIN_FILE, cmake_path};
use crate::error::GenerateError;
use crate::manifest::options::OptionKind;
use crate::manifest::settings::{CompilerKind, SettingsAxis};

/// Renders `cmt_toolchain.cmake`.
#[must_use]
pub fn render_toolchain(request: &GenerateRequest<'_>) -> String {
    let settings = request.settings();
    let backend = request.backend();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# Generated by cmt-deps for {}. Do not edit.",
        request.package()
    );
    let _ = writeln!(out, "# Backend: {}", backend.cmake_generator());
    for (key, value) in &settings.values_for(request.axes) {
        let _ = writeln!(out, "# {key}={value}");
    }
    out.push_str("\ninclude_guard()\n");

    if request.declares(SettingsAxis::BuildType) && !backend.is_multi_config() {
        let _ = write!(
            out,
            "\nset(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"Build type\" FORCE)\n",
            settings.build_type
        );
    }

    if request.declares(SettingsAxis::Compiler) {
        let compiler = &settings.compiler;
        let (cc, cxx) = compiler.kind.executables();
        let _ = write!(
            out,
            "\nset(CMAKE_C_COMPILER \"{cc}\")\nset(CMAKE_CXX_COMPILER \"{cxx}\")\n"
        );

        if let Some(ref cppstd) = compiler.cppstd {
            let (standard, extensions) = cppstd
                .strip_prefix("gnu")
                .map_or((cppstd.as_str(), "OFF"), |std| (std, "ON"));
            let _ = write!(
                out,
                "\nset(CMAKE_CXX_STANDARD {standard})\n\
                 set(CMAKE_CXX_STANDARD_REQUIRED ON)\n\
                 set(CMAKE_CXX_EXTENSIONS {extensions})\n"
            );
        }

        match (compiler.kind, compiler.libcxx.as_deref()) {
            (CompilerKind::Clang | CompilerKind::AppleClang, Some("libc++")) => {
                out.push_str("\nstring(APPEND CMAKE_CXX_FLAGS_INIT \" -stdlib=libc++\")\n");
            }
            (CompilerKind::Gcc | CompilerKind::Clang, Some("libstdc++11")) => {
                out.push_str("\nadd_compile_definitions(_GLIBCXX_USE_CXX11_ABI=1)\n");
            }
            (CompilerKind::Gcc | CompilerKind::Clang, Some("libstdc++")) => {
                out.push_str("\nadd_compile_definitions(_GLIBCXX_USE_CXX11_ABI=0)\n");
            }
            _ => {}
        }

        if compiler.kind == CompilerKind::Msvc {
            out.push_str(
                "\nset(CMAKE_MSVC_RUNTIME_LIBRARY \"MultiThreaded$<$<CONFIG:Debug>:Debug>DLL\")\n",
            );
        }
    }

    if request
        .graph()
        .iter()
        .any(|p| p.option(OptionKind::Fpic) == Some(true))
    {
        out.push_str("\nset(CMAKE_POSITION_INDEPENDENT_CODE ON)\n");
    }

    out.push_str(
        "\nlist(PREPEND CMAKE_MODULE_PATH \"${CMAKE_CURRENT_LIST_DIR}\")\n\
         list(PREPEND CMAKE_PREFIX_PATH \"${CMAKE_CURRENT_LIST_DIR}\")\n\
         set(CMAKE_FIND_PACKAGE_PREFER_CONFIG ON)\n",
    );
    out
}

/// Renders `CMakePresets.json` with a single configure preset.
///
/// # Errors
///
/// Returns `GenerateError::Render` if serialization fails.
pub fn render_presets(request: &GenerateRequest<'_>) -> Result<String, GenerateError> {
    let build_type = request.settings().build_type;
    let name = format!("cmt-{}", build_type.as_str().to_lowercase());
    let toolchain = cmake_path(&request.output_dir().join(TOOLCHAIN_FILE));

    let mut cache_variables = serde_json::Map::new();
    cache_variables.insert("CMAKE_POLICY_DEFAULT_CMP0091".to_string(), json!("NEW"));
    if !request.backend().is_multi_config() {
        cache_variables.insert("CMAKE_BUILD_TYPE".to_string(), json!(build_type.as_str()));
    }

    let mut build_preset = serde_json::Map::new();
    build_preset.insert("name".to_string(), json!(name));
    build_preset.insert("configurePreset".to_string(), json!(name));
    if request.backend().is_multi_config() {
        build_preset.insert("configuration".to_string(), json!(build_type.as_str()));
    }

    let presets = json!({
        "version": 3,
        "cmakeMinimumRequired": { "major": 3, "minor": 21, "patch": 0 },
        "configurePresets": [{
            "name": name,
            "displayName": format!("{} ({})", request.package(), build_type),
            "generator": request.backend().cmake_generator(),
            "binaryDir": format!("${{sourceDir}}/build/{name}"),
            "toolchainFile": toolchain,
            "cacheVariables": cache_variables,
        }],
        "buildPresets": [build_preset],
    });

    let mut rendered =
        serde_json::to_string_pretty(&presets).map_err(|e| GenerateError::Render {
            file: super::PRESETS_FILE.to_string(),
            message: e.to_string(),
        })?;
    rendered.push('\n');
    Ok(rendered)
}
