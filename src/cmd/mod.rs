// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, inis), manifest (new, inspect),
//!   install (graph, install), search
//! ```

pub mod config;
pub mod install;
pub mod manifest;
pub mod search;
