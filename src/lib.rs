// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        new / inspect / graph / install
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |         processor         |
//!              | requirements -> configure |
//!              |  -> resolve -> generate   |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!             manifest    resolver  generate
//!           TOML, presets  BFS/DAG  toolchain,
//!                             |     CMakeDeps
//!                             v
//!                           index
//!                     local / HTTP / memory
//!
//!   +-----------------------------------------+
//!   |  foundation   config, error, logging    |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod generate;
pub mod index;
pub mod logging;
pub mod manifest;
pub mod processor;
pub mod resolver;
