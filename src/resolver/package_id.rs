// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Binary package identifiers.
//!
//! ```text
//! [settings]          (omitted for header-only artifacts)
//! build_type=Release
//! os=Linux
//! [options]
//! shared=false
//! [requires]
//! zlib/1.2.13
//!      |
//!  SHA-256 --> hex, first 40 chars
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::manifest::options::OptionKind;
use crate::manifest::reference::Reference;

/// Length of a package id in hex characters.
pub const PACKAGE_ID_LEN: usize = 40;

/// Computes the id of one binary configuration.
///
/// Inputs are rendered in sorted order so the id does not depend on
/// declaration order.
#[must_use]
pub fn compute(
    settings: &BTreeMap<String, String>,
    options: &BTreeMap<OptionKind, bool>,
    requires: &[Reference],
) -> String {
    let mut info = String::new();

    if !settings.is_empty() {
        info.push_str("[settings]\n");
        for (key, value) in settings {
            let _ = writeln!(info, "{key}={value}");
        }
    }

    if !options.is_empty() {
        info.push_str("[options]\n");
        for (kind, value) in options {
            let _ = writeln!(info, "{kind}={value}");
        }
    }

    if !requires.is_empty() {
        let mut sorted: Vec<&Reference> = requires.iter().collect();
        sorted.sort();
        info.push_str("[requires]\n");
        for reference in sorted {
            let _ = writeln!(info, "{reference}");
        }
    }

    let digest = Sha256::digest(info.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(PACKAGE_ID_LEN);
    id
}
