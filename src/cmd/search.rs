// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `search`.

use crate::cli::install::SearchArgs;
use crate::config::Config;
use crate::error::Result;
use crate::index::{IndexChain, PackageIndex};

/// Prints every reference matching the pattern in any configured index.
///
/// # Errors
///
/// Returns an `IndexError` for an invalid pattern or a failing index.
pub async fn run_search_command(args: &SearchArgs, config: &Config) -> Result<()> {
    let index = IndexChain::from_config(&config.index)?;
    let found = index.search(&args.pattern).await?;
    if found.is_empty() {
        println!("No packages found");
    } else {
        for reference in found {
            println!("{reference}");
        }
    }
    Ok(())
}
