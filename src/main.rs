// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Version | Options | Inis | New | Inspect | Graph | Install | Search
//! ```

use std::process::ExitCode;

use cmt_deps::cli::global::GlobalOptions;
use cmt_deps::cli::{self, Command};
use cmt_deps::cmd::config::{run_inis_command, run_options_command};
use cmt_deps::cmd::install::{run_graph_command, run_install_command};
use cmt_deps::cmd::manifest::{run_inspect_command, run_new_command};
use cmt_deps::cmd::search::run_search_command;
use cmt_deps::config::Config;
use cmt_deps::config::loader::ConfigLoader;
use cmt_deps::logging::init_logging;
use cmt_deps::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Config file picked up from the current directory.
const DEFAULT_INI: &str = "cmt.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    // A broken config must not prevent logging; CLI levels still apply.
    let config = load_config(&cli.global);

    let log_config = build_log_config(&cli.global, config.as_ref().ok());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .or_else(|| config.map(|c| c.global.output_log_level))
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .or_else(|| config.map(|c| c.global.file_log_level))
        .unwrap_or(console_level);

    let log_file = global
        .log_file
        .clone()
        .or_else(|| config.and_then(|c| c.global.log_file.clone()));

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: cmt_deps::error::Result<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| run_options_command(&config)),
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::New(args)) => run_new_command(args),
        Some(Command::Inspect(args)) => run_inspect_command(args),
        Some(Command::Graph(args)) => match config {
            Ok(config) => run_graph_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Install(args)) => match config {
            Ok(config) => run_install_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Search(args)) => match config {
            Ok(config) => run_search_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_inis {
        loader = loader.add_toml_file_optional(DEFAULT_INI);
    }
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix("CMT")
}

fn load_config(global: &GlobalOptions) -> cmt_deps::error::Result<Config> {
    build_config_loader(global)
        .with_overrides(&global.to_config_overrides())?
        .build()
}
