// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::Path;

use crate::config::prepare_environment;

/// Image Analyzer CLI
#[derive(Parser, Debug)]
#[command(name = "image-analyzer-cli")]
#[command(version)]
#[command(about = "Analyze local images with Azure Computer Vision", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an image file and print its summary
    Analyze(analyze::AnalyzeArgs),

    /// Normalize an image file to RGB JPEG without calling the service
    Normalize(analyze::NormalizeArgs),
}

/// Default tracing filter of the CLI
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Load environment variables from a `.env` file, then parse the command line.
///
/// The file must be loaded first so its values reach clap's `env` fallbacks.
/// With no path, `.env` is searched from the current directory upwards.
pub fn load_env_then_parse<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    prepare_environment(env_file, DEFAULT_LOG_FILTER);
    Cli::try_parse_from(args)
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => analyze::analyze_file(args).await,
        Commands::Normalize(args) => analyze::normalize_file(args).await,
    }
}
