// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! textflow - linear text-transformation pipelines
//!
//! Validate, preview and run summarize/translate/rewrite/extract pipelines.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textflow::cli::{Cli, Commands};
use textflow::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textflow=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    if !textflow::utils::should_use_colors() {
        colored::control::set_override(false);
    }

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let settings = Settings::load(cli.config.as_deref())?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Validate { file } => textflow::cli::validate::run(file, cli.verbose).await,
        Commands::Plan { source, format } => {
            textflow::cli::plan::run(source, format, &settings).await
        }
        Commands::Run {
            source,
            input,
            format,
            timeouts,
        } => textflow::cli::run::run(source, input, format, timeouts, &settings, cli.verbose).await,
        Commands::Pipeline { action } => {
            textflow::cli::pipeline::run(action, &settings, cli.verbose).await
        }
        Commands::Types => textflow::cli::types::run(cli.verbose).await,
    }
}
