// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for textflow.

pub mod pipeline;
pub mod plan;
pub mod run;
pub mod types;
pub mod validate;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;
use crate::pipeline::Pipeline;
use crate::store::PipelineStore;

/// Text-transformation pipeline runner
///
/// Chain summarize, translate, rewrite and extract steps and run them on a
/// document.
#[derive(Parser, Debug)]
#[clap(
    name = "textflow",
    version,
    about = "Validate and run linear text-transformation pipelines",
    long_about = None,
    after_help = "Examples:\n\
        textflow validate digest.yaml              Check a pipeline file\n\
        textflow plan digest.yaml                  Show the steps that would run\n\
        textflow run digest.yaml -i article.txt    Run a pipeline on a document\n\
        textflow pipeline import digest.yaml       Store a pipeline for later runs\n\
        textflow run --id digest < article.txt     Run a stored pipeline\n\n\
        See 'textflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ./textflow.toml when present)
    #[clap(long, global = true, env = "TEXTFLOW_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a pipeline file
    Validate {
        /// Pipeline file (YAML or JSON)
        file: PathBuf,
    },

    /// Show the normalized steps a run would execute, without running them
    Plan {
        #[clap(flatten)]
        source: PipelineSource,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run a pipeline on an input document
    Run {
        #[clap(flatten)]
        source: PipelineSource,

        /// Input document (default: stdin)
        #[clap(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[clap(flatten)]
        timeouts: TimeoutArgs,
    },

    /// Manage stored pipelines
    Pipeline {
        #[clap(subcommand)]
        action: PipelineAction,
    },

    /// List step types and their parameters
    Types,
}

/// Where to read a pipeline from
#[derive(Args, Debug, Clone)]
#[clap(group(ArgGroup::new("source").required(true).args(["file", "id"])))]
pub struct PipelineSource {
    /// Pipeline file (YAML or JSON)
    pub file: Option<PathBuf>,

    /// Id of a stored pipeline
    #[clap(long)]
    pub id: Option<String>,
}

impl PipelineSource {
    /// Load the pipeline from its file or from the configured store
    pub async fn load(&self, settings: &Settings) -> miette::Result<Pipeline> {
        if let Some(ref file) = self.file {
            return Ok(Pipeline::from_file(file)?);
        }

        let id = self
            .id
            .as_deref()
            .ok_or_else(|| miette::miette!("Either a pipeline file or --id is required"))?;
        let store = settings.open_store()?;
        Ok(store.get(id).await?)
    }
}

/// Command-line overrides for the configured timeouts
#[derive(Args, Debug, Clone, Default)]
pub struct TimeoutArgs {
    /// Limit for each step, e.g. "30s"
    #[clap(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub step_timeout: Option<Duration>,

    /// Limit for the whole run, e.g. "2m"
    #[clap(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub run_timeout: Option<Duration>,
}

/// Stored pipeline actions
#[derive(Subcommand, Debug, Clone)]
pub enum PipelineAction {
    /// List stored pipelines
    List,

    /// Show a stored pipeline
    Show {
        /// Pipeline id
        id: String,
    },

    /// Validate a pipeline file and store it
    Import {
        /// Pipeline file (YAML or JSON)
        file: PathBuf,

        /// Store even if the pipeline does not validate
        #[clap(long)]
        force: bool,
    },

    /// Delete a stored pipeline
    Delete {
        /// Pipeline id
        id: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
