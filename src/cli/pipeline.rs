// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Pipeline command - manage stored pipelines

use colored::Colorize;
use miette::Result;

use super::PipelineAction;
use crate::config::Settings;
use crate::errors::RecoverySuggestion;
use crate::pipeline::{Pipeline, PipelineValidator};
use crate::store::PipelineStore;
use crate::utils::{print_success, print_warning};

/// Run a pipeline store action
pub async fn run(action: PipelineAction, settings: &Settings, verbose: bool) -> Result<()> {
    let store = settings.open_store()?;

    if verbose {
        eprintln!("{} {}", "Store:".dimmed(), store.dir().display());
    }

    match action {
        PipelineAction::List => {
            let pipelines = store.list().await?;
            if pipelines.is_empty() {
                println!("No stored pipelines.");
                return Ok(());
            }

            for pipeline in pipelines {
                let status = if PipelineValidator::validate(&pipeline).is_ok() {
                    "".normal()
                } else {
                    "(invalid)".yellow()
                };
                println!(
                    "  {} {} {} {}",
                    pipeline.id.bold(),
                    pipeline.name,
                    format!("[{}]", pipeline.step_ids().join(" → ")).dimmed(),
                    status
                );
            }
        }

        PipelineAction::Show { id } => {
            let pipeline = store.get(&id).await?;
            print!("{}", pipeline.to_yaml()?);
        }

        PipelineAction::Import { file, force } => {
            let pipeline = Pipeline::from_file(&file)?;

            if let Err(error) = PipelineValidator::validate(&pipeline) {
                if !force {
                    eprint!("{}", RecoverySuggestion::for_validation(&error));
                    return Err(error.into());
                }
                print_warning(&format!("Storing invalid pipeline: {}", error));
            }

            store.put(&pipeline).await?;
            print_success(&format!("Stored pipeline '{}'", pipeline.id));
        }

        PipelineAction::Delete { id } => {
            store.delete(&id).await?;
            print_success(&format!("Deleted pipeline '{}'", id));
        }
    }

    Ok(())
}
