// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Validate command - check a pipeline file

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::errors::RecoverySuggestion;
use crate::pipeline::{Pipeline, PipelineValidator};
use crate::utils::{print_error, print_section, print_success};

/// Run the validate command
pub async fn run(file: PathBuf, verbose: bool) -> Result<()> {
    println!("{}", "Validating pipeline...".bold());
    println!();

    let pipeline = match Pipeline::from_file(&file) {
        Ok(p) => p,
        Err(e) => {
            print_error("Failed to parse pipeline");
            eprintln!();
            return Err(e.into());
        }
    };

    print_success(&format!("Parsed '{}' ({} steps)", pipeline.name, pipeline.steps.len()));

    let validated = match PipelineValidator::validate(&pipeline) {
        Ok(validated) => validated,
        Err(error) => {
            print_error(&error.to_string());
            println!();
            print!("{}", RecoverySuggestion::for_validation(&error));
            println!();
            return Err(error.into());
        }
    };

    print_success("Step ids are unique");
    print_success("Step types and parameters are valid");

    if verbose {
        print_section("Normalized steps");
        for (i, step) in validated.steps().iter().enumerate() {
            println!("  {}. {} {}", i + 1, step.id.bold(), step.config.to_string().dimmed());
        }
    }

    println!();
    println!("{}", "Pipeline is valid!".green().bold());
    Ok(())
}
