// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Types command - list step types and their parameters

use colored::Colorize;
use miette::Result;

use crate::pipeline::StepType;
use crate::registry::StepRegistry;
use crate::utils::print_header;

/// List every step type with its parameter schema
pub async fn run(verbose: bool) -> Result<()> {
    print_header("Step types");

    for step_type in StepType::ALL {
        println!();
        println!("  {} - {}", step_type.as_str().bold(), step_type.description());

        let schema = StepRegistry::schema(step_type);
        if schema.parameters.is_empty() {
            println!("      {}", "no parameters".dimmed());
        }

        for param in &schema.parameters {
            let default = param
                .default
                .map(|d| format!(" (default: {})", d))
                .unwrap_or_default();
            println!(
                "      {}: {}{}",
                param.name,
                param.allowed.join(" | "),
                default.dimmed()
            );
        }
    }

    if verbose {
        println!();
        println!(
            "{}",
            "Parameters are given as strings; omitted parameters take their default.".dimmed()
        );
    }

    println!();
    Ok(())
}
