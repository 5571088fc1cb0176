// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Plan command - preview a run without contacting any provider

use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;

use super::{OutputFormat, PipelineSource};
use crate::config::Settings;
use crate::errors::RecoverySuggestion;
use crate::pipeline::{ExecutionEngine, ExecutionPlan};
use crate::utils::{print_header, print_warning};

/// Run the plan command
pub async fn run(source: PipelineSource, format: OutputFormat, settings: &Settings) -> Result<()> {
    let pipeline = source.load(settings).await?;
    let options = settings.execution_options(None, None)?;
    let engine = ExecutionEngine::new(Arc::new(settings.build_registry()?));

    let plan = match engine.plan(&pipeline, &options) {
        Ok(plan) => plan,
        Err(error) => {
            if format == OutputFormat::Text {
                eprint!("{}", RecoverySuggestion::for_validation(&error));
            }
            return Err(error.into());
        }
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Text => print_plan(&plan),
    }

    Ok(())
}

fn print_plan(plan: &ExecutionPlan) {
    println!();
    print_header(&format!("Pipeline: {}", plan.name));
    println!(
        "Execution plan ({} step{}):",
        plan.steps.len(),
        if plan.steps.len() == 1 { "" } else { "s" }
    );
    println!();

    for (i, step) in plan.steps.iter().enumerate() {
        let provider = match step.provider {
            Some(ref name) => format!("via {}", name).dimmed(),
            None => "no provider".red(),
        };
        println!("  {}. {} {} {}", i + 1, step.id.bold(), step.config, provider);
    }

    println!();
    println!(
        "  {} {}ms per step, {}ms per run",
        "Timeouts:".dimmed(),
        plan.step_timeout_ms,
        plan.run_timeout_ms
    );

    let unserved: Vec<_> = plan.unserved_steps().map(|s| s.id.as_str()).collect();
    if !unserved.is_empty() {
        println!();
        print_warning(&format!(
            "No provider for step{} {}; the run would fail there",
            if unserved.len() == 1 { "" } else { "s" },
            unserved.join(", ")
        ));
    }
    println!();
}
