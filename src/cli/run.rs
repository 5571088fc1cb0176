// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Run command - execute a pipeline on a document

use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{OutputFormat, PipelineSource, TimeoutArgs};
use crate::config::Settings;
use crate::errors::RecoverySuggestion;
use crate::pipeline::{ExecutionEngine, ExecutionTrace, RunOutcome, StepStatus};
use crate::utils::{code, create_spinner, print_header, print_section, status_symbol};

/// Run the pipeline
pub async fn run(
    source: PipelineSource,
    input: Option<PathBuf>,
    format: OutputFormat,
    timeouts: TimeoutArgs,
    settings: &Settings,
    verbose: bool,
) -> Result<()> {
    let pipeline = source.load(settings).await?;
    let options = settings.execution_options(timeouts.step_timeout, timeouts.run_timeout)?;
    let engine = ExecutionEngine::new(Arc::new(settings.build_registry()?));
    let text = read_input(input.as_deref())?;

    let spinner = create_spinner(&format!("Running '{}'...", pipeline.name));
    let trace = engine.run(&pipeline, &text, &options).await;
    spinner.finish_and_clear();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&trace).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Text => print_trace(&pipeline.name, &trace, verbose),
    }

    match trace.outcome {
        RunOutcome::Completed => Ok(()),
        RunOutcome::InvalidPipeline { .. } => Err(miette::miette!(
            "Pipeline '{}' failed validation",
            trace.pipeline_id
        )),
        RunOutcome::StepFailed { step_id } => {
            Err(miette::miette!("Pipeline run failed at step '{}'", step_id))
        }
        RunOutcome::TimedOut { step_id } => Err(miette::miette!(
            "Pipeline run timed out during step '{}'",
            step_id
        )),
    }
}

/// Read the input document from a file, or stdin when no file is given
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read input '{}'", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .into_diagnostic()
                .wrap_err("Failed to read input from stdin")?;
            Ok(text)
        }
    }
}

fn print_trace(name: &str, trace: &ExecutionTrace, verbose: bool) {
    println!();
    print_header(&format!("Pipeline: {}", name));

    if let RunOutcome::InvalidPipeline { ref error } = trace.outcome {
        println!("  {} {}", "✗".red(), error);
        println!();
        print!("{}", RecoverySuggestion::for_validation(error));
        return;
    }

    for step in &trace.steps {
        let timing = match step.status {
            StepStatus::Skipped => "(skipped)".to_string(),
            _ => format!("({:.2}s)", step.duration().as_secs_f64()),
        };
        println!(
            "  {} {} {} {}",
            status_symbol(step.status),
            step.step_id.bold(),
            step.step_type.to_string().dimmed(),
            timing.dimmed()
        );

        if let Some(ref error) = step.error {
            println!("      {}", error.to_string().red());
        }

        if verbose && step.status == StepStatus::Succeeded {
            if let Some(ref output) = step.output {
                for line in output.lines() {
                    println!("      {}", line.dimmed());
                }
            }
        }
    }

    println!();
    println!(
        "  {} {}",
        "Run:".dimmed(),
        code(&trace.run_id.to_string())
    );
    println!();

    match trace.final_output() {
        Some(output) => {
            println!(
                "{}",
                format!("Pipeline completed in {:.2}s", trace.duration().as_secs_f64()).green()
            );
            print_section("Output");
            println!("{}", output);
        }
        None => {
            println!(
                "{}",
                format!("Pipeline failed after {:.2}s", trace.duration().as_secs_f64()).red()
            );
            if let Some(error) = trace.failed_step().and_then(|s| s.error.as_ref()) {
                println!();
                print!("{}", RecoverySuggestion::for_failure(error));
            }
        }
    }
}
