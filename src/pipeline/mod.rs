// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Pipeline definitions and execution
//!
//! This module defines the core data structures for textflow pipelines:
//! the authored definition, the typed step configuration produced by
//! validation, the engine that runs it, and the trace a run leaves behind.

mod definition;
mod executor;
mod step_config;
mod trace;
mod validation;

pub use definition::*;
pub use executor::{
    ExecutionEngine, ExecutionOptions, ExecutionPlan, PlannedStep, DEFAULT_RUN_TIMEOUT,
    DEFAULT_STEP_TIMEOUT,
};
pub use step_config::{Language, ParameterValue, StepConfig, SummaryLength, Tone};
pub use trace::{ExecutionTrace, RunOutcome, StepResult, StepStatus};
pub use validation::{PipelineValidator, ValidatedPipeline, ValidatedStep};
