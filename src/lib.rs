// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! # textflow - Linear Text-Transformation Pipelines
//!
//! `textflow` validates and runs user-authored pipelines of text
//! transformations, feeding each step's output into the next.
//!
//! ## Features
//!
//! - **Typed steps** - summarize, translate, rewrite and extract, each with a
//!   closed parameter schema
//! - **Fail-fast validation** - nothing runs until the whole pipeline checks out
//! - **Execution traces** - one result per step, including skipped ones
//! - **Timeouts** - per step and per run
//! - **Pluggable providers** - HTTP backend, offline heuristics, or your own
//!
//! ## Quick Start
//!
//! ```bash
//! # Check a pipeline
//! textflow validate digest.yaml
//!
//! # Run it on a document
//! textflow run digest.yaml --input article.txt
//!
//! # List step types and parameters
//! textflow types
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod providers;
pub mod registry;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use errors::{TextflowError, TextflowResult};
pub use pipeline::{
    ExecutionEngine, ExecutionOptions, ExecutionTrace, Pipeline, PipelineStep, PipelineValidator,
    StepConfig, StepType,
};
pub use providers::TransformationProvider;
pub use registry::StepRegistry;
pub use store::PipelineStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
