// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Validation errors
//!
//! Raised before any step runs. The validator reports exactly one of these
//! per call: the first rule a pipeline violates.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::StepType;

/// Why a pipeline definition cannot be executed
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Pipeline '{pipeline_id}' has no steps")]
    #[diagnostic(
        code(textflow::empty_pipeline),
        help("Add at least one step; there is nothing to run")
    )]
    EmptyPipeline { pipeline_id: String },

    #[error("Step id '{step_id}' is used more than once")]
    #[diagnostic(
        code(textflow::duplicate_step_id),
        help("Step ids must be unique within a pipeline")
    )]
    DuplicateStepId { step_id: String },

    #[error("Step '{step_id}' has unknown type '{step_type}'")]
    #[diagnostic(
        code(textflow::unknown_step_type),
        help("Known step types: summarize, translate, rewrite, extract")
    )]
    UnknownStepType { step_id: String, step_type: String },

    #[error("Step '{step_id}' has invalid parameters: {source}")]
    #[diagnostic(
        code(textflow::schema_error),
        help("Run 'textflow types' to see the parameters each step type accepts")
    )]
    Schema { step_id: String, source: SchemaError },
}

impl ValidationError {
    /// The step the error points at, if it is step-specific
    pub fn step_id(&self) -> Option<&str> {
        match self {
            Self::EmptyPipeline { .. } => None,
            Self::DuplicateStepId { step_id }
            | Self::UnknownStepType { step_id, .. }
            | Self::Schema { step_id, .. } => Some(step_id),
        }
    }
}

/// A step's parameters do not match its type's schema
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SchemaError {
    #[error("{step_type} does not accept parameter '{parameter}'")]
    UnknownParameter {
        step_type: StepType,
        parameter: String,
    },

    #[error("{step_type} requires parameter '{parameter}'")]
    MissingParameter {
        step_type: StepType,
        parameter: String,
    },

    #[error("'{value}' is not a valid {parameter} (expected one of: {})", .allowed.join(", "))]
    InvalidValue {
        parameter: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{parameter} must be a string, found {found}")]
    InvalidType { parameter: String, found: String },
}

impl SchemaError {
    /// Name of the offending parameter
    pub fn parameter(&self) -> &str {
        match self {
            Self::UnknownParameter { parameter, .. }
            | Self::MissingParameter { parameter, .. }
            | Self::InvalidValue { parameter, .. }
            | Self::InvalidType { parameter, .. } => parameter,
        }
    }
}
