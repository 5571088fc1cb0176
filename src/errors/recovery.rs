// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Error recovery suggestions
//!
//! Turns validation errors and step failures into actionable next steps,
//! including whether (and how) a caller should retry the run.

use std::time::Duration;

use super::{FailureKind, ProviderError, SchemaError, StepFailure, TimeoutError, ValidationError};

/// How a caller's retry policy should treat a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAdvice {
    /// Retrying the same pipeline unchanged will fail the same way
    DoNotRetry,
    /// Transient provider condition; retry after backing off
    RetryWithBackoff { after: Option<Duration> },
    /// The work may need more time than it was given
    RetryWithLongerTimeout,
}

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
    /// Retry guidance for the caller
    pub retry: RetryAdvice,
}

impl RecoverySuggestion {
    /// Suggest how to fix a pipeline definition that failed validation
    pub fn for_validation(error: &ValidationError) -> Self {
        match error {
            ValidationError::EmptyPipeline { pipeline_id } => Self {
                action: "Add steps to the pipeline".into(),
                steps: vec![
                    format!("Pipeline '{}' has no steps, so there is nothing to run", pipeline_id),
                    "Add at least one summarize, translate, rewrite or extract step".into(),
                ],
                commands: vec!["textflow types".into()],
                retry: RetryAdvice::DoNotRetry,
            },
            ValidationError::DuplicateStepId { step_id } => Self {
                action: format!("Rename one of the steps called '{}'", step_id),
                steps: vec!["Every step in a pipeline needs its own id".into()],
                commands: vec![],
                retry: RetryAdvice::DoNotRetry,
            },
            ValidationError::UnknownStepType { step_id, step_type } => Self {
                action: format!("Change the type of step '{}'", step_id),
                steps: vec![
                    format!("'{}' is not a step type", step_type),
                    "Use one of: summarize, translate, rewrite, extract".into(),
                ],
                commands: vec!["textflow types".into()],
                retry: RetryAdvice::DoNotRetry,
            },
            ValidationError::Schema { step_id, source } => {
                let hint = match source {
                    SchemaError::UnknownParameter { parameter, .. } => {
                        format!("Remove parameter '{}'", parameter)
                    }
                    SchemaError::MissingParameter { parameter, .. } => {
                        format!("Set parameter '{}'", parameter)
                    }
                    SchemaError::InvalidValue {
                        parameter, allowed, ..
                    } => format!("Set '{}' to one of: {}", parameter, allowed.join(", ")),
                    SchemaError::InvalidType { parameter, .. } => {
                        format!("Quote the value of '{}' as a string", parameter)
                    }
                };
                Self {
                    action: format!("Fix the parameters of step '{}'", step_id),
                    steps: vec![source.to_string(), hint],
                    commands: vec!["textflow types".into()],
                    retry: RetryAdvice::DoNotRetry,
                }
            }
        }
    }

    /// Suggest what to do after a step failed at run time
    pub fn for_failure(failure: &StepFailure) -> Self {
        match failure {
            StepFailure::Timeout(TimeoutError::Step { limit_ms }) => Self {
                action: "Give the step more time".into(),
                steps: vec![
                    format!("The step did not finish within {}ms", limit_ms),
                    "Raise the step timeout or shorten the input document".into(),
                ],
                commands: vec!["textflow run --step-timeout 60s ...".into()],
                retry: RetryAdvice::RetryWithLongerTimeout,
            },
            StepFailure::Timeout(TimeoutError::Run { limit_ms }) => Self {
                action: "Give the run more time".into(),
                steps: vec![
                    format!("The whole run did not finish within {}ms", limit_ms),
                    "Raise the run timeout or split the pipeline".into(),
                ],
                commands: vec!["textflow run --run-timeout 5m ...".into()],
                retry: RetryAdvice::RetryWithLongerTimeout,
            },
            StepFailure::Transform(err) => match (&err.source, err.kind()) {
                (ProviderError::RateLimited { retry_after_secs, .. }, _) => Self {
                    action: "Back off and retry".into(),
                    steps: vec![
                        format!("The {} provider is rate limiting requests", err.step_type),
                        match retry_after_secs {
                            Some(secs) => format!("The provider asked to wait {}s", secs),
                            None => "Wait before re-running the pipeline".into(),
                        },
                    ],
                    commands: vec![],
                    retry: RetryAdvice::RetryWithBackoff {
                        after: retry_after_secs.map(Duration::from_secs),
                    },
                },
                (_, FailureKind::InvalidInput) => Self {
                    action: "Check the step parameters and input".into(),
                    steps: vec![
                        format!("The {} provider rejected the request", err.step_type),
                        "Retrying unchanged will fail again".into(),
                    ],
                    commands: vec![],
                    retry: RetryAdvice::DoNotRetry,
                },
                (_, FailureKind::Timeout) => Self {
                    action: "Retry later".into(),
                    steps: vec![format!("The {} provider timed out", err.step_type)],
                    commands: vec![],
                    retry: RetryAdvice::RetryWithBackoff { after: None },
                },
                _ => Self {
                    action: "Retry once the provider is reachable".into(),
                    steps: vec![
                        format!("The {} provider is unavailable", err.step_type),
                        "Check the provider endpoint in textflow.toml".into(),
                    ],
                    commands: vec![],
                    retry: RetryAdvice::RetryWithBackoff { after: None },
                },
            },
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}
