// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Pipeline validation
//!
//! Validates a pipeline before execution. Rules are checked in a fixed
//! order and the first violation is reported:
//!
//! 1. at least one step
//! 2. unique step ids
//! 3. known step types
//! 4. parameters match the step type's schema

use std::collections::HashSet;

use serde::Serialize;

use crate::errors::ValidationError;
use crate::pipeline::{Pipeline, StepConfig};
use crate::registry::StepRegistry;

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a pipeline, producing its typed form
    ///
    /// Pure: no I/O and no dependence on provider availability.
    pub fn validate(pipeline: &Pipeline) -> Result<ValidatedPipeline, ValidationError> {
        if pipeline.steps.is_empty() {
            return Err(ValidationError::EmptyPipeline {
                pipeline_id: pipeline.id.clone(),
            });
        }

        let mut seen_ids = HashSet::new();
        for step in &pipeline.steps {
            if !seen_ids.insert(step.id.as_str()) {
                return Err(ValidationError::DuplicateStepId {
                    step_id: step.id.clone(),
                });
            }
        }

        let mut kinds = Vec::with_capacity(pipeline.steps.len());
        for step in &pipeline.steps {
            let kind = step.kind().ok_or_else(|| ValidationError::UnknownStepType {
                step_id: step.id.clone(),
                step_type: step.step_type.clone(),
            })?;
            kinds.push(kind);
        }

        let steps = pipeline
            .steps
            .iter()
            .zip(kinds)
            .map(|(step, kind)| {
                StepRegistry::validate(kind, &step.parameters)
                    .map(|config| ValidatedStep {
                        id: step.id.clone(),
                        config,
                    })
                    .map_err(|source| ValidationError::Schema {
                        step_id: step.id.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedPipeline {
            pipeline_id: pipeline.id.clone(),
            name: pipeline.name.clone(),
            steps,
        })
    }
}

/// A step that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedStep {
    pub id: String,
    pub config: StepConfig,
}

/// A pipeline that passed validation, with every step typed
///
/// Only [`PipelineValidator::validate`] constructs this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedPipeline {
    pipeline_id: String,
    name: String,
    steps: Vec<ValidatedStep>,
}

impl ValidatedPipeline {
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[ValidatedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; empty pipelines never validate
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchemaError;
    use crate::pipeline::{Language, PipelineStep, StepType, SummaryLength};

    fn step(id: &str, step_type: &str) -> PipelineStep {
        PipelineStep {
            id: id.into(),
            step_type: step_type.into(),
            parameters: Default::default(),
        }
    }

    #[test]
    fn test_validate_empty_pipeline() {
        let pipeline = Pipeline::new("empty", "Empty");

        let err = PipelineValidator::validate(&pipeline).unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyPipeline {
                pipeline_id: "empty".into()
            }
        );
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let pipeline = Pipeline::new("p", "Dup")
            .with_step(step("1", "summarize"))
            .with_step(step("2", "extract"))
            .with_step(step("1", "rewrite"));

        let err = PipelineValidator::validate(&pipeline).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateStepId { step_id: "1".into() });
    }

    #[test]
    fn test_duplicate_ids_reported_before_unknown_types() {
        let pipeline = Pipeline::new("p", "Order")
            .with_step(step("a", "sing"))
            .with_step(step("b", "extract"))
            .with_step(step("b", "extract"));

        let err = PipelineValidator::validate(&pipeline).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateStepId { .. }));
    }

    #[test]
    fn test_unknown_types_reported_before_schema_errors() {
        let pipeline = Pipeline::new("p", "Order")
            .with_step(PipelineStep::new("a", StepType::Translate).with_parameter("language", "xx"))
            .with_step(step("b", "dance"));

        let err = PipelineValidator::validate(&pipeline).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownStepType {
                step_id: "b".into(),
                step_type: "dance".into()
            }
        );
    }

    #[test]
    fn test_schema_error_wrapped_with_step_id() {
        let pipeline = Pipeline::new("p", "Bad language")
            .with_step(PipelineStep::new("t", StepType::Translate).with_parameter("language", "xx"));

        match PipelineValidator::validate(&pipeline).unwrap_err() {
            ValidationError::Schema { step_id, source } => {
                assert_eq!(step_id, "t");
                assert!(matches!(source, SchemaError::InvalidValue { .. }));
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_pipeline_is_typed() {
        let pipeline = Pipeline::new("p", "Digest")
            .with_step(PipelineStep::new("1", StepType::Summarize).with_parameter("length", "short"))
            .with_step(PipelineStep::new("2", StepType::Translate));

        let validated = PipelineValidator::validate(&pipeline).unwrap();
        assert_eq!(validated.pipeline_id(), "p");
        assert_eq!(validated.len(), 2);
        assert_eq!(
            validated.steps()[0].config,
            StepConfig::Summarize {
                length: SummaryLength::Short
            }
        );
        assert_eq!(
            validated.steps()[1].config,
            StepConfig::Translate {
                language: Language::En
            }
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let valid = Pipeline::new("p", "ok").with_step(PipelineStep::new("1", StepType::Extract));
        let invalid = Pipeline::new("q", "bad").with_step(step("1", "unknown"));

        assert_eq!(
            PipelineValidator::validate(&valid),
            PipelineValidator::validate(&valid)
        );
        assert_eq!(
            PipelineValidator::validate(&invalid),
            PipelineValidator::validate(&invalid)
        );
    }

    #[test]
    fn test_same_step_ids_allowed_across_pipelines() {
        let a = Pipeline::new("a", "A").with_step(PipelineStep::new("1", StepType::Extract));
        let b = Pipeline::new("b", "B").with_step(PipelineStep::new("1", StepType::Extract));

        assert!(PipelineValidator::validate(&a).is_ok());
        assert!(PipelineValidator::validate(&b).is_ok());
    }
}
