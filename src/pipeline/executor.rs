// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Pipeline executor
//!
//! Runs the steps of a validated pipeline in order, feeding each step's
//! output to the next, and records what happened to every step.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::time::Instant;
use uuid::Uuid;

use crate::errors::{
    ProviderError, StepFailure, TextflowError, TextflowResult, TimeoutError, TransformError,
    ValidationError,
};
use crate::pipeline::trace::{ExecutionTrace, RunOutcome, StepResult};
use crate::pipeline::validation::{PipelineValidator, ValidatedPipeline, ValidatedStep};
use crate::pipeline::{Pipeline, StepConfig};
use crate::registry::StepRegistry;
use crate::store::PipelineStore;

/// Default limit for a single step
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default limit for a whole run
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound for either limit; deadlines are computed by adding to `Instant::now()`
pub const MAX_TIMEOUT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Pipeline execution options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    step_timeout: Duration,
    run_timeout: Duration,
}

impl ExecutionOptions {
    /// Create options, rejecting zero timeouts and timeouts over [`MAX_TIMEOUT`]
    pub fn new(step_timeout: Duration, run_timeout: Duration) -> TextflowResult<Self> {
        check_timeout("step", step_timeout)?;
        check_timeout("run", run_timeout)?;

        Ok(Self {
            step_timeout,
            run_timeout,
        })
    }

    pub fn step_timeout(&self) -> Duration {
        self.step_timeout
    }

    pub fn run_timeout(&self) -> Duration {
        self.run_timeout
    }
}

fn check_timeout(name: &str, timeout: Duration) -> TextflowResult<()> {
    if timeout.is_zero() {
        return Err(TextflowError::InvalidOptions {
            reason: format!("{} timeout must be greater than zero", name),
        });
    }
    if timeout > MAX_TIMEOUT {
        return Err(TextflowError::InvalidOptions {
            reason: format!(
                "{} timeout of {} exceeds the maximum of {}",
                name,
                humantime::format_duration(timeout),
                humantime::format_duration(MAX_TIMEOUT)
            ),
        });
    }
    Ok(())
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            step_timeout: DEFAULT_STEP_TIMEOUT,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }
}

/// One step as it would run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub id: String,
    pub config: StepConfig,
    /// Provider that would serve the step, if one is registered
    pub provider: Option<String>,
}

/// Preview of a run: the normalized steps and the limits that apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub pipeline_id: String,
    pub name: String,
    pub steps: Vec<PlannedStep>,
    pub step_timeout_ms: u64,
    pub run_timeout_ms: u64,
}

impl ExecutionPlan {
    /// Steps with no provider behind them; these would fail as unavailable
    pub fn unserved_steps(&self) -> impl Iterator<Item = &PlannedStep> {
        self.steps.iter().filter(|s| s.provider.is_none())
    }
}

/// Executes pipelines against a step registry
///
/// Holds no per-run state, so one engine can serve any number of
/// concurrent runs.
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    registry: Arc<StepRegistry>,
}

impl ExecutionEngine {
    pub fn new(registry: Arc<StepRegistry>) -> Self {
        Self { registry }
    }

    /// Validate a pipeline and describe the run without contacting any provider
    pub fn plan(
        &self,
        pipeline: &Pipeline,
        options: &ExecutionOptions,
    ) -> Result<ExecutionPlan, ValidationError> {
        let validated = PipelineValidator::validate(pipeline)?;

        let steps = validated
            .steps()
            .iter()
            .map(|step| PlannedStep {
                id: step.id.clone(),
                config: step.config,
                provider: self
                    .registry
                    .provider_name(step.config.step_type())
                    .map(str::to_string),
            })
            .collect();

        Ok(ExecutionPlan {
            pipeline_id: validated.pipeline_id().to_string(),
            name: validated.name().to_string(),
            steps,
            step_timeout_ms: millis(options.step_timeout()),
            run_timeout_ms: millis(options.run_timeout()),
        })
    }

    /// Run a pipeline on an input document
    ///
    /// Never fails: validation errors and step failures are both reported
    /// through the returned trace.
    pub async fn run(
        &self,
        pipeline: &Pipeline,
        input: &str,
        options: &ExecutionOptions,
    ) -> ExecutionTrace {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let validated = match PipelineValidator::validate(pipeline) {
            Ok(validated) => validated,
            Err(error) => {
                tracing::warn!(%run_id, pipeline_id = %pipeline.id, %error, "Pipeline rejected");
                return ExecutionTrace {
                    run_id,
                    pipeline_id: pipeline.id.clone(),
                    started_at,
                    finished_at: Utc::now(),
                    outcome: RunOutcome::InvalidPipeline { error },
                    steps: Vec::new(),
                };
            }
        };

        tracing::info!(
            %run_id,
            pipeline_id = validated.pipeline_id(),
            steps = validated.len(),
            "Starting pipeline run"
        );

        let (outcome, steps) = self.run_validated(&validated, input, options).await;

        match &outcome {
            RunOutcome::Completed => {
                tracing::info!(
                    %run_id,
                    pipeline_id = validated.pipeline_id(),
                    "Pipeline run completed"
                )
            }
            RunOutcome::StepFailed { step_id } | RunOutcome::TimedOut { step_id } => {
                tracing::warn!(
                    %run_id,
                    pipeline_id = validated.pipeline_id(),
                    %step_id,
                    "Pipeline run failed"
                )
            }
            RunOutcome::InvalidPipeline { .. } => {}
        }

        ExecutionTrace {
            run_id,
            pipeline_id: validated.pipeline_id().to_string(),
            started_at,
            finished_at: Utc::now(),
            outcome,
            steps,
        }
    }

    /// Look up a stored pipeline and run it
    ///
    /// Fails only when the pipeline cannot be loaded.
    pub async fn run_stored(
        &self,
        store: &dyn PipelineStore,
        id: &str,
        input: &str,
        options: &ExecutionOptions,
    ) -> TextflowResult<ExecutionTrace> {
        let pipeline = store.get(id).await?;
        Ok(self.run(&pipeline, input, options).await)
    }

    async fn run_validated(
        &self,
        pipeline: &ValidatedPipeline,
        input: &str,
        options: &ExecutionOptions,
    ) -> (RunOutcome, Vec<StepResult>) {
        let run_deadline = Instant::now() + options.run_timeout();
        let mut results = Vec::with_capacity(pipeline.len());
        let mut outcome = RunOutcome::Completed;
        let mut text = input.to_string();

        for step in pipeline.steps() {
            let step_type = step.config.step_type();

            if outcome != RunOutcome::Completed {
                results.push(StepResult::skipped(&step.id, step_type));
                continue;
            }

            tracing::debug!(step_id = %step.id, config = %step.config, "Running step");
            let start = Instant::now();

            match self.execute_step(step, &text, run_deadline, options).await {
                Ok(output) => {
                    results.push(StepResult::succeeded(
                        &step.id,
                        step_type,
                        output.clone(),
                        start.elapsed(),
                    ));
                    text = output;
                }
                Err(failure) => {
                    tracing::warn!(
                        step_id = %step.id,
                        kind = %failure.kind(),
                        error = %failure,
                        "Step failed"
                    );
                    outcome = if failure.is_run_timeout() {
                        RunOutcome::TimedOut {
                            step_id: step.id.clone(),
                        }
                    } else {
                        RunOutcome::StepFailed {
                            step_id: step.id.clone(),
                        }
                    };
                    results.push(StepResult::failed(
                        &step.id,
                        step_type,
                        failure,
                        start.elapsed(),
                    ));
                }
            }
        }

        (outcome, results)
    }

    /// Run one step on its own task, bounded by the nearer of the step
    /// and run deadlines
    async fn execute_step(
        &self,
        step: &ValidatedStep,
        input: &str,
        run_deadline: Instant,
        options: &ExecutionOptions,
    ) -> Result<String, StepFailure> {
        let run_limit = TimeoutError::Run {
            limit_ms: millis(options.run_timeout()),
        };

        let now = Instant::now();
        if now >= run_deadline {
            return Err(run_limit.into());
        }

        let step_deadline = now + options.step_timeout();
        let run_bound = run_deadline <= step_deadline;
        let deadline = if run_bound { run_deadline } else { step_deadline };

        let registry = Arc::clone(&self.registry);
        let config = step.config;
        let text = input.to_string();
        let mut handle = tokio::spawn(async move { registry.execute(&config, &text).await });

        match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(result)) => result.map_err(StepFailure::from),
            Ok(Err(join_error)) => Err(TransformError::new(
                config.step_type(),
                ProviderError::unavailable(format!("provider task failed: {}", join_error)),
            )
            .into()),
            Err(_) => {
                // Late output from the aborted task is dropped with the handle
                handle.abort();
                if run_bound {
                    Err(run_limit.into())
                } else {
                    Err(TimeoutError::Step {
                        limit_ms: millis(options.step_timeout()),
                    }
                    .into())
                }
            }
        }
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
