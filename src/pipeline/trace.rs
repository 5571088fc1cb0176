// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Execution traces
//!
//! One trace per run, holding one result per pipeline step in execution
//! order, including steps that never ran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::errors::{StepFailure, ValidationError};
use crate::pipeline::executor::millis;
use crate::pipeline::StepType;

/// Status of one step within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Succeeded,
    Failed,
    Skipped,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: String,
    pub step_type: StepType,
    pub status: StepStatus,

    /// Transformed text, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Failure description, on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StepFailure>,

    pub duration_ms: u64,
}

impl StepResult {
    pub fn succeeded(
        step_id: impl Into<String>,
        step_type: StepType,
        output: String,
        duration: Duration,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            step_type,
            status: StepStatus::Succeeded,
            output: Some(output),
            error: None,
            duration_ms: millis(duration),
        }
    }

    pub fn failed(
        step_id: impl Into<String>,
        step_type: StepType,
        error: StepFailure,
        duration: Duration,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            step_type,
            status: StepStatus::Failed,
            output: None,
            error: Some(error),
            duration_ms: millis(duration),
        }
    }

    pub fn skipped(step_id: impl Into<String>, step_type: StepType) -> Self {
        Self {
            step_id: step_id.into(),
            step_type,
            status: StepStatus::Skipped,
            output: None,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Pipeline-level outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every step succeeded
    Completed,
    /// A step failed; later steps were skipped
    StepFailed { step_id: String },
    /// The run timeout elapsed while `step_id` was in flight
    TimedOut { step_id: String },
    /// Validation rejected the pipeline; no step ran
    InvalidPipeline { error: ValidationError },
}

/// Complete record of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub run_id: Uuid,
    pub pipeline_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub steps: Vec<StepResult>,
}

impl ExecutionTrace {
    /// Whether every step succeeded
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed)
    }

    /// Output of the last step, when the run completed
    pub fn final_output(&self) -> Option<&str> {
        if !self.is_success() {
            return None;
        }
        self.steps.last().and_then(|s| s.output.as_deref())
    }

    /// The step that failed, if any
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    /// Wall-clock duration of the run
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TimeoutError;

    fn trace(outcome: RunOutcome, steps: Vec<StepResult>) -> ExecutionTrace {
        let now = Utc::now();
        ExecutionTrace {
            run_id: Uuid::new_v4(),
            pipeline_id: "p".into(),
            started_at: now,
            finished_at: now,
            outcome,
            steps,
        }
    }

    #[test]
    fn test_final_output_only_when_completed() {
        let done = trace(
            RunOutcome::Completed,
            vec![
                StepResult::succeeded("1", StepType::Summarize, "short".into(), Duration::ZERO),
                StepResult::succeeded("2", StepType::Extract, "a, b".into(), Duration::ZERO),
            ],
        );
        assert_eq!(done.final_output(), Some("a, b"));

        let failed = trace(
            RunOutcome::StepFailed { step_id: "2".into() },
            vec![
                StepResult::succeeded("1", StepType::Summarize, "short".into(), Duration::ZERO),
                StepResult::failed(
                    "2",
                    StepType::Extract,
                    TimeoutError::Step { limit_ms: 1 }.into(),
                    Duration::from_millis(1),
                ),
            ],
        );
        assert_eq!(failed.final_output(), None);
        assert_eq!(failed.failed_step().unwrap().step_id, "2");
    }

    #[test]
    fn test_step_duration_saturates() {
        let result = StepResult::succeeded("1", StepType::Extract, "a".into(), Duration::MAX);
        assert_eq!(result.duration_ms, u64::MAX);

        let result = StepResult::failed(
            "1",
            StepType::Extract,
            TimeoutError::Step { limit_ms: 5 }.into(),
            Duration::from_millis(5),
        );
        assert_eq!(result.duration_ms, 5);
    }

    #[test]
    fn test_counts() {
        let t = trace(
            RunOutcome::StepFailed { step_id: "1".into() },
            vec![
                StepResult::failed(
                    "1",
                    StepType::Rewrite,
                    TimeoutError::Step { limit_ms: 1 }.into(),
                    Duration::ZERO,
                ),
                StepResult::skipped("2", StepType::Translate),
                StepResult::skipped("3", StepType::Extract),
            ],
        );

        assert_eq!(t.count(StepStatus::Failed), 1);
        assert_eq!(t.count(StepStatus::Skipped), 2);
        assert_eq!(t.count(StepStatus::Succeeded), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let t = trace(
            RunOutcome::TimedOut { step_id: "1".into() },
            vec![StepResult::skipped("1", StepType::Extract)],
        );
        let json = serde_json::to_value(&t).unwrap();

        assert_eq!(json["outcome"]["status"], "timed_out");
        assert_eq!(json["steps"][0]["status"], "skipped");
        assert!(json["steps"][0].get("output").is_none());
    }
}
