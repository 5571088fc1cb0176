// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Run-time step failures
//!
//! Everything in this module ends up inside an execution trace rather than
//! being returned from a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::StepType;

/// Coarse classification of a step failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Unavailable,
    RateLimited,
    InvalidInput,
    Timeout,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Failure reported by a transformation provider
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderError {
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        /// Seconds the provider asked us to wait, when it said so
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_after_secs: Option<u64>,
    },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("provider timed out: {message}")]
    Timeout { message: String },
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unavailable { .. } => FailureKind::Unavailable,
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::InvalidInput { .. } => FailureKind::InvalidInput,
            Self::Timeout { .. } => FailureKind::Timeout,
        }
    }
}

/// A step's transformation failed inside the provider
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{step_type} transformation failed: {source}")]
pub struct TransformError {
    pub step_type: StepType,
    pub source: ProviderError,
}

impl TransformError {
    pub fn new(step_type: StepType, source: ProviderError) -> Self {
        Self { step_type, source }
    }

    pub fn kind(&self) -> FailureKind {
        self.source.kind()
    }
}

/// A step did not finish within its time budget
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum TimeoutError {
    /// The per-step limit elapsed
    #[error("step exceeded its timeout of {limit_ms}ms")]
    Step { limit_ms: u64 },

    /// The overall run limit elapsed while this step was in flight
    #[error("run exceeded its timeout of {limit_ms}ms")]
    Run { limit_ms: u64 },
}

/// Why a step ended in the `failed` state
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepFailure {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),
}

impl StepFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transform(e) => e.kind(),
            Self::Timeout(_) => FailureKind::Timeout,
        }
    }

    /// Whether re-running unchanged may succeed. Invalid input will not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), FailureKind::InvalidInput)
    }

    /// True when the run-level deadline, not the step's own, cut this step off
    pub fn is_run_timeout(&self) -> bool {
        matches!(self, Self::Timeout(TimeoutError::Run { .. }))
    }
}
