// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Error types
//!
//! Three families live here:
//!
//! - [`ValidationError`] / [`SchemaError`]: a pipeline definition cannot run
//!   as written. Always reported before any step executes.
//! - [`StepFailure`] and its parts ([`TransformError`], [`TimeoutError`],
//!   [`ProviderError`]): a step failed at run time. These are recorded in the
//!   execution trace and never escape a run.
//! - [`TextflowError`]: call-level failures (store lookups, files,
//!   configuration) where no trace can be produced at all.

mod execution;
mod recovery;
mod validation;

pub use execution::{FailureKind, ProviderError, StepFailure, TimeoutError, TransformError};
pub use recovery::{RecoverySuggestion, RetryAdvice};
pub use validation::{SchemaError, ValidationError};

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for textflow operations
pub type TextflowResult<T> = Result<T, TextflowError>;

/// Main error type for textflow
#[derive(Error, Debug, Diagnostic)]
pub enum TextflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline '{id}' not found")]
    #[diagnostic(
        code(textflow::pipeline_not_found),
        help("List stored pipelines with 'textflow pipeline list'")
    )]
    PipelineNotFound { id: String },

    #[error("Invalid pipeline id '{id}': {reason}")]
    #[diagnostic(
        code(textflow::invalid_pipeline_id),
        help("Pipeline ids may contain letters, digits, '-' and '_'")
    )]
    InvalidPipelineId { id: String, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid execution options: {reason}")]
    #[diagnostic(
        code(textflow::invalid_options),
        help("Step and run timeouts must be greater than zero and at most one year")
    )]
    InvalidOptions { reason: String },

    #[error("Configuration error: {reason}")]
    #[diagnostic(code(textflow::config_error))]
    Config {
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline store error: {message}")]
    #[diagnostic(code(textflow::store_error))]
    Store { message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(textflow::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(textflow::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(textflow::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(textflow::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(textflow::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(textflow::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for TextflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for TextflowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for TextflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for TextflowError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl TextflowError {
    /// Create a store error from anything displayable
    pub fn store(message: impl std::fmt::Display) -> Self {
        Self::Store {
            message: message.to_string(),
        }
    }

    /// Create a configuration error with a hint
    pub fn config(reason: impl Into<String>, help: Option<String>) -> Self {
        Self::Config {
            reason: reason.into(),
            help,
        }
    }

    /// Whether this error means the referenced pipeline does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PipelineNotFound { .. })
    }
}
