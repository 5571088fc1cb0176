// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Transformation providers
//!
//! This module provides the provider trait and implementations for the
//! backends that actually summarize, translate, rewrite and extract.

mod func;
mod http;
mod local;

pub use func::FnProvider;
pub use http::HttpProvider;
pub use local::LocalProvider;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::pipeline::StepConfig;

/// Trait for transformation backends
///
/// A provider may be dropped mid-call when a step times out; implementations
/// should hold no state that a cancelled call could leave inconsistent.
#[async_trait]
pub trait TransformationProvider: Send + Sync {
    /// Short name for logs and plans
    fn name(&self) -> &str;

    /// Transform `text` according to a normalized step configuration
    async fn transform(&self, text: &str, config: &StepConfig) -> Result<String, ProviderError>;
}
