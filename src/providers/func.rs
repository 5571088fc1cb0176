// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Closure-backed provider

use async_trait::async_trait;

use super::TransformationProvider;
use crate::errors::ProviderError;
use crate::pipeline::StepConfig;

/// Wraps a synchronous function as a provider
pub struct FnProvider<F> {
    name: String,
    func: F,
}

impl<F> FnProvider<F>
where
    F: Fn(&str, &StepConfig) -> Result<String, ProviderError> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> TransformationProvider for FnProvider<F>
where
    F: Fn(&str, &StepConfig) -> Result<String, ProviderError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, text: &str, config: &StepConfig) -> Result<String, ProviderError> {
        (self.func)(text, config)
    }
}
