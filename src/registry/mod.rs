// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Step registry
//!
//! Central lookup from a [`StepType`] to its parameter schema and to the
//! provider that performs the transformation. The schemas are fixed; the
//! provider table is filled in at start-up and only read afterwards.

mod schema;

pub use schema::{ParameterSchema, ParameterSpec};

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{ProviderError, SchemaError, TransformError};
use crate::pipeline::{StepConfig, StepParameters, StepType};
use crate::providers::TransformationProvider;

/// Lookup table from step type to schema and provider
#[derive(Clone, Default)]
pub struct StepRegistry {
    providers: HashMap<StepType, Arc<dyn TransformationProvider>>,
}

impl StepRegistry {
    /// Create a registry with no providers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry where one provider serves every step type
    pub fn with_provider(provider: Arc<dyn TransformationProvider>) -> Self {
        let mut registry = Self::new();
        for step_type in StepType::ALL {
            registry.register(step_type, Arc::clone(&provider));
        }
        registry
    }

    /// Register the provider for a step type, replacing any previous one
    pub fn register(&mut self, step_type: StepType, provider: Arc<dyn TransformationProvider>) {
        self.providers.insert(step_type, provider);
    }

    /// Name of the provider serving a step type
    pub fn provider_name(&self, step_type: StepType) -> Option<&str> {
        self.providers.get(&step_type).map(|p| p.name())
    }

    /// Parameter schema for a step type
    pub fn schema(step_type: StepType) -> ParameterSchema {
        ParameterSchema::for_type(step_type)
    }

    /// Check parameters against a step type's schema and normalize them
    ///
    /// Depends only on the step type, never on which providers are
    /// registered.
    pub fn validate(
        step_type: StepType,
        params: &StepParameters,
    ) -> Result<StepConfig, SchemaError> {
        schema::validate(step_type, params)
    }

    /// Run a transformation through the provider for the config's type
    pub async fn execute(&self, config: &StepConfig, text: &str) -> Result<String, TransformError> {
        let step_type = config.step_type();
        let provider = self.providers.get(&step_type).ok_or_else(|| {
            TransformError::new(
                step_type,
                ProviderError::unavailable(format!("no provider registered for {}", step_type)),
            )
        })?;

        tracing::debug!(%step_type, provider = provider.name(), "Invoking provider");

        provider
            .transform(text, config)
            .await
            .map_err(|e| TransformError::new(step_type, e))
    }
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<_> = self
            .providers
            .iter()
            .map(|(t, p)| (t.as_str(), p.name()))
            .collect();
        providers.sort();
        f.debug_struct("StepRegistry")
            .field("providers", &providers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::pipeline::{SummaryLength, Tone};
    use crate::providers::FnProvider;

    fn echo_config() -> Arc<dyn TransformationProvider> {
        Arc::new(FnProvider::new("echo", |_: &str, config: &StepConfig| {
            Ok::<_, ProviderError>(config.to_string())
        }))
    }

    #[tokio::test]
    async fn test_execute_passes_normalized_config() {
        let registry = StepRegistry::with_provider(echo_config());
        let config = StepRegistry::validate(StepType::Rewrite, &StepParameters::new()).unwrap();

        assert_eq!(config, StepConfig::Rewrite { tone: Tone::Professional });
        assert_eq!(
            registry.execute(&config, "text").await.unwrap(),
            "rewrite(tone=professional)"
        );
    }

    #[tokio::test]
    async fn test_missing_provider_is_unavailable() {
        let mut registry = StepRegistry::new();
        registry.register(StepType::Extract, echo_config());

        let err = registry
            .execute(
                &StepConfig::Summarize {
                    length: SummaryLength::Long,
                },
                "text",
            )
            .await
            .unwrap_err();

        assert_eq!(err.step_type, StepType::Summarize);
        assert_eq!(err.kind(), FailureKind::Unavailable);
    }

    #[tokio::test]
    async fn test_empty_output_is_not_an_error() {
        let registry = StepRegistry::with_provider(Arc::new(FnProvider::new(
            "blank",
            |_: &str, _: &StepConfig| Ok::<_, ProviderError>(String::new()),
        )));

        assert_eq!(registry.execute(&StepConfig::Extract, "text").await.unwrap(), "");
    }

    #[test]
    fn test_provider_names() {
        let mut registry = StepRegistry::new();
        registry.register(StepType::Translate, echo_config());

        assert_eq!(registry.provider_name(StepType::Translate), Some("echo"));
        assert_eq!(registry.provider_name(StepType::Rewrite), None);
        assert!(format!("{:?}", registry).contains("translate"));
    }
}
