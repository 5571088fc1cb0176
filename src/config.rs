// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Configuration loading
//!
//! Settings come from an optional `textflow.toml`:
//!
//! ```toml
//! [execution]
//! step_timeout = "30s"
//! run_timeout = "2m"
//!
//! [provider]
//! kind = "http"
//! endpoint = "https://transform.example.com"
//! api_key_env = "TEXTFLOW_API_KEY"
//!
//! [store]
//! directory = "pipelines"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Deserializer};

use crate::errors::{TextflowError, TextflowResult};
use crate::pipeline::ExecutionOptions;
use crate::providers::{HttpProvider, LocalProvider, TransformationProvider};
use crate::registry::StepRegistry;
use crate::store::FilesystemPipelineStore;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "textflow.toml";

/// Top-level settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub execution: ExecutionSettings,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

/// Timeouts; unset values fall back to the engine defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionSettings {
    #[serde(default, deserialize_with = "human_duration")]
    pub step_timeout: Option<Duration>,

    #[serde(default, deserialize_with = "human_duration")]
    pub run_timeout: Option<Duration>,
}

/// Which backend performs transformations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Local,
    Http,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,

    /// Base URL of the HTTP provider
    pub endpoint: Option<String>,

    /// Environment variable holding the bearer token
    pub api_key_env: Option<String>,

    /// Per-request HTTP timeout
    #[serde(default, deserialize_with = "human_duration")]
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// Directory for stored pipelines
    pub directory: Option<PathBuf>,
}

fn human_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}

impl Settings {
    /// Load settings
    ///
    /// An explicit path must exist. Without one, `textflow.toml` in the
    /// working directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> TextflowResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("No config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|e| TextflowError::FileReadError {
            path: path.clone(),
            error: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string
    pub fn from_toml(content: &str) -> TextflowResult<Self> {
        toml::from_str(content).map_err(Into::into)
    }

    /// Execution options from the file, with command-line overrides applied
    pub fn execution_options(
        &self,
        step_timeout: Option<Duration>,
        run_timeout: Option<Duration>,
    ) -> TextflowResult<ExecutionOptions> {
        let defaults = ExecutionOptions::default();
        ExecutionOptions::new(
            step_timeout
                .or(self.execution.step_timeout)
                .unwrap_or(defaults.step_timeout()),
            run_timeout
                .or(self.execution.run_timeout)
                .unwrap_or(defaults.run_timeout()),
        )
    }

    /// Build the configured transformation provider
    pub fn build_provider(&self) -> TextflowResult<Arc<dyn TransformationProvider>> {
        match self.provider.kind {
            ProviderKind::Local => Ok(Arc::new(LocalProvider::new())),
            ProviderKind::Http => {
                let endpoint = self.provider.endpoint.as_deref().ok_or_else(|| {
                    TextflowError::config(
                        "the http provider needs an endpoint",
                        Some("Set 'endpoint' under [provider] in textflow.toml".into()),
                    )
                })?;

                let mut provider = HttpProvider::new(endpoint);

                if let Some(ref var) = self.provider.api_key_env {
                    let key = std::env::var(var).map_err(|_| {
                        TextflowError::config(
                            format!("environment variable '{}' is not set", var),
                            Some(format!("Export {} with the provider's API key", var)),
                        )
                    })?;
                    provider = provider.with_api_key(key);
                }

                if let Some(timeout) = self.provider.request_timeout {
                    provider = provider.with_request_timeout(timeout);
                }

                Ok(Arc::new(provider))
            }
        }
    }

    /// Registry with the configured provider serving every step type
    pub fn build_registry(&self) -> TextflowResult<StepRegistry> {
        Ok(StepRegistry::with_provider(self.build_provider()?))
    }

    /// Directory for stored pipelines
    pub fn store_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.store.directory {
            return dir.clone();
        }

        ProjectDirs::from("", "", "textflow")
            .map(|dirs| dirs.data_dir().join("pipelines"))
            .unwrap_or_else(|| PathBuf::from(".textflow").join("pipelines"))
    }

    pub fn open_store(&self) -> TextflowResult<FilesystemPipelineStore> {
        FilesystemPipelineStore::new(self.store_dir())
    }
}
