// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Pipeline definition structures
//!
//! Defines the schema for pipeline files and stored pipelines. Definitions
//! are untrusted input: step types and parameters are kept exactly as
//! authored and only become typed once the validator accepts them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::TextflowError;

/// Free-form parameters as authored, keyed by parameter name
pub type StepParameters = BTreeMap<String, serde_json::Value>;

/// Pipeline definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline id (generated when omitted)
    #[serde(default = "generate_id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Pipeline description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<PipelineStep>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            steps: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a step
    pub fn with_step(mut self, step: PipelineStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Load pipeline from a YAML or JSON file
    pub fn from_file(path: &Path) -> Result<Self, TextflowError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TextflowError::FileReadError {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse pipeline from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, TextflowError> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Parse pipeline from JSON string
    pub fn from_json(json: &str) -> Result<Self, TextflowError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serialize pipeline to YAML
    pub fn to_yaml(&self) -> Result<String, TextflowError> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Get a step by id
    pub fn get_step(&self, id: &str) -> Option<&PipelineStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Get all step ids, in order
    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id.as_str()).collect()
    }
}

/// A single pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStep {
    /// Step id (must be unique within pipeline)
    pub id: String,

    /// Step type tag as authored
    #[serde(rename = "type")]
    pub step_type: String,

    /// Parameters for the step type
    #[serde(default)]
    pub parameters: StepParameters,
}

impl PipelineStep {
    /// Create a step of a known type with no parameters
    pub fn new(id: impl Into<String>, step_type: StepType) -> Self {
        Self {
            id: id.into(),
            step_type: step_type.to_string(),
            parameters: StepParameters::new(),
        }
    }

    /// Set a parameter
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// The step type, if the tag names a known one
    pub fn kind(&self) -> Option<StepType> {
        self.step_type.parse().ok()
    }
}

/// Step types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Condense text to key points
    Summarize,
    /// Convert to a target language
    Translate,
    /// Adjust tone and style
    Rewrite,
    /// Extract keywords and entities
    Extract,
}

impl StepType {
    pub const ALL: [StepType; 4] = [
        StepType::Summarize,
        StepType::Translate,
        StepType::Rewrite,
        StepType::Extract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Translate => "translate",
            Self::Rewrite => "rewrite",
            Self::Extract => "extract",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Summarize => "Condense text to key points",
            Self::Translate => "Convert to target language",
            Self::Rewrite => "Adjust tone and style",
            Self::Extract => "Extract keywords and entities",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summarize" => Ok(Self::Summarize),
            "translate" => Ok(Self::Translate),
            "rewrite" => Ok(Self::Rewrite),
            "extract" => Ok(Self::Extract),
            _ => Err(format!("Unknown step type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pipeline() {
        let yaml = r#"
id: "digest"
name: "Content Digest"
steps:
  - id: "1"
    type: summarize
    parameters:
      length: medium
  - id: "2"
    type: translate
    parameters:
      language: es
"#;

        let pipeline = Pipeline::from_yaml(yaml).unwrap();
        assert_eq!(pipeline.id, "digest");
        assert_eq!(pipeline.name, "Content Digest");
        assert_eq!(pipeline.step_ids(), vec!["1", "2"]);
        assert_eq!(pipeline.steps[1].kind(), Some(StepType::Translate));
        assert_eq!(pipeline.steps[1].parameters["language"], "es");
    }

    #[test]
    fn test_unknown_type_is_kept_for_validation() {
        let yaml = r#"
id: "p"
name: "odd"
steps:
  - id: "a"
    type: sing
"#;

        let pipeline = Pipeline::from_yaml(yaml).unwrap();
        assert_eq!(pipeline.steps[0].step_type, "sing");
        assert_eq!(pipeline.steps[0].kind(), None);
        assert!(pipeline.steps[0].parameters.is_empty());
    }

    #[test]
    fn test_missing_id_is_generated() {
        let pipeline = Pipeline::from_yaml("name: anonymous\n").unwrap();

        assert!(uuid::Uuid::parse_str(&pipeline.id).is_ok());
        assert!(pipeline.steps.is_empty());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(
            &path,
            r#"{"id":"j","name":"Json","steps":[{"id":"x","type":"extract"}]}"#,
        )
        .unwrap();

        let pipeline = Pipeline::from_file(&path).unwrap();
        assert_eq!(pipeline.get_step("x").unwrap().kind(), Some(StepType::Extract));
    }

    #[test]
    fn test_from_missing_file() {
        let err = Pipeline::from_file(Path::new("/nonexistent/pipeline.yaml")).unwrap_err();
        assert!(matches!(err, TextflowError::FileReadError { .. }));
    }

    #[test]
    fn test_step_builder() {
        let step = PipelineStep::new("s", StepType::Rewrite).with_parameter("tone", "formal");

        assert_eq!(step.step_type, "rewrite");
        assert_eq!(step.parameters["tone"], "formal");
    }
}
