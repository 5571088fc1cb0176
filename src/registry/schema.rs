// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Per-type parameter schemas
//!
//! Checks authored parameters against the closed set each step type accepts
//! and turns them into a [`StepConfig`].

use serde::Serialize;
use serde_json::Value;

use crate::errors::SchemaError;
use crate::pipeline::{
    Language, ParameterValue, StepConfig, StepParameters, StepType, SummaryLength, Tone,
};

/// One accepted parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub allowed: Vec<&'static str>,
    pub default: Option<&'static str>,
}

impl ParameterSpec {
    fn of<T: ParameterValue>() -> Self {
        Self {
            name: T::NAME,
            allowed: T::allowed(),
            default: T::DEFAULT.map(|d| d.as_str()),
        }
    }
}

/// Every parameter a step type accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSchema {
    pub step_type: StepType,
    pub parameters: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn for_type(step_type: StepType) -> Self {
        let parameters = match step_type {
            StepType::Summarize => vec![ParameterSpec::of::<SummaryLength>()],
            StepType::Translate => vec![ParameterSpec::of::<Language>()],
            StepType::Rewrite => vec![ParameterSpec::of::<Tone>()],
            StepType::Extract => vec![],
        };

        Self {
            step_type,
            parameters,
        }
    }

    /// Reject any key the schema does not name
    fn check_keys(&self, params: &StepParameters) -> Result<(), SchemaError> {
        for key in params.keys() {
            if !self.parameters.iter().any(|p| p.name == key) {
                return Err(SchemaError::UnknownParameter {
                    step_type: self.step_type,
                    parameter: key.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Validate parameters for a step type and normalize them
pub fn validate(step_type: StepType, params: &StepParameters) -> Result<StepConfig, SchemaError> {
    ParameterSchema::for_type(step_type).check_keys(params)?;

    Ok(match step_type {
        StepType::Summarize => StepConfig::Summarize {
            length: resolve(step_type, params)?,
        },
        StepType::Translate => StepConfig::Translate {
            language: resolve(step_type, params)?,
        },
        StepType::Rewrite => StepConfig::Rewrite {
            tone: resolve(step_type, params)?,
        },
        StepType::Extract => StepConfig::Extract,
    })
}

fn resolve<T: ParameterValue>(
    step_type: StepType,
    params: &StepParameters,
) -> Result<T, SchemaError> {
    match params.get(T::NAME) {
        None | Some(Value::Null) => T::DEFAULT.ok_or_else(|| SchemaError::MissingParameter {
            step_type,
            parameter: T::NAME.to_string(),
        }),
        Some(Value::String(value)) => {
            T::parse_value(value).ok_or_else(|| SchemaError::InvalidValue {
                parameter: T::NAME.to_string(),
                value: value.clone(),
                allowed: T::allowed().into_iter().map(String::from).collect(),
            })
        }
        Some(other) => Err(SchemaError::InvalidType {
            parameter: T::NAME.to_string(),
            found: json_type_name(other).to_string(),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> StepParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let empty = StepParameters::new();

        assert_eq!(
            validate(StepType::Summarize, &empty).unwrap(),
            StepConfig::Summarize {
                length: SummaryLength::Medium
            }
        );
        assert_eq!(
            validate(StepType::Translate, &empty).unwrap(),
            StepConfig::Translate {
                language: Language::En
            }
        );
        assert_eq!(
            validate(StepType::Rewrite, &empty).unwrap(),
            StepConfig::Rewrite {
                tone: Tone::Professional
            }
        );
        assert_eq!(validate(StepType::Extract, &empty).unwrap(), StepConfig::Extract);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let config = validate(StepType::Rewrite, &params(&[("tone", Value::Null)])).unwrap();
        assert_eq!(config, StepConfig::Rewrite { tone: Tone::Professional });
    }

    #[test]
    fn test_explicit_values() {
        let config = validate(StepType::Translate, &params(&[("language", json!("de"))])).unwrap();
        assert_eq!(
            config,
            StepConfig::Translate {
                language: Language::De
            }
        );
    }

    #[test]
    fn test_unsupported_language_rejected() {
        let err = validate(StepType::Translate, &params(&[("language", json!("xx"))])).unwrap_err();

        match err {
            SchemaError::InvalidValue {
                parameter,
                value,
                allowed,
            } => {
                assert_eq!(parameter, "language");
                assert_eq!(value, "xx");
                assert_eq!(allowed, vec!["en", "es", "fr", "de", "nl", "pt"]);
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = validate(
            StepType::Summarize,
            &params(&[("length", json!("short")), ("style", json!("bullets"))]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchemaError::UnknownParameter {
                step_type: StepType::Summarize,
                parameter: "style".into()
            }
        );
    }

    #[test]
    fn test_extract_accepts_no_parameters() {
        let err = validate(StepType::Extract, &params(&[("limit", json!(5))])).unwrap_err();
        assert_eq!(err.parameter(), "limit");
    }

    #[test]
    fn test_non_string_value_rejected() {
        let err = validate(StepType::Summarize, &params(&[("length", json!(3))])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidType {
                parameter: "length".into(),
                found: "number".into()
            }
        );
    }

    #[test]
    fn test_schema_listing() {
        let schema = ParameterSchema::for_type(StepType::Rewrite);

        assert_eq!(schema.parameters.len(), 1);
        assert_eq!(schema.parameters[0].name, "tone");
        assert_eq!(schema.parameters[0].default, Some("professional"));
        assert!(ParameterSchema::for_type(StepType::Extract).parameters.is_empty());
    }
}
