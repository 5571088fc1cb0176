// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Typed step configuration
//!
//! The normalized form of a step once its parameters have passed the
//! registry's schema check. Each variant carries only its own fields, with
//! defaults already applied.

use serde::{Deserialize, Serialize};

use super::{StepParameters, StepType};

/// An enumerated parameter value with a fixed set of spellings
pub trait ParameterValue: Copy + Sized + 'static {
    /// Parameter name as it appears in step parameters
    const NAME: &'static str;
    /// Every accepted value
    const VARIANTS: &'static [Self];
    /// Value used when the parameter is omitted
    const DEFAULT: Option<Self>;

    fn as_str(&self) -> &'static str;

    fn parse_value(value: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_str() == value)
    }

    fn allowed() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.as_str()).collect()
    }
}

/// Summary length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// 1-2 sentences
    Short,
    /// One paragraph
    Medium,
    /// 2-3 paragraphs
    Long,
}

impl ParameterValue for SummaryLength {
    const NAME: &'static str = "length";
    const VARIANTS: &'static [Self] = &[Self::Short, Self::Medium, Self::Long];
    const DEFAULT: Option<Self> = Some(Self::Medium);

    fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

/// Translation target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    Nl,
    Pt,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::Nl => "Dutch",
            Self::Pt => "Portuguese",
        }
    }
}

impl ParameterValue for Language {
    const NAME: &'static str = "language";
    const VARIANTS: &'static [Self] = &[
        Self::En,
        Self::Es,
        Self::Fr,
        Self::De,
        Self::Nl,
        Self::Pt,
    ];
    const DEFAULT: Option<Self> = Some(Self::En);

    fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Nl => "nl",
            Self::Pt => "pt",
        }
    }
}

/// Rewrite tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Professional,
    Formal,
    Friendly,
    Academic,
}

impl ParameterValue for Tone {
    const NAME: &'static str = "tone";
    const VARIANTS: &'static [Self] = &[
        Self::Casual,
        Self::Professional,
        Self::Formal,
        Self::Friendly,
        Self::Academic,
    ];
    const DEFAULT: Option<Self> = Some(Self::Professional);

    fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Professional => "professional",
            Self::Formal => "formal",
            Self::Friendly => "friendly",
            Self::Academic => "academic",
        }
    }
}

impl std::fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, normalized configuration of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepConfig {
    Summarize { length: SummaryLength },
    Translate { language: Language },
    Rewrite { tone: Tone },
    Extract,
}

impl StepConfig {
    pub fn step_type(&self) -> StepType {
        match self {
            Self::Summarize { .. } => StepType::Summarize,
            Self::Translate { .. } => StepType::Translate,
            Self::Rewrite { .. } => StepType::Rewrite,
            Self::Extract => StepType::Extract,
        }
    }

    /// Normalized parameters, every field present
    pub fn parameters(&self) -> StepParameters {
        let mut params = StepParameters::new();
        match self {
            Self::Summarize { length } => {
                params.insert(SummaryLength::NAME.into(), length.as_str().into());
            }
            Self::Translate { language } => {
                params.insert(Language::NAME.into(), language.as_str().into());
            }
            Self::Rewrite { tone } => {
                params.insert(Tone::NAME.into(), tone.as_str().into());
            }
            Self::Extract => {}
        }
        params
    }
}

impl std::fmt::Display for StepConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .parameters()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.as_str().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.step_type(), params)
    }
}
