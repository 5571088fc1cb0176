// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Local provider
//!
//! Deterministic, offline heuristics for the step types that can be done
//! without a model: extractive summaries and keyword extraction. Translate
//! and rewrite always report the provider as unavailable.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;

use super::TransformationProvider;
use crate::errors::ProviderError;
use crate::pipeline::{StepConfig, SummaryLength};

const MAX_KEYWORDS: usize = 10;

const STOPWORDS: &[&str] = &[
    "about", "after", "again", "also", "and", "any", "are", "because", "been", "before", "being",
    "between", "both", "but", "can", "could", "did", "does", "doing", "down", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "her", "here", "hers", "him",
    "his", "how", "into", "its", "just", "more", "most", "not", "now", "off", "once", "only",
    "other", "our", "out", "over", "own", "same", "she", "should", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "through", "too", "under", "until", "very", "was", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
];

/// Offline heuristic provider
pub struct LocalProvider {
    sentence: Regex,
    word: Regex,
}

impl LocalProvider {
    pub fn new() -> Self {
        Self {
            sentence: Regex::new(r"[^.!?]+(?:[.!?]+|$)").expect("Invalid sentence pattern"),
            word: Regex::new(r"[A-Za-z][A-Za-z'-]+").expect("Invalid word pattern"),
        }
    }

    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.sentence
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn summarize(&self, text: &str, length: SummaryLength) -> String {
        let count = match length {
            SummaryLength::Short => 1,
            SummaryLength::Medium => 3,
            SummaryLength::Long => 6,
        };

        self.sentences(text)
            .into_iter()
            .take(count)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn extract(&self, text: &str) -> String {
        // word -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for (position, m) in self.word.find_iter(text).enumerate() {
            let word = m.as_str().trim_matches(|c| c == '\'' || c == '-').to_lowercase();
            if word.len() < 3 || STOPWORDS.contains(&word.as_str()) {
                continue;
            }
            counts.entry(word).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        });

        ranked
            .into_iter()
            .take(MAX_KEYWORDS)
            .map(|(word, _)| word)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransformationProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn transform(&self, text: &str, config: &StepConfig) -> Result<String, ProviderError> {
        match config {
            StepConfig::Summarize { length } => Ok(self.summarize(text, *length)),
            StepConfig::Extract => Ok(self.extract(text)),
            StepConfig::Translate { .. } | StepConfig::Rewrite { .. } => {
                Err(ProviderError::unavailable(format!(
                    "the local provider cannot {}; configure an http provider",
                    config.step_type()
                )))
            }
        }
    }
}
