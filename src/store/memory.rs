// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! In-memory pipeline store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::PipelineStore;
use crate::errors::{TextflowError, TextflowResult};
use crate::pipeline::Pipeline;

/// Pipeline store backed by a map; contents are lost on drop
#[derive(Debug, Default)]
pub struct MemoryPipelineStore {
    pipelines: RwLock<HashMap<String, Pipeline>>,
}

impl MemoryPipelineStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PipelineStore for MemoryPipelineStore {
    async fn get(&self, id: &str) -> TextflowResult<Pipeline> {
        self.pipelines
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| TextflowError::PipelineNotFound { id: id.to_string() })
    }

    async fn put(&self, pipeline: &Pipeline) -> TextflowResult<()> {
        self.pipelines
            .write()
            .await
            .insert(pipeline.id.clone(), pipeline.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> TextflowResult<()> {
        self.pipelines
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TextflowError::PipelineNotFound { id: id.to_string() })
    }

    async fn list(&self) -> TextflowResult<Vec<Pipeline>> {
        let mut pipelines: Vec<_> = self.pipelines.read().await.values().cloned().collect();
        pipelines.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pipelines)
    }
}
