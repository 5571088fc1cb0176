// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Pipeline storage
//!
//! The engine only needs to look pipelines up by id; everything else about
//! where definitions live is up to the store.

mod filesystem;
mod memory;

pub use filesystem::FilesystemPipelineStore;
pub use memory::MemoryPipelineStore;

use async_trait::async_trait;

use crate::errors::TextflowResult;
use crate::pipeline::Pipeline;

/// Trait for pipeline stores
#[async_trait]
pub trait PipelineStore: Send + Sync {
    /// Get a pipeline by id, or `PipelineNotFound`
    async fn get(&self, id: &str) -> TextflowResult<Pipeline>;

    /// Insert or replace a pipeline
    async fn put(&self, pipeline: &Pipeline) -> TextflowResult<()>;

    /// Remove a pipeline, or `PipelineNotFound`
    async fn delete(&self, id: &str) -> TextflowResult<()>;

    /// All stored pipelines, ordered by id
    async fn list(&self) -> TextflowResult<Vec<Pipeline>>;
}
