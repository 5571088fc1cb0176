// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! Filesystem-based pipeline store
//!
//! Stores each pipeline as `<id>.yaml` in a single directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::PipelineStore;
use crate::errors::{TextflowError, TextflowResult};
use crate::pipeline::Pipeline;

const EXTENSION: &str = "yaml";

/// Filesystem-based pipeline store
#[derive(Debug, Clone)]
pub struct FilesystemPipelineStore {
    /// Directory holding one file per pipeline
    dir: PathBuf,
}

impl FilesystemPipelineStore {
    /// Create a store, creating its directory if it doesn't exist
    pub fn new(dir: impl Into<PathBuf>) -> TextflowResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                TextflowError::store(format!(
                    "Failed to create store directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get path for a pipeline, rejecting ids that are not safe file stems
    fn pipeline_path(&self, id: &str) -> TextflowResult<PathBuf> {
        check_id(id)?;
        Ok(self.dir.join(format!("{}.{}", id, EXTENSION)))
    }
}

fn check_id(id: &str) -> TextflowResult<()> {
    let invalid = |reason: &str| TextflowError::InvalidPipelineId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.is_empty() {
        return Err(invalid("id is empty"));
    }
    if id.len() > 128 {
        return Err(invalid("id is longer than 128 characters"));
    }
    if id.starts_with('.') {
        return Err(invalid("id starts with '.'"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(invalid("id contains characters other than letters, digits, '-', '_' and '.'"));
    }

    Ok(())
}

#[async_trait]
impl PipelineStore for FilesystemPipelineStore {
    async fn get(&self, id: &str) -> TextflowResult<Pipeline> {
        let path = self.pipeline_path(id)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TextflowError::PipelineNotFound { id: id.to_string() })
            }
            Err(e) => {
                return Err(TextflowError::FileReadError {
                    path,
                    error: e.to_string(),
                })
            }
        };

        let pipeline = Pipeline::from_yaml(&content)?;
        if pipeline.id != id {
            return Err(TextflowError::store(format!(
                "'{}' holds pipeline '{}'",
                path.display(),
                pipeline.id
            )));
        }

        Ok(pipeline)
    }

    async fn put(&self, pipeline: &Pipeline) -> TextflowResult<()> {
        let path = self.pipeline_path(&pipeline.id)?;
        let yaml = pipeline.to_yaml()?;

        // Write beside the target and rename so readers never see a partial file
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        tokio::fs::write(&tmp, yaml)
            .await
            .map_err(|e| TextflowError::FileWriteError {
                path: tmp.clone(),
                error: e.to_string(),
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| TextflowError::FileWriteError {
                path: path.clone(),
                error: e.to_string(),
            })?;

        tracing::debug!(id = %pipeline.id, path = %path.display(), "Stored pipeline");
        Ok(())
    }

    async fn delete(&self, id: &str) -> TextflowResult<()> {
        let path = self.pipeline_path(id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TextflowError::PipelineNotFound { id: id.to_string() })
            }
            Err(e) => Err(TextflowError::store(format!(
                "Failed to remove '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    async fn list(&self) -> TextflowResult<Vec<Pipeline>> {
        let mut pipelines = Vec::new();

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            TextflowError::store(format!("Failed to read store directory: {}", e))
        })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TextflowError::store(format!("Failed to read store entry: {}", e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }

            let parsed = match tokio::fs::read_to_string(&path).await {
                Ok(content) => Pipeline::from_yaml(&content),
                Err(e) => Err(e.into()),
            };

            match parsed {
                Ok(pipeline) => pipelines.push(pipeline),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable pipeline file"
                ),
            }
        }

        pipelines.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pipelines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineStep, StepType};
    use tempfile::TempDir;

    fn sample(id: &str) -> Pipeline {
        Pipeline::new(id, "Sample")
            .with_step(PipelineStep::new("1", StepType::Summarize).with_parameter("length", "short"))
            .with_step(PipelineStep::new("2", StepType::Extract))
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let temp = TempDir::new().unwrap();
        let store = FilesystemPipelineStore::new(temp.path()).unwrap();
        let pipeline = sample("digest");

        store.put(&pipeline).await.unwrap();

        assert!(temp.path().join("digest.yaml").exists());
        assert_eq!(store.get("digest").await.unwrap(), pipeline);
    }

    #[tokio::test]
    async fn test_missing_pipeline() {
        let temp = TempDir::new().unwrap();
        let store = FilesystemPipelineStore::new(temp.path()).unwrap();

        assert!(store.get("nope").await.unwrap_err().is_not_found());
        assert!(store.delete("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unsafe_ids_rejected() {
        let temp = TempDir::new().unwrap();
        let store = FilesystemPipelineStore::new(temp.path()).unwrap();

        for id in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(
                    store.get(id).await,
                    Err(TextflowError::InvalidPipelineId { .. })
                ),
                "id {:?} should be rejected",
                id
            );
        }
        assert!(store.put(&sample("../escape")).await.is_err());
    }

    #[tokio::test]
    async fn test_list_skips_unparsable_files() {
        let temp = TempDir::new().unwrap();
        let store = FilesystemPipelineStore::new(temp.path().join("nested")).unwrap();

        store.put(&sample("b")).await.unwrap();
        store.put(&sample("a")).await.unwrap();
        std::fs::write(store.dir().join("broken.yaml"), "steps: [").unwrap();
        std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let temp = TempDir::new().unwrap();
        let store = FilesystemPipelineStore::new(temp.path()).unwrap();

        store.put(&sample("gone")).await.unwrap();
        store.delete("gone").await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }
}
