//! Tokio-based filesystem backend

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::backend::DiskBackend;

/// Portable filesystem backend using tokio::fs
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFsBackend;

impl TokioFsBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Temp file next to `path`. Unique per write so two writers of the same key
/// never share a temp file, and hidden so it never matches an artifact name.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
}

#[async_trait]
impl DiskBackend for TokioFsBackend {
    async fn exists(&self, path: &Path) -> std::io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn read_file(&self, path: &Path) -> std::io::Result<Bytes> {
        let data = tokio::fs::read(path).await?;
        Ok(Bytes::from(data))
    }

    async fn write_file_atomic(&self, path: &Path, data: Bytes) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(path);
        if let Err(e) = tokio::fs::write(&temp_path, &data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        Ok(())
    }
}
