//! Flat-directory store of finished PNG artifacts

use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backend::DiskBackend;
use super::tokio_backend::TokioFsBackend;
use super::{CacheError, CacheKey};

/// Persists finished raster bytes keyed by (article, version).
///
/// There is no in-memory index: every lookup is a direct probe of the
/// storage directory. The directory itself is created by the first write.
#[derive(Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
    backend: Arc<dyn DiskBackend>,
}

impl std::fmt::Debug for ArtifactCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCache").field("dir", &self.dir).finish()
    }
}

impl ArtifactCache {
    /// Cache rooted at `dir` on the local filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_backend(dir, Arc::new(TokioFsBackend::new()))
    }

    pub fn with_backend(dir: impl Into<PathBuf>, backend: Arc<dyn DiskBackend>) -> Self {
        Self {
            dir: dir.into(),
            backend,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the artifact for `key`.
    pub fn path_for(&self, key: CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// True iff an artifact for `key` is present.
    pub async fn exists(&self, key: CacheKey) -> Result<bool, CacheError> {
        Ok(self.backend.exists(&self.path_for(key)).await?)
    }

    /// Raw bytes stored for `key`.
    pub async fn read(&self, key: CacheKey) -> Result<Bytes, CacheError> {
        match self.backend.read_file(&self.path_for(key)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CacheError::NotFound(key)),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    /// Store `data` for `key`, replacing any previous artifact.
    ///
    /// Readers observe either the old artifact or the complete new one.
    /// Placeholder keys are refused; they are only written by
    /// [`seed_fallbacks`](Self::seed_fallbacks).
    pub async fn write(&self, key: CacheKey, data: Bytes) -> Result<(), CacheError> {
        if key.is_sentinel() {
            return Err(CacheError::ReservedKey(key));
        }
        self.store(key, data).await
    }

    /// Write the three placeholder artifacts.
    pub async fn seed_fallbacks(
        &self,
        empty_source: Bytes,
        load_failure: Bytes,
        unexpected_failure: Bytes,
    ) -> Result<(), CacheError> {
        self.store(CacheKey::EMPTY_SOURCE, empty_source).await?;
        self.store(CacheKey::LOAD_FAILURE, load_failure).await?;
        self.store(CacheKey::UNEXPECTED_FAILURE, unexpected_failure)
            .await
    }

    async fn store(&self, key: CacheKey, data: Bytes) -> Result<(), CacheError> {
        let path = self.path_for(key);
        self.backend.write_file_atomic(&path, data).await?;
        tracing::debug!(article = key.article, version = key.version, path = %path.display(), "Artifact stored");
        Ok(())
    }

    /// Placeholder keys that have no artifact yet.
    pub async fn missing_fallbacks(&self) -> Result<Vec<CacheKey>, CacheError> {
        let mut missing = Vec::new();
        for key in CacheKey::SENTINELS {
            if !self.exists(key).await? {
                missing.push(key);
            }
        }
        Ok(missing)
    }
}
