//! Backend trait for filesystem operations

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// Abstraction over the filesystem so the cache can be exercised without disk
#[async_trait]
pub trait DiskBackend: Send + Sync {
    /// Check whether a file exists
    async fn exists(&self, path: &Path) -> std::io::Result<bool>;

    /// Read entire file contents
    async fn read_file(&self, path: &Path) -> std::io::Result<Bytes>;

    /// Write file contents atomically (temp file + rename).
    /// Parent directories are created when missing.
    async fn write_file_atomic(&self, path: &Path, data: Bytes) -> std::io::Result<()>;
}
