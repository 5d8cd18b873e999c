//! Directory-backed document store holding zlib-compressed drawings

use async_trait::async_trait;
use bytes::Bytes;
use flate2::read::ZlibDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{DocumentSource, SourceError};
use crate::cache::CacheKey;

/// Reads `{article}-{version}.dwg.z` files from one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: CacheKey) -> PathBuf {
        self.dir
            .join(format!("{}-{}.dwg.z", key.article, key.version))
    }
}

/// Inflate a zlib stream.
pub(crate) fn inflate(compressed: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed).read_to_end(&mut out)?;
    Ok(out)
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, SourceError> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SourceError::Io(e)),
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn fetch(&self, key: CacheKey) -> Result<Bytes, SourceError> {
        let path = self.path_for(key);
        let Some(compressed) = read_optional(&path).await? else {
            tracing::debug!(article = key.article, version = key.version, "No stored drawing");
            return Ok(Bytes::new());
        };

        // A corrupt stream is treated like a missing drawing
        match inflate(&compressed) {
            Ok(raw) => Ok(Bytes::from(raw)),
            Err(e) => {
                tracing::warn!(
                    article = key.article,
                    version = key.version,
                    error = %e,
                    "Stored drawing failed to decompress"
                );
                Ok(Bytes::new())
            }
        }
    }
}
