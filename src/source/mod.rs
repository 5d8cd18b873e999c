//! Raw drawing retrieval
//!
//! The pipeline only needs "give me the raw CAD bytes for (article, version)".
//! An empty result means the store has nothing for that key.

mod directory;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::cache::CacheKey;

pub use directory::DirectorySource;

/// Errors from the document store itself (not "document missing").
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Document store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// Supplies decompressed raw drawings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Raw bytes for `key`, or empty bytes when the store has none.
    async fn fetch(&self, key: CacheKey) -> Result<Bytes, SourceError>;
}
