//! Cache error types

use thiserror::Error;

use super::CacheKey;

/// Errors raised by the artifact cache.
///
/// Storage failures are fatal for the caller: there is no placeholder image
/// for a cache that cannot be read.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache entry not found: {0}")]
    NotFound(CacheKey),

    #[error("Cache key {0} is reserved for placeholders")]
    ReservedKey(CacheKey),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}
