// Error types module

use thiserror::Error;

use crate::cache::CacheError;
use crate::watermark::WatermarkError;

/// Errors that reach callers of the pipeline.
///
/// Conversion failures never show up here (they are answered with a
/// placeholder image); what remains is a broken cache, a watermark that
/// cannot be drawn, bad configuration, or a worker task that died.
#[derive(Error, Debug)]
pub enum Error {
    /// Artifact storage failed
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Watermark could not be applied
    #[error("Watermark error: {0}")]
    Watermark(#[from] WatermarkError),

    /// Invalid or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A blocking worker panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Task(String),
}
