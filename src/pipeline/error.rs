//! Conversion failure taxonomy
//!
//! None of these reach the caller: each maps to a reserved cache key whose
//! placeholder image is served instead.

use std::fmt;
use thiserror::Error;

use crate::cache::CacheKey;

/// Step of a cache-miss conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Rasterizing,
    WatermarkStripping,
    Cropping,
    Caching,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Fetching => "fetching",
            Stage::Rasterizing => "rasterizing",
            Stage::WatermarkStripping => "watermark_stripping",
            Stage::Cropping => "cropping",
            Stage::Caching => "caching",
        };
        f.write_str(label)
    }
}

/// Why a placeholder was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    EmptySource,
    LoadFailure,
    Unexpected,
}

impl FallbackReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            FallbackReason::EmptySource => "empty_source",
            FallbackReason::LoadFailure => "load_failure",
            FallbackReason::Unexpected => "unexpected",
        }
    }

    /// Reserved key holding the placeholder for this reason.
    pub fn fallback_key(&self) -> CacheKey {
        match self {
            FallbackReason::EmptySource => CacheKey::EMPTY_SOURCE,
            FallbackReason::LoadFailure => CacheKey::LOAD_FAILURE,
            FallbackReason::Unexpected => CacheKey::UNEXPECTED_FAILURE,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConversionError {
    /// The document store had no bytes for the key.
    #[error("Document store returned no data")]
    EmptySource,

    /// The rasterization engine could not parse the drawing.
    #[error("Rasterizer could not load drawing: {0}")]
    RasterizationLoad(String),

    /// Anything else that went wrong during the conversion.
    #[error("Unexpected failure while {stage}: {message}")]
    Unexpected { stage: Stage, message: String },
}

impl ConversionError {
    pub fn unexpected(stage: Stage, err: impl fmt::Display) -> Self {
        ConversionError::Unexpected {
            stage,
            message: err.to_string(),
        }
    }

    pub fn reason(&self) -> FallbackReason {
        match self {
            ConversionError::EmptySource => FallbackReason::EmptySource,
            ConversionError::RasterizationLoad(_) => FallbackReason::LoadFailure,
            ConversionError::Unexpected { .. } => FallbackReason::Unexpected,
        }
    }

    pub fn fallback_key(&self) -> CacheKey {
        self.reason().fallback_key()
    }
}
