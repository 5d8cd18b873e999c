//! Watermark error types.

use std::fmt;

use crate::raster::RasterError;

/// Errors that can occur during watermark processing.
#[derive(Debug)]
pub enum WatermarkError {
    /// The font file could not be read or parsed
    FontError(String),

    /// A watermark needs at least one line of text
    NoLines,

    /// Invalid configuration
    ConfigError(String),

    /// Failed to decode or encode the target image
    Image(RasterError),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontError(msg) => write!(f, "Failed to load watermark font: {}", msg),
            Self::NoLines => write!(f, "Watermark has no text lines"),
            Self::ConfigError(msg) => write!(f, "Watermark configuration error: {}", msg),
            Self::Image(err) => write!(f, "Watermark image error: {}", err),
        }
    }
}

impl std::error::Error for WatermarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RasterError> for WatermarkError {
    fn from(err: RasterError) -> Self {
        Self::Image(err)
    }
}
