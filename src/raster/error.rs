//! Raster error types

use thiserror::Error;

/// Errors raised while decoding, editing or encoding raster images.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error(
        "Watermark sample ({sample_width}x{sample_height}) is larger than the image ({image_width}x{image_height})"
    )]
    SampleLargerThanImage {
        sample_width: u32,
        sample_height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Failed to load watermark sample {path}: {message}")]
    SampleLoad { path: String, message: String },

    #[error("Crop {width}x{height}+{left}+{top} is outside a {image_width}x{image_height} image")]
    CropOutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
}
