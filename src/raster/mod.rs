//! Raster post-processing
//!
//! Operations applied to a freshly rasterized drawing before it is cached:
//! stripping the rasterizer's mark and cropping the white page border.

mod border;
mod codec;
mod error;
mod strip;

pub use border::{crop, crop_to_content, find_border, BoundingBox, BACKGROUND, NOISE_TOLERANCE};
pub use codec::{decode, encode_png};
pub use error::RasterError;
pub use strip::WatermarkSample;
