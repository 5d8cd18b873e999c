//! Removal of the rasterizer's own watermark
//!
//! The rasterization engine stamps a fixed evaluation mark onto every page.
//! A reference render of that mark is kept as a sample image; any pixel of a
//! fresh render that exactly matches the sample at the same position is
//! painted back to background white.

use image::RgbaImage;
use std::path::Path;

use super::border::BACKGROUND;
use super::RasterError;

/// Reference image of the mark to strip, decoded once.
#[derive(Debug, Clone)]
pub struct WatermarkSample {
    image: RgbaImage,
}

impl WatermarkSample {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Load the sample from disk.
    pub fn load(path: &Path) -> Result<Self, RasterError> {
        let image = image::open(path).map_err(|e| RasterError::SampleLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(image.to_rgba8()))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Paint every pixel equal to the sample at the same position white.
    ///
    /// Pixels outside the sample's extent are left alone. A sample larger
    /// than the image means the render canvas no longer matches the one the
    /// sample was taken from, and is rejected rather than silently ignored.
    /// Returns the number of pixels cleared.
    pub fn strip(&self, target: &mut RgbaImage) -> Result<u64, RasterError> {
        let (sample_width, sample_height) = self.image.dimensions();
        let (image_width, image_height) = target.dimensions();
        if sample_width > image_width || sample_height > image_height {
            return Err(RasterError::SampleLargerThanImage {
                sample_width,
                sample_height,
                image_width,
                image_height,
            });
        }

        let mut cleared = 0;
        for (x, y, sample_pixel) in self.image.enumerate_pixels() {
            let pixel = target.get_pixel_mut(x, y);
            if *pixel == *sample_pixel {
                *pixel = BACKGROUND;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}
