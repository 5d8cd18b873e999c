//! PNG decode/encode

use image::codecs::png::PngEncoder;
use image::io::Reader as ImageReader;
use image::{ColorType, ImageEncoder, RgbaImage};
use std::io::Cursor;

use super::RasterError;

/// Decode PNG (or any format the `image` build supports) into RGBA8.
pub fn decode(data: &[u8]) -> Result<RgbaImage, RasterError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| RasterError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| RasterError::Decode(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// Encode RGBA8 as lossless PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| RasterError::Encode(e.to_string()))?;
    Ok(buf)
}
