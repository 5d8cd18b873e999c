//! Whitespace border detection
//!
//! Rasterized drawings sit on a large white page. The detector shrinks a
//! rectangle from all four sides until each side touches drawn content, and
//! the image is then cropped to that rectangle.
//!
//! Every side is probed independently, one row or column per step, so the
//! detector costs O(width + height) line scans rather than a scan of every
//! pixel. A line that holds at most [`NOISE_TOLERANCE`] non-background pixels
//! counts as empty, which lets stray anti-aliasing dots and scan specks be
//! cropped away.

use image::{Rgba, RgbaImage};

use super::RasterError;

/// Reference "empty" pixel value.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Largest number of non-background pixels a row or column may contain and
/// still be treated as empty.
pub const NOISE_TOLERANCE: u32 = 2;

/// Rectangle in image coordinates.
///
/// For a non-empty image `width >= 1`, `height >= 1`,
/// `left + width <= image width` and `top + height <= image height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Box covering the whole image.
    pub fn full(image: &RgbaImage) -> Self {
        Self::new(0, 0, image.width(), image.height())
    }

    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Settled {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

impl Settled {
    fn all(&self) -> bool {
        self.top && self.right && self.bottom && self.left
    }
}

fn is_content(pixel: &Rgba<u8>) -> bool {
    *pixel != BACKGROUND
}

/// True when row `y` holds more than the tolerated amount of content in `[left, right)`.
fn row_has_content(image: &RgbaImage, y: u32, left: u32, right: u32) -> bool {
    let mut count = 0;
    for x in left..right {
        if is_content(image.get_pixel(x, y)) {
            count += 1;
            if count > NOISE_TOLERANCE {
                return true;
            }
        }
    }
    false
}

/// True when column `x` holds more than the tolerated amount of content in `[top, bottom)`.
fn column_has_content(image: &RgbaImage, x: u32, top: u32, bottom: u32) -> bool {
    let mut count = 0;
    for y in top..bottom {
        if is_content(image.get_pixel(x, y)) {
            count += 1;
            if count > NOISE_TOLERANCE {
                return true;
            }
        }
    }
    false
}

/// Smallest rectangle enclosing the drawn content of `image`.
///
/// An all-background image collapses to a 1x1 box instead of an empty one;
/// a zero-sized image returns its own (empty) extent.
pub fn find_border(image: &RgbaImage) -> BoundingBox {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return BoundingBox::full(image);
    }

    let (mut left, mut top, mut right, mut bottom) = (0, 0, width, height);
    let mut settled = Settled::default();

    // Each pass either shrinks or settles every unsettled side, and a side
    // stops shrinking once its axis is down to a single line.
    while !settled.all() {
        if !settled.top {
            if bottom - top > 1 && !row_has_content(image, top, left, right) {
                top += 1;
            } else {
                settled.top = true;
            }
        }

        if !settled.right {
            if right - left > 1 && !column_has_content(image, right - 1, top, bottom) {
                right -= 1;
            } else {
                settled.right = true;
            }
        }

        if !settled.bottom {
            if bottom - top > 1 && !row_has_content(image, bottom - 1, left, right) {
                bottom -= 1;
            } else {
                settled.bottom = true;
            }
        }

        if !settled.left {
            if right - left > 1 && !column_has_content(image, left, top, bottom) {
                left += 1;
            } else {
                settled.left = true;
            }
        }
    }

    BoundingBox::new(left, top, right - left, bottom - top)
}

/// Copy of `image` restricted to `bbox`.
pub fn crop(image: &RgbaImage, bbox: BoundingBox) -> Result<RgbaImage, RasterError> {
    if !bbox.fits_within(image.width(), image.height()) {
        return Err(RasterError::CropOutOfBounds {
            left: bbox.left,
            top: bbox.top,
            width: bbox.width,
            height: bbox.height,
            image_width: image.width(),
            image_height: image.height(),
        });
    }
    Ok(image::imageops::crop_imm(image, bbox.left, bbox.top, bbox.width, bbox.height).to_image())
}

/// Crop `image` to its drawn content, returning the box that was used.
pub fn crop_to_content(image: &RgbaImage) -> Result<(RgbaImage, BoundingBox), RasterError> {
    let bbox = find_border(image);
    tracing::debug!(
        left = bbox.left,
        top = bbox.top,
        width = bbox.width,
        height = bbox.height,
        source_width = image.width(),
        source_height = image.height(),
        "Content border detected"
    );
    Ok((crop(image, bbox)?, bbox))
}
