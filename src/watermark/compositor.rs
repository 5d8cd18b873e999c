//! Watermark compositor.
//!
//! Lays the caller's text lines out as a centered column spanning the whole
//! image and blends them on with a faint fill. The column repeats the lines
//! twice and then the first line once more, and the font is the largest size
//! in the configured range at which the longest line still fits.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dwg2img::watermark::{FontFace, WatermarkCompositor, WatermarkSpec, WatermarkStyle};
//!
//! let face = Arc::new(FontFace::load("fonts/Arial-Bold.ttf".as_ref())?);
//! let compositor = WatermarkCompositor::new(face, WatermarkStyle::default());
//! let spec = WatermarkSpec::new(vec!["J. Doe".into(), "2026-10-17".into()])?;
//! let stamped = compositor.apply(&image, &spec);
//! ```

use image::RgbaImage;
use std::sync::Arc;

use super::face::TextFace;
use super::metrics::FontMetricsCache;
use super::text_renderer::{draw_text, Color};
use super::WatermarkError;
use crate::constants::{
    DEFAULT_FONT_SIZE_STEP, DEFAULT_HORIZONTAL_MARGIN, DEFAULT_LINE_HEIGHT_CORRECTION,
    DEFAULT_MAX_FONT_SIZE, DEFAULT_MIN_FONT_SIZE, DEFAULT_WATERMARK_ALPHA,
};
use crate::raster;

/// Fixed rendering policy for watermarks.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkStyle {
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub font_size_step: u32,
    /// Horizontal room the longest line must leave free, in pixels.
    pub horizontal_margin: u32,
    /// Applied to the measured line height while fitting; text metrics
    /// report a line box taller than the glyphs.
    pub line_height_correction: f32,
    pub color: Color,
    /// Fill opacity, 0..=255.
    pub alpha: u8,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            font_size_step: DEFAULT_FONT_SIZE_STEP,
            horizontal_margin: DEFAULT_HORIZONTAL_MARGIN,
            line_height_correction: DEFAULT_LINE_HEIGHT_CORRECTION,
            color: Color::new(0xD7, 0xD7, 0xD7),
            alpha: DEFAULT_WATERMARK_ALPHA,
        }
    }
}

/// Ordered, non-empty list of watermark lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkSpec {
    lines: Vec<String>,
}

impl WatermarkSpec {
    pub fn new(lines: Vec<String>) -> Result<Self, WatermarkError> {
        if lines.is_empty() {
            return Err(WatermarkError::NoLines);
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of slots in the rendered column: every line twice, plus the first again.
    pub fn total_lines(&self) -> usize {
        self.lines.len() * 2 + 1
    }

    /// Lines in render order.
    pub fn render_sequence(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .chain(self.lines.iter())
            .chain(self.lines.first())
            .map(String::as_str)
    }

    /// Longest line by character count; the first one wins a tie.
    pub fn longest_line(&self) -> &str {
        let mut longest = &self.lines[0];
        for line in &self.lines[1..] {
            if line.chars().count() > longest.chars().count() {
                longest = line;
            }
        }
        longest
    }
}

/// One line placed on the image.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Font size and line positions for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkLayout {
    pub font_size: u32,
    pub lines: Vec<PlacedLine>,
}

/// Stamps watermarks onto images.
///
/// Holds the face and its metrics cache, so one instance should be built at
/// startup and shared by every request.
#[derive(Debug)]
pub struct WatermarkCompositor {
    metrics: FontMetricsCache,
    style: WatermarkStyle,
}

impl WatermarkCompositor {
    pub fn new(face: Arc<dyn TextFace>, style: WatermarkStyle) -> Self {
        Self {
            metrics: FontMetricsCache::new(face),
            style,
        }
    }

    pub fn style(&self) -> &WatermarkStyle {
        &self.style
    }

    pub fn metrics(&self) -> &FontMetricsCache {
        &self.metrics
    }

    /// Largest font size in the style's range at which the longest line fits.
    ///
    /// A size fits when the line's width leaves `horizontal_margin` free and
    /// `total_lines` corrected line heights fit the image height. The search
    /// walks upward and stops at the first size that does not fit; if even the
    /// smallest size fails, the smallest size is used.
    pub fn choose_font_size(&self, width: u32, height: u32, spec: &WatermarkSpec) -> u32 {
        let style = &self.style;
        let longest = spec.longest_line();
        let total_lines = spec.total_lines() as f32;
        let max_width = width as f32 - style.horizontal_margin as f32;
        let step = style.font_size_step.max(1);

        let mut chosen = style.min_font_size;
        let mut size = style.min_font_size;
        while size <= style.max_font_size {
            let extent = self.metrics.measure(longest, size);
            let column_height = extent.height * style.line_height_correction * total_lines;
            if extent.width > max_width || column_height > height as f32 {
                break;
            }
            chosen = size;
            size += step;
        }
        chosen
    }

    /// Positions of every line for an image of the given size.
    ///
    /// Line k (1-based) is centered horizontally and its line box is centered
    /// on `k * (height / (total_lines + 1))`, the slot height being an integer.
    pub fn layout(&self, width: u32, height: u32, spec: &WatermarkSpec) -> WatermarkLayout {
        let font_size = self.choose_font_size(width, height, spec);
        let slot = height / (spec.total_lines() as u32 + 1);

        let lines = spec
            .render_sequence()
            .enumerate()
            .map(|(i, text)| {
                let extent = self.metrics.measure(text, font_size);
                let k = i as u32 + 1;
                PlacedLine {
                    text: text.to_string(),
                    x: (width as f32 - extent.width) / 2.0,
                    y: (slot * k) as f32 - extent.height / 2.0,
                }
            })
            .collect();

        WatermarkLayout { font_size, lines }
    }

    /// New image with the watermark blended over `image`.
    pub fn apply(&self, image: &RgbaImage, spec: &WatermarkSpec) -> RgbaImage {
        let layout = self.layout(image.width(), image.height(), spec);
        let mut out = image.clone();
        for line in &layout.lines {
            draw_text(
                &mut out,
                self.metrics.face(),
                &line.text,
                layout.font_size as f32,
                line.x.round() as i32,
                line.y.round() as i32,
                self.style.color,
                self.style.alpha,
            );
        }
        tracing::debug!(
            font_size = layout.font_size,
            lines = layout.lines.len(),
            width = image.width(),
            height = image.height(),
            "Watermark applied"
        );
        out
    }

    /// Decode `png`, watermark it and encode the result as PNG.
    pub fn apply_png(&self, png: &[u8], spec: &WatermarkSpec) -> Result<Vec<u8>, WatermarkError> {
        let image = raster::decode(png)?;
        let stamped = self.apply(&image, spec);
        Ok(raster::encode_png(&stamped)?)
    }
}
