//! Font faces used to measure and draw watermark text.
//!
//! [`TextFace`] is the seam between layout and glyph rasterization. The
//! production face wraps an `ab_glyph` font loaded from disk; layout code only
//! ever sees line metrics, advance widths and coverage callbacks.

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont};
use std::path::Path;

use super::WatermarkError;

/// Vertical metrics of a face at one pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the lowest descender (negative).
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    /// Full line height: ascent + |descent| + line gap.
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent + self.line_gap
    }
}

/// Something that can measure and draw a single line of text.
pub trait TextFace: Send + Sync {
    /// Vertical metrics at `px` pixels.
    fn line_metrics(&self, px: f32) -> LineMetrics;

    /// Horizontal advance of `text` at `px` pixels, kerning included.
    fn advance_width(&self, text: &str, px: f32) -> f32;

    /// Rasterize `text` with its line box's top-left corner at the origin.
    ///
    /// `plot(x, y, coverage)` is called for each touched pixel, with coverage
    /// in `0.0..=1.0`. Coordinates may fall outside the line box.
    fn draw(&self, text: &str, px: f32, plot: &mut dyn FnMut(i32, i32, f32));
}

/// TrueType/OpenType face backed by `ab_glyph`.
pub struct FontFace {
    font: FontVec,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontFace {
    /// Parse a font from raw TTF/OTF bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, WatermarkError> {
        let font =
            FontVec::try_from_vec(data).map_err(|e| WatermarkError::FontError(e.to_string()))?;
        Ok(Self { font })
    }

    /// Load a font file from disk.
    pub fn load(path: &Path) -> Result<Self, WatermarkError> {
        let data = std::fs::read(path)
            .map_err(|e| WatermarkError::FontError(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }
}

impl TextFace for FontFace {
    fn line_metrics(&self, px: f32) -> LineMetrics {
        let scaled = self.font.as_scaled(PxScale::from(px));
        LineMetrics {
            ascent: scaled.ascent(),
            descent: scaled.descent(),
            line_gap: scaled.line_gap(),
        }
    }

    fn advance_width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));

        let mut width = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;
        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }
        width
    }

    fn draw(&self, text: &str, px: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let baseline_y = scaled.ascent();

        let mut cursor_x = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;
        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                cursor_x += scaled.kern(prev, glyph_id);
            }

            let glyph =
                glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    plot(
                        bounds.min.x as i32 + gx as i32,
                        bounds.min.y as i32 + gy as i32,
                        coverage,
                    );
                });
            }

            cursor_x += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }
    }
}
