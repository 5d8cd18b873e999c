//! Text watermark rendering.
//!
//! Draws a line of text straight onto an RGBA image with a translucent fill,
//! blending each covered pixel with the "over" operator.

use image::{Rgba, RgbaImage};

use super::face::TextFace;
use super::WatermarkError;

/// Parsed RGB color from hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::ConfigError("Color must start with '#'".to_string()))?;

    let digit = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| WatermarkError::ConfigError(format!("Invalid hex digit in '#{}'", hex)))
    };

    match hex.len() {
        3 => {
            // Double each component: 0xF -> 0xFF, 0xA -> 0xAA
            let r = digit(&hex[0..1])?;
            let g = digit(&hex[1..2])?;
            let b = digit(&hex[2..3])?;
            Ok(Color::new(r * 17, g * 17, b * 17))
        }
        6 => Ok(Color::new(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
        )),
        _ => Err(WatermarkError::ConfigError(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        ))),
    }
}

/// Blend `color` at `alpha` (0.0..=1.0) over `background`.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
fn blend_over(background: Rgba<u8>, color: Color, alpha: f32) -> Rgba<u8> {
    let fg_alpha = alpha.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(color.r, background[0]),
        blend_channel(color.g, background[1]),
        blend_channel(color.b, background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Draw `text` with its line box's top-left corner at (`x`, `y`).
///
/// `alpha` is the fill opacity in 0..=255; glyph coverage scales it further.
/// Pixels falling outside `target` are clipped.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    target: &mut RgbaImage,
    face: &dyn TextFace,
    text: &str,
    size: f32,
    x: i32,
    y: i32,
    color: Color,
    alpha: u8,
) {
    let (width, height) = (target.width() as i32, target.height() as i32);
    let opacity = alpha as f32 / 255.0;

    face.draw(text, size, &mut |gx, gy, coverage| {
        let px = x + gx;
        let py = y + gy;
        if px < 0 || py < 0 || px >= width || py >= height || coverage <= 0.0 {
            return;
        }
        let pixel = target.get_pixel_mut(px as u32, py as u32);
        *pixel = blend_over(*pixel, color, coverage.min(1.0) * opacity);
    });
}
