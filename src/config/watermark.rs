//! Watermark configuration types.
//!
//! Font, optional reference sample for stripping the rasterizer's own mark,
//! and the fitting/blending policy. Default values are sourced from
//! `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FONT_SIZE_STEP, DEFAULT_HORIZONTAL_MARGIN, DEFAULT_LINE_HEIGHT_CORRECTION,
    DEFAULT_MAX_FONT_SIZE, DEFAULT_MIN_FONT_SIZE, DEFAULT_WATERMARK_ALPHA, DEFAULT_WATERMARK_COLOR,
};
use crate::watermark::{parse_hex_color, WatermarkError, WatermarkStyle};

fn default_min_font_size() -> u32 {
    DEFAULT_MIN_FONT_SIZE
}

fn default_max_font_size() -> u32 {
    DEFAULT_MAX_FONT_SIZE
}

fn default_font_size_step() -> u32 {
    DEFAULT_FONT_SIZE_STEP
}

fn default_horizontal_margin() -> u32 {
    DEFAULT_HORIZONTAL_MARGIN
}

fn default_line_height_correction() -> f32 {
    DEFAULT_LINE_HEIGHT_CORRECTION
}

fn default_color() -> String {
    DEFAULT_WATERMARK_COLOR.to_string()
}

fn default_alpha() -> u8 {
    DEFAULT_WATERMARK_ALPHA
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// TrueType/OpenType font used for the text (required)
    pub font_path: String,

    /// Reference render of the rasterizer's evaluation mark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_path: Option<String>,

    #[serde(default = "default_min_font_size")]
    pub min_font_size: u32,

    #[serde(default = "default_max_font_size")]
    pub max_font_size: u32,

    #[serde(default = "default_font_size_step")]
    pub font_size_step: u32,

    #[serde(default = "default_horizontal_margin")]
    pub horizontal_margin: u32,

    #[serde(default = "default_line_height_correction")]
    pub line_height_correction: f32,

    /// Fill color, #RGB or #RRGGBB
    #[serde(default = "default_color")]
    pub color: String,

    /// Fill opacity, 1-255
    #[serde(default = "default_alpha")]
    pub alpha: u8,
}

impl WatermarkConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.font_path.is_empty() {
            return Err("watermark.font_path cannot be empty".to_string());
        }
        if matches!(&self.sample_path, Some(path) if path.is_empty()) {
            return Err("watermark.sample_path cannot be empty when set".to_string());
        }
        if self.min_font_size == 0 {
            return Err("watermark.min_font_size must be greater than 0".to_string());
        }
        if self.min_font_size > self.max_font_size {
            return Err(format!(
                "watermark.min_font_size ({}) exceeds max_font_size ({})",
                self.min_font_size, self.max_font_size
            ));
        }
        if self.font_size_step == 0 {
            return Err("watermark.font_size_step must be greater than 0".to_string());
        }
        if self.line_height_correction <= 0.0 {
            return Err("watermark.line_height_correction must be positive".to_string());
        }
        if self.alpha == 0 {
            return Err("watermark.alpha must be greater than 0".to_string());
        }
        parse_hex_color(&self.color).map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn to_style(&self) -> Result<WatermarkStyle, WatermarkError> {
        Ok(WatermarkStyle {
            min_font_size: self.min_font_size,
            max_font_size: self.max_font_size,
            font_size_step: self.font_size_step,
            horizontal_margin: self.horizontal_margin,
            line_height_correction: self.line_height_correction,
            color: parse_hex_color(&self.color)?,
            alpha: self.alpha,
        })
    }
}
