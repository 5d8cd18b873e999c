//! CAD-to-raster conversion
//!
//! Rasterization itself is delegated to an external engine. This module
//! fixes the options every conversion uses and classifies engine failures
//! into "could not load the drawing" and everything else.

mod command;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use thiserror::Error;

pub use command::CommandRasterizer;

use crate::constants::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    White,
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::White => write!(f, "white"),
        }
    }
}

/// How entity colors are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    UseObjectColor,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawMode::UseObjectColor => write!(f, "object-color"),
        }
    }
}

/// Options passed to the engine for every conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    pub page_width: u32,
    pub page_height: u32,
    pub background: Background,
    pub draw_mode: DrawMode,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_SIZE,
            page_height: DEFAULT_PAGE_SIZE,
            background: Background::White,
            draw_mode: DrawMode::UseObjectColor,
        }
    }
}

impl RasterOptions {
    /// Command-line form understood by the external converter.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--background".to_string(),
            self.background.to_string(),
            "--draw-mode".to_string(),
            self.draw_mode.to_string(),
            "--page-width".to_string(),
            self.page_width.to_string(),
            "--page-height".to_string(),
            self.page_height.to_string(),
        ]
    }
}

#[derive(Error, Debug)]
pub enum RasterizeError {
    /// The engine could not parse the drawing.
    #[error("Rasterizer could not load drawing: {0}")]
    Load(String),

    /// Any other engine failure (crash, timeout, no output).
    #[error("Rasterization failed: {0}")]
    Failed(String),
}

/// Converts raw CAD bytes into PNG bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, raw: Bytes, options: &RasterOptions) -> Result<Bytes, RasterizeError>;
}
