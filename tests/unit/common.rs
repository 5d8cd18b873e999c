// Shared fixtures: fake collaborators, a synthetic font face, PNG helpers

use async_trait::async_trait;
use bytes::Bytes;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use dwg2img::cache::CacheKey;
use dwg2img::raster;
use dwg2img::rasterizer::{RasterOptions, RasterizeError, Rasterizer};
use dwg2img::source::{DocumentSource, SourceError};
use dwg2img::watermark::{LineMetrics, TextFace};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

pub fn png(image: &RgbaImage) -> Bytes {
    Bytes::from(raster::encode_png(image).unwrap())
}

/// White page with one filled rectangle.
pub fn page_with_rect(width: u32, height: u32, x: u32, y: u32, w: u32, h: u32) -> RgbaImage {
    let mut page = RgbaImage::from_pixel(width, height, WHITE);
    for py in y..y + h {
        for px in x..x + w {
            page.put_pixel(px, py, INK);
        }
    }
    page
}

/// In-memory document store.
#[derive(Default)]
pub struct FakeSource {
    documents: HashMap<CacheKey, Bytes>,
    failing: bool,
    fetches: AtomicUsize,
}

impl FakeSource {
    pub fn with(mut self, key: CacheKey, data: &'static [u8]) -> Self {
        self.documents.insert(key, Bytes::from_static(data));
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn fetch(&self, key: CacheKey) -> Result<Bytes, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(SourceError::Unavailable("store offline".to_string()));
        }
        Ok(self.documents.get(&key).cloned().unwrap_or_default())
    }
}

/// Rasterizer that replays a scripted outcome and records what it was asked.
pub struct FakeRasterizer {
    outcome: Result<Bytes, fn(String) -> RasterizeError>,
    calls: AtomicUsize,
    last_options: Mutex<Option<RasterOptions>>,
}

impl FakeRasterizer {
    pub fn rendering(png: Bytes) -> Self {
        Self {
            outcome: Ok(png),
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn failing(kind: fn(String) -> RasterizeError) -> Self {
        Self {
            outcome: Err(kind),
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<RasterOptions> {
        *self.last_options.lock().unwrap()
    }
}

#[async_trait]
impl Rasterizer for FakeRasterizer {
    async fn rasterize(&self, _raw: Bytes, options: &RasterOptions) -> Result<Bytes, RasterizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(*options);
        match &self.outcome {
            Ok(png) => Ok(png.clone()),
            Err(kind) => Err(kind("scripted failure".to_string())),
        }
    }
}

/// Monospace face: every char advances `advance * px`, lines are `px` tall,
/// glyphs are solid boxes.
pub struct BoxFace {
    pub advance: f32,
}

impl TextFace for BoxFace {
    fn line_metrics(&self, px: f32) -> LineMetrics {
        LineMetrics {
            ascent: px,
            descent: 0.0,
            line_gap: 0.0,
        }
    }

    fn advance_width(&self, text: &str, px: f32) -> f32 {
        text.chars().count() as f32 * self.advance * px
    }

    fn draw(&self, text: &str, px: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let width = self.advance_width(text, px) as i32;
        for y in 0..px as i32 {
            for x in 0..width {
                plot(x, y, 1.0);
            }
        }
    }
}
