//! Per-size cache of font metrics.
//!
//! The fit search measures the same face at up to a hundred sizes per image,
//! and every request repeats it. Line metrics only depend on the size, so they
//! are computed once per size and kept for the life of the compositor.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::face::{LineMetrics, TextFace};

/// Rendered extent of one line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Shared face plus its lazily filled metrics table.
pub struct FontMetricsCache {
    face: Arc<dyn TextFace>,
    by_size: Mutex<HashMap<u32, LineMetrics>>,
}

impl std::fmt::Debug for FontMetricsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetricsCache")
            .field("cached_sizes", &self.len())
            .finish()
    }
}

impl FontMetricsCache {
    pub fn new(face: Arc<dyn TextFace>) -> Self {
        Self {
            face,
            by_size: Mutex::new(HashMap::new()),
        }
    }

    pub fn face(&self) -> &dyn TextFace {
        self.face.as_ref()
    }

    /// Line metrics at `size`, computed on first use.
    pub fn line_metrics(&self, size: u32) -> LineMetrics {
        if let Some(metrics) = self.by_size.lock().get(&size) {
            return *metrics;
        }
        // Computed outside the lock; a racing thread stores the same value.
        let metrics = self.face.line_metrics(size as f32);
        self.by_size.lock().entry(size).or_insert(metrics);
        metrics
    }

    /// Width and line height of `text` at `size`.
    pub fn measure(&self, text: &str, size: u32) -> TextExtent {
        let height = self.line_metrics(size).line_height();
        let width = self.face.advance_width(text, size as f32);
        TextExtent { width, height }
    }

    /// Number of sizes measured so far.
    pub fn len(&self) -> usize {
        self.by_size.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
