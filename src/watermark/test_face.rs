//! Deterministic face for tests: every character is a solid block.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::face::{LineMetrics, TextFace};

/// Each character advances `advance * px`; each line is `line_height * px` tall.
pub struct BlockFace {
    advance: f32,
    line_height: f32,
    metrics_calls: AtomicUsize,
}

impl BlockFace {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            metrics_calls: AtomicUsize::new(0),
        }
    }

    pub fn metrics_calls(&self) -> usize {
        self.metrics_calls.load(Ordering::SeqCst)
    }
}

impl TextFace for BlockFace {
    fn line_metrics(&self, px: f32) -> LineMetrics {
        self.metrics_calls.fetch_add(1, Ordering::SeqCst);
        LineMetrics {
            ascent: self.line_height * px,
            descent: 0.0,
            line_gap: 0.0,
        }
    }

    fn advance_width(&self, text: &str, px: f32) -> f32 {
        text.chars().count() as f32 * self.advance * px
    }

    fn draw(&self, text: &str, px: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let cell = (self.advance * px) as i32;
        let height = (self.line_height * px) as i32;
        for i in 0..text.chars().count() as i32 {
            for y in 0..height {
                for x in 0..cell.saturating_sub(1) {
                    plot(i * cell + x, y, 1.0);
                }
            }
        }
    }
}
