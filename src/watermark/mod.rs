//! Watermark module for stamping request-time text onto served drawings.
//!
//! Clean artifacts are cached without a watermark; the caller's lines are
//! blended on at serve time, so one cached image can be stamped differently
//! per caller.
//!
//! - [`TextFace`] abstracts the font; [`FontFace`] loads a TrueType file.
//! - [`FontMetricsCache`] keeps per-size line metrics for the process lifetime.
//! - [`WatermarkCompositor`] fits the font size and blends the text.

pub mod compositor;
pub mod error;
pub mod face;
pub mod metrics;
pub mod text_renderer;

#[cfg(test)]
pub(crate) mod test_face;

// Re-export main types for convenience
pub use compositor::{PlacedLine, WatermarkCompositor, WatermarkLayout, WatermarkSpec, WatermarkStyle};
pub use error::WatermarkError;
pub use face::{FontFace, LineMetrics, TextFace};
pub use metrics::{FontMetricsCache, TextExtent};
pub use text_renderer::{draw_text, parse_hex_color, Color};
