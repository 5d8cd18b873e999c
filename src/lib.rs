// dwg2img - CAD drawing to watermarked PNG conversion library

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod raster;
pub mod rasterizer;
pub mod request_coalescing;
pub mod source;
pub mod watermark;

pub use error::Error;
