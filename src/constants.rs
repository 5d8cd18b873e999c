// Constants module - centralized default values for configuration
//
// Defaults used by the config layer and by the types it builds, kept in one
// place so the YAML defaults and the in-code defaults cannot drift apart.

// =============================================================================
// Cache defaults
// =============================================================================

/// Default artifact cache directory
pub const DEFAULT_CACHE_DIR: &str = "cache";

// =============================================================================
// Rasterizer defaults
// =============================================================================

/// Default side length of the rasterized page in pixels
pub const DEFAULT_PAGE_SIZE: u32 = 4800;

/// Default upper bound on a single external conversion, in seconds
pub const DEFAULT_RASTERIZER_TIMEOUT_SECS: u64 = 120;

/// Exit code the converter uses for "cannot parse this drawing"
pub const DEFAULT_LOAD_FAILURE_EXIT_CODE: i32 = 2;

// =============================================================================
// Watermark defaults
// =============================================================================

/// Smallest font size tried when fitting watermark text
pub const DEFAULT_MIN_FONT_SIZE: u32 = 100;

/// Largest font size tried when fitting watermark text
pub const DEFAULT_MAX_FONT_SIZE: u32 = 300;

/// Font size increment of the fit search
pub const DEFAULT_FONT_SIZE_STEP: u32 = 2;

/// Horizontal room the longest line must leave free (pixels)
pub const DEFAULT_HORIZONTAL_MARGIN: u32 = 100;

/// Factor applied to measured line height during fitting
pub const DEFAULT_LINE_HEIGHT_CORRECTION: f32 = 0.8;

/// Watermark fill color
pub const DEFAULT_WATERMARK_COLOR: &str = "#D7D7D7";

/// Watermark fill opacity (0-255)
pub const DEFAULT_WATERMARK_ALPHA: u8 = 25;

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
