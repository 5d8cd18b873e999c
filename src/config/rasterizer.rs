//! Rasterizer configuration types.
//!
//! Describes the external conversion program and the page it renders onto.
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_LOAD_FAILURE_EXIT_CODE, DEFAULT_PAGE_SIZE, DEFAULT_RASTERIZER_TIMEOUT_SECS,
};
use crate::rasterizer::{CommandRasterizer, RasterOptions};

fn default_timeout_secs() -> u64 {
    DEFAULT_RASTERIZER_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_load_failure_exit_code() -> i32 {
    DEFAULT_LOAD_FAILURE_EXIT_CODE
}

/// External converter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterizerConfig {
    /// Converter executable (required)
    pub program: String,

    /// Extra arguments placed before the page options
    #[serde(default)]
    pub args: Vec<String>,

    /// Kill the converter after this many seconds (default: 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page width in pixels (default: 4800)
    #[serde(default = "default_page_size")]
    pub page_width: u32,

    /// Page height in pixels (default: 4800)
    #[serde(default = "default_page_size")]
    pub page_height: u32,

    /// Exit code meaning "cannot load this drawing" (default: 2)
    #[serde(default = "default_load_failure_exit_code")]
    pub load_failure_exit_code: i32,
}

impl RasterizerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.program.is_empty() {
            return Err("rasterizer.program cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("rasterizer.timeout_secs must be greater than 0".to_string());
        }
        if self.page_width == 0 || self.page_height == 0 {
            return Err(format!(
                "rasterizer page size must be non-zero, got {}x{}",
                self.page_width, self.page_height
            ));
        }
        Ok(())
    }

    pub fn to_raster_options(&self) -> RasterOptions {
        RasterOptions {
            page_width: self.page_width,
            page_height: self.page_height,
            ..RasterOptions::default()
        }
    }

    pub fn to_command_rasterizer(&self) -> CommandRasterizer {
        CommandRasterizer::new(
            self.program.clone(),
            self.args.clone(),
            Duration::from_secs(self.timeout_secs),
            self.load_failure_exit_code,
        )
    }
}
