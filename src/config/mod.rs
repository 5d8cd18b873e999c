// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{DEFAULT_CACHE_DIR, DEFAULT_LOG_LEVEL};
use crate::error::Error;
use crate::logging::LogFormat;

pub mod coalescing;
pub mod rasterizer;
pub mod watermark;

pub use coalescing::CoalescingConfig;
pub use rasterizer::RasterizerConfig;
pub use watermark::WatermarkConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    pub source: SourceConfig,
    pub rasterizer: RasterizerConfig,
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub coalescing: CoalescingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

/// Artifact cache location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Flat directory holding `{article}-{version}.png` files (default: cache)
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

/// Document store location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory of zlib-compressed drawings named `{article}-{version}.dwg.z`
    pub dir: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Filter directive used when RUST_LOG is unset (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Read, substitute, parse and validate in one step
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config = Self::from_file(path).map_err(Error::Config)?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cache.dir.is_empty() {
            return Err("cache.dir cannot be empty".to_string());
        }
        if self.source.dir.is_empty() {
            return Err("source.dir cannot be empty".to_string());
        }
        if self.logging.level.is_empty() {
            return Err("logging.level cannot be empty".to_string());
        }
        self.rasterizer.validate()?;
        self.watermark.validate()?;
        Ok(())
    }
}
