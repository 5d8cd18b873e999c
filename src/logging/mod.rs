// Logging module for structured logging using the tracing crate

use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for log aggregation systems
    Json,
    /// Human-readable lines for terminals
    #[default]
    Pretty,
}

/// Build the level filter: `RUST_LOG` wins, then the configured level.
pub fn build_filter(level: &str) -> Result<EnvFilter, Box<dyn Error + Send + Sync>> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}

/// Initialize the tracing subscriber for structured logging
///
/// Events go to stdout, formatted as JSON or as pretty lines depending on
/// `format`, and are filtered by `RUST_LOG` or, when that is unset, by
/// `level` (e.g. `"info"` or `"dwg2img=debug"`).
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter directive or a global
/// subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use dwg2img::logging::{init_subscriber, LogFormat};
///
/// init_subscriber(LogFormat::Json, "info").expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(format: LogFormat, level: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = build_filter(level)?;
    let registry = Registry::default().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()?,
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init()?,
    }

    Ok(())
}
