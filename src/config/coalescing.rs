//! Coalescing configuration types.
//!
//! Concurrent cache misses for the same drawing can either each run their
//! own conversion or share one. Sharing is opt-in: the cached result is the
//! same either way.

use serde::{Deserialize, Serialize};

/// Request coalescing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalescingConfig {
    /// Share one conversion between concurrent misses (default: false)
    #[serde(default)]
    pub enabled: bool,
}
