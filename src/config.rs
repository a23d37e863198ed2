//! Configuration Module
//!
//! Handles cache configuration: the sweep interval and its disable sentinel.

use std::env;
use std::time::Duration;

use serde::Deserialize;

/// Default interval between sweeper passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Environment variable holding the sweep interval in milliseconds.
pub const SWEEP_INTERVAL_ENV: &str = "MICROCACHE_SWEEP_INTERVAL_MS";

/// Cache configuration parameters.
///
/// `sweep_interval` of `None` (or a zero duration) disables the background
/// sweeper entirely. With the sweeper disabled, expired records stay readable
/// until they are deleted or overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Interval between sweeper passes, in milliseconds when deserialized
    #[serde(rename = "sweep_interval_ms", deserialize_with = "interval_ms::deserialize")]
    pub sweep_interval: Option<Duration>,
}

impl CacheConfig {
    /// Creates a config with the given sweep interval.
    pub fn with_sweep_interval(interval: Duration) -> Self {
        Self {
            sweep_interval: Some(interval),
        }
    }

    /// Creates a config with the sweeper disabled.
    pub fn disabled() -> Self {
        Self {
            sweep_interval: None,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MICROCACHE_SWEEP_INTERVAL_MS` - Sweep interval in milliseconds,
    ///   `0` disables the sweeper (default: 10000)
    pub fn from_env() -> Self {
        match env::var(SWEEP_INTERVAL_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            Some(ms) => Self {
                sweep_interval: interval_from_ms(ms),
            },
            None => Self::default(),
        }
    }

    /// Returns the effective sweep interval, or `None` when the sweeper is off.
    pub fn effective_sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval.filter(|interval| !interval.is_zero())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Some(DEFAULT_SWEEP_INTERVAL),
        }
    }
}

fn interval_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

mod interval_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = Option::<u64>::deserialize(deserializer)?;
        Ok(ms.and_then(super::interval_from_ms))
    }
}
