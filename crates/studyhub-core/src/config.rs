//! Registry configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_sweep_interval_secs() -> u64 {
    5
}

fn default_event_capacity() -> usize {
    64
}

/// Tunable settings for a registry instance.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Seconds between lifecycle sweep passes
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Per-subscriber buffer size of the event bus
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl RegistryConfig {
    /// Parses a configuration from a TOML document; missing keys fall
    /// back to defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Sweep cadence as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
