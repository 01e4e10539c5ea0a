//! Virtual hub configuration.

use serde::Deserialize;

/// Shape of the simulated installation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualHubConfig {
    /// Number of simulated covers.
    pub covers: u32,
    /// Time a cover needs to travel 10 %, in milliseconds.
    pub travel_step_ms: u64,
}

impl Default for VirtualHubConfig {
    fn default() -> Self {
        Self {
            covers: 2,
            travel_step_ms: 500,
        }
    }
}
