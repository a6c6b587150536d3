use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Configuration for row snapping and spray evidence with tunable thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// A sample snaps to its nearest row only within this many meters
    pub snap_threshold_m: f64,

    /// Number of most recent resolved samples consulted by the evidence rule
    pub window_size: usize,

    /// Hits on one row within the window needed to mark it sprayed
    pub min_hits: usize,

    /// Planar degrees-to-meters scale. Only valid close to the plots' latitude.
    pub meters_per_degree: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            snap_threshold_m: 6.0,
            window_size: 10,
            min_hits: 3,
            meters_per_degree: 111_000.0,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.snap_threshold_m.is_finite() && self.snap_threshold_m > 0.0) {
            bail!("snap_threshold_m must be a positive number, got {}", self.snap_threshold_m);
        }
        if !(self.meters_per_degree.is_finite() && self.meters_per_degree > 0.0) {
            bail!("meters_per_degree must be a positive number, got {}", self.meters_per_degree);
        }
        if self.window_size == 0 {
            bail!("window_size must be at least 1");
        }
        if self.min_hits == 0 || self.min_hits > self.window_size {
            bail!(
                "min_hits must be between 1 and window_size ({}), got {}",
                self.window_size,
                self.min_hits
            );
        }
        Ok(())
    }
}
