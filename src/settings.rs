use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::geometry::{PlotDefinition, PlotRegistry};
use crate::tracking::TrackerConfig;

/// On-disk settings: tracker tuning plus any plots beyond the built-in ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tracker: TrackerConfig,
    pub plots: Vec<PlotDefinition>,
}

impl Settings {
    /// Read settings from a JSON file. A missing file yields the defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        settings
            .tracker
            .validate()
            .with_context(|| format!("Invalid tracker settings in {}", path.display()))?;
        Ok(settings)
    }

    /// Built-in plots plus the configured ones; configured plots replace
    /// built-ins with the same name.
    pub fn plot_registry(&self) -> Result<PlotRegistry> {
        let mut registry = PlotRegistry::builtin();
        for plot in &self.plots {
            registry
                .register(plot.clone())
                .with_context(|| format!("Failed to register plot '{}'", plot.name))?;
        }
        Ok(registry)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}
